//! Strand Studio - AI Hairstyle Try-On Engine
//!
//! This crate implements the orchestration core of a virtual hairstyle
//! try-on flow: face analysis, portrait synthesis, style critique, and a
//! conversational refinement loop that routes natural-language requests
//! to image-synthesis calls via function-calling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
