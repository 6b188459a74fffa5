//! Domain layer - the core types and rules of the try-on flow.
//!
//! Organized as:
//! - `foundation` - shared value objects (ids, timestamps, errors)
//! - `catalog` - the known hairstyle catalog
//! - `image` - the opaque portrait handle
//! - `parsing` - tolerant extraction of structured model output
//! - `analysis` - face-shape analysis results
//! - `critique` - style critique results and artifacts
//! - `session` - the try-on session aggregate
//! - `chat` - function-calling capability types

pub mod analysis;
pub mod catalog;
pub mod chat;
pub mod critique;
pub mod foundation;
pub mod image;
pub mod parsing;
pub mod session;
