//! Adapters - Implementations of ports against concrete technology.

mod gemini;
mod mock;

pub use gemini::{GeminiConfig, GeminiGateway};
pub use mock::{MockFailure, MockModelGateway};
