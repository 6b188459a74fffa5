//! Function-calling capability types.
//!
//! The conversational model can request exactly one capability,
//! `modify_hairstyle`. Requests arrive as loosely-typed
//! [`FunctionCallRequest`] values and are validated into the closed
//! [`StyleCommand`] enum before anything executes, so adding a second
//! capability is a compile-checked extension rather than a string match.

mod command;
mod function_call;
mod tool_definition;

pub use command::{FunctionCallError, StyleCommand, MODIFY_HAIRSTYLE};
pub use function_call::FunctionCallRequest;
pub use tool_definition::ToolDefinition;
