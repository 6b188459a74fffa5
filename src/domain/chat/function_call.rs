//! Function-call request value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CallId;

/// A request from the conversational model to invoke a named capability.
///
/// Transient: produced at the gateway boundary, consumed exactly once by
/// the orchestrator. Arguments are a JSON object to support varying
/// capability schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    /// Name of the requested capability.
    name: String,

    /// Arguments for the capability (JSON object).
    arguments: serde_json::Value,

    /// Identifier assigned when the request crossed the gateway boundary.
    call_id: CallId,
}

impl FunctionCallRequest {
    /// Creates a new request with a fresh call id.
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            call_id: CallId::new(),
        }
    }

    /// Returns the requested capability name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.arguments
    }

    /// Returns the call id.
    pub fn call_id(&self) -> CallId {
        self.call_id
    }
}
