//! The closed capability set exposed to the conversational model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::function_call::FunctionCallRequest;
use super::tool_definition::ToolDefinition;

/// Name of the single exposed capability.
pub const MODIFY_HAIRSTYLE: &str = "modify_hairstyle";

/// A validated capability invocation.
///
/// Closed set: the model cannot invent capabilities, and a new variant here
/// forces every dispatch site to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleCommand {
    /// Re-synthesize the current portrait with a described modification.
    ModifyHairstyle {
        /// Natural-language description of the change ("make it shorter").
        description: String,
    },
}

/// Errors validating a model-requested invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FunctionCallError {
    #[error("Unsupported function: {0}")]
    UnknownFunction(String),

    #[error("Function '{function}' is missing required argument '{argument}'")]
    MissingArgument {
        function: String,
        argument: String,
    },

    #[error("Function '{function}' argument '{argument}' is invalid: {reason}")]
    InvalidArgument {
        function: String,
        argument: String,
        reason: String,
    },
}

impl StyleCommand {
    /// Validates a raw function-call request into a command.
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` for names outside the capability set
    /// - `MissingArgument` / `InvalidArgument` for malformed arguments
    pub fn from_request(request: &FunctionCallRequest) -> Result<Self, FunctionCallError> {
        match request.name() {
            MODIFY_HAIRSTYLE => {
                let raw = request
                    .arguments()
                    .get("modification_description")
                    .ok_or_else(|| FunctionCallError::MissingArgument {
                        function: MODIFY_HAIRSTYLE.to_string(),
                        argument: "modification_description".to_string(),
                    })?;

                let description = raw.as_str().ok_or_else(|| {
                    FunctionCallError::InvalidArgument {
                        function: MODIFY_HAIRSTYLE.to_string(),
                        argument: "modification_description".to_string(),
                        reason: "expected a string".to_string(),
                    }
                })?;

                let trimmed = description.trim();
                if trimmed.is_empty() {
                    return Err(FunctionCallError::InvalidArgument {
                        function: MODIFY_HAIRSTYLE.to_string(),
                        argument: "modification_description".to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }

                Ok(StyleCommand::ModifyHairstyle {
                    description: trimmed.to_string(),
                })
            }
            other => Err(FunctionCallError::UnknownFunction(other.to_string())),
        }
    }

    /// Definitions for the whole capability set, for gateway requests.
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            MODIFY_HAIRSTYLE,
            "Apply a requested modification to the user's current hairstyle image. \
             Call this whenever the user asks to change the look, e.g. length, \
             colour, texture, or styling.",
            serde_json::json!({
                "type": "object",
                "required": ["modification_description"],
                "properties": {
                    "modification_description": {
                        "type": "string",
                        "description": "Natural-language description of the requested change, e.g. 'shorter with curtain bangs' or 'dyed ash blonde'"
                    }
                }
            }),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, args: serde_json::Value) -> FunctionCallRequest {
        FunctionCallRequest::new(name, args)
    }

    #[test]
    fn valid_request_becomes_command() {
        let req = request(
            "modify_hairstyle",
            serde_json::json!({"modification_description": "make it shorter"}),
        );

        let command = StyleCommand::from_request(&req).unwrap();
        assert_eq!(
            command,
            StyleCommand::ModifyHairstyle {
                description: "make it shorter".to_string()
            }
        );
    }

    #[test]
    fn description_is_trimmed() {
        let req = request(
            "modify_hairstyle",
            serde_json::json!({"modification_description": "  dye it blonde  "}),
        );

        let StyleCommand::ModifyHairstyle { description } =
            StyleCommand::from_request(&req).unwrap();
        assert_eq!(description, "dye it blonde");
    }

    #[test]
    fn unknown_function_is_rejected() {
        let req = request("delete_everything", serde_json::json!({}));
        let err = StyleCommand::from_request(&req).unwrap_err();
        assert_eq!(
            err,
            FunctionCallError::UnknownFunction("delete_everything".to_string())
        );
    }

    #[test]
    fn missing_argument_is_rejected() {
        let req = request("modify_hairstyle", serde_json::json!({}));
        let err = StyleCommand::from_request(&req).unwrap_err();
        assert!(matches!(err, FunctionCallError::MissingArgument { .. }));
    }

    #[test]
    fn non_string_argument_is_rejected() {
        let req = request(
            "modify_hairstyle",
            serde_json::json!({"modification_description": 42}),
        );
        let err = StyleCommand::from_request(&req).unwrap_err();
        assert!(matches!(err, FunctionCallError::InvalidArgument { .. }));
    }

    #[test]
    fn blank_argument_is_rejected() {
        let req = request(
            "modify_hairstyle",
            serde_json::json!({"modification_description": "   "}),
        );
        let err = StyleCommand::from_request(&req).unwrap_err();
        assert!(matches!(err, FunctionCallError::InvalidArgument { .. }));
    }

    #[test]
    fn definitions_cover_the_capability_set() {
        let defs = StyleCommand::definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name(), MODIFY_HAIRSTYLE);
        assert_eq!(
            defs[0].parameters_schema()["required"][0],
            "modification_description"
        );
    }
}
