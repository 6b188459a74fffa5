//! Tool definition - schema and metadata for an exposed capability.

use serde::{Deserialize, Serialize};

/// Definition of a capability the conversational model may invoke.
///
/// Carries the name, description, and parameter JSON Schema the gateway
/// advertises to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the capability (e.g. "modify_hairstyle").
    name: String,

    /// Human-readable description for the model.
    description: String,

    /// JSON Schema for the parameters.
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the capability name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Converts to Gemini function-declaration format.
    pub fn to_gemini_format(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters_schema
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["modification_description"],
            "properties": {
                "modification_description": { "type": "string" }
            }
        })
    }

    #[test]
    fn new_creates_definition() {
        let def = ToolDefinition::new("modify_hairstyle", "Change the hair", sample_schema());

        assert_eq!(def.name(), "modify_hairstyle");
        assert_eq!(def.description(), "Change the hair");
        assert!(def.parameters_schema().is_object());
    }

    #[test]
    fn to_gemini_format_has_correct_structure() {
        let def = ToolDefinition::new("modify_hairstyle", "Change the hair", sample_schema());
        let gemini = def.to_gemini_format();

        assert_eq!(gemini["name"], "modify_hairstyle");
        assert_eq!(gemini["description"], "Change the hair");
        assert!(gemini["parameters"].is_object());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "name": "my_tool",
            "description": "My tool",
            "parameters_schema": {}
        }"#;

        let def: ToolDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.name(), "my_tool");
    }
}
