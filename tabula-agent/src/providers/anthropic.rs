//! Anthropic tool-use envelope

use crate::RowToolSchema;
use serde::Serialize;
use serde_json::Value;

/// Tool definition in the Anthropic tool-use format: the schema sits under
/// `input_schema` alongside top-level name and description.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn from_schema(schema: &RowToolSchema, name: &str, description: &str) -> Self {
        ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: schema.to_json_schema(),
        }
    }
}
