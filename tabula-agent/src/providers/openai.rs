//! OpenAI function-tool envelope

use crate::RowToolSchema;
use serde::Serialize;
use serde_json::Value;

/// Function payload nested inside the tool envelope.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}

/// Tool definition in the OpenAI function-calling format (strict mode).
#[derive(Debug, Clone, Serialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl FunctionTool {
    pub fn from_schema(schema: &RowToolSchema, name: &str, description: &str) -> Self {
        FunctionTool {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters: schema.to_json_schema(),
                strict: true,
            },
        }
    }
}
