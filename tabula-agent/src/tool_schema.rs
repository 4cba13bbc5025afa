//! Dynamic row-tool schema synthesis
//!
//! Builds, from the live column set, a strict structural schema describing an
//! acceptable `cells` document for row creation. The schema is a plain data
//! structure (one descriptor per column) that is both directly interpretable
//! for validation and serializable into the provider tool envelopes. It is
//! synthesized fresh on every use; nothing is cached, so it always reflects
//! the current columns.

use serde_json::{json, Map, Value};
use tabula_core::{Column, ColumnType, ValidationError};

/// JSON type tag of a synthesized cell property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    String,
    Number,
    Boolean,
    StringArray,
}

impl CellType {
    fn json_name(self) -> &'static str {
        match self {
            CellType::String => "string",
            CellType::Number => "number",
            CellType::Boolean => "boolean",
            CellType::StringArray => "array",
        }
    }
}

/// Descriptor of one cell property, keyed by column ID.
#[derive(Debug, Clone, PartialEq)]
pub struct CellProperty {
    pub column_id: String,
    pub cell_type: CellType,
    pub description: String,
    pub required: bool,
    /// JSON-schema format annotation (`date-time`, `uri`); advisory only,
    /// the interpreting validator treats these properties as plain strings.
    pub format: Option<&'static str>,
}

/// Strict structural schema for the `cells` document of a new row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowToolSchema {
    pub properties: Vec<CellProperty>,
}

impl RowToolSchema {
    /// Synthesize the schema from the given columns.
    ///
    /// Type mapping: text/date/url -> string, number -> number, boolean ->
    /// boolean, select -> string, multi-select -> array of string. A property
    /// is required only when the column's constraints say so.
    pub fn from_columns(columns: &[Column]) -> Self {
        let properties = columns
            .iter()
            .map(|col| {
                let cell_type = match col.column_type {
                    ColumnType::Number => CellType::Number,
                    ColumnType::Boolean => CellType::Boolean,
                    ColumnType::Select if col.is_multi_select() => CellType::StringArray,
                    _ => CellType::String,
                };
                let format = match col.column_type {
                    ColumnType::Date => Some("date-time"),
                    ColumnType::Url => Some("uri"),
                    _ => None,
                };
                let mut description = format!("Column: {}", col.name);
                if let Some(extra) = &col.description {
                    description.push_str(&format!(" - {extra}"));
                }
                CellProperty {
                    column_id: col.id.clone(),
                    cell_type,
                    description,
                    required: col.is_required(),
                    format,
                }
            })
            .collect();
        RowToolSchema { properties }
    }

    /// Render as a closed JSON-schema object: every property declared, the
    /// required list populated, and `additionalProperties` forbidden.
    pub fn to_json_schema(&self) -> Value {
        let mut props = Map::new();
        for p in &self.properties {
            let mut spec = Map::new();
            spec.insert("type".to_string(), json!(p.cell_type.json_name()));
            if p.cell_type == CellType::StringArray {
                spec.insert("items".to_string(), json!({ "type": "string" }));
            }
            if let Some(format) = p.format {
                spec.insert("format".to_string(), json!(format));
            }
            spec.insert("description".to_string(), json!(p.description));
            props.insert(p.column_id.clone(), Value::Object(spec));
        }
        let required: Vec<&str> = self
            .properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.column_id.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": props,
            "required": required,
            "additionalProperties": false
        })
    }

    /// Interpret the schema against a `cells` document.
    ///
    /// Unknown keys are rejected (closed object), required properties must be
    /// present and non-null, and present values must match their type tag.
    /// Null is tolerated for optional properties.
    pub fn validate_cells(&self, cells: &Map<String, Value>) -> Result<(), ValidationError> {
        for key in cells.keys() {
            if !self.properties.iter().any(|p| &p.column_id == key) {
                return Err(ValidationError::ConstraintViolation {
                    constraint: "additionalProperties".to_string(),
                    reason: format!("unknown property {key:?}"),
                });
            }
        }
        for property in &self.properties {
            match cells.get(&property.column_id) {
                None => {
                    if property.required {
                        return Err(ValidationError::RequiredFieldMissing {
                            field: property.column_id.clone(),
                        });
                    }
                }
                Some(Value::Null) => {
                    if property.required {
                        return Err(ValidationError::InvalidValue {
                            field: property.column_id.clone(),
                            reason: "required property may not be null".to_string(),
                        });
                    }
                }
                Some(value) => property.check_type(value)?,
            }
        }
        Ok(())
    }
}

impl CellProperty {
    fn check_type(&self, value: &Value) -> Result<(), ValidationError> {
        let ok = match self.cell_type {
            CellType::String => value.is_string(),
            CellType::Number => value.is_number(),
            CellType::Boolean => value.is_boolean(),
            CellType::StringArray => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: self.column_id.clone(),
                reason: format!(
                    "expected {}, got {}",
                    self.cell_type.json_name(),
                    value_type_name(value)
                ),
            })
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// TESTS
// =============================================================================
