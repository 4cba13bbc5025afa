//! Schema data model
//!
//! The typed structural definition of a table: metadata, advisory policy,
//! ordered columns, rows, and saved views. Wire names are camelCase (plus the
//! `$schema` envelope alias); optional fields are omitted from serialized
//! documents when absent. Deserialization gives shape and closed-enum
//! strictness; [`TableSchema::validate`] adds the dialect-dependent checks
//! (version literal, identifier shapes) with field-path error reporting.
//!
//! Deliberately loose, matching the wire formats this model round-trips:
//! unknown extra fields are tolerated, and column references inside rows and
//! views are checked for shape only, never for existence.

use crate::{Dialect, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COLUMN
// ============================================================================

/// Closed set of column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Select,
    Date,
    Boolean,
    Url,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Select => "select",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Url => "url",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ColumnType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "select" => Ok(ColumnType::Select),
            "date" => Ok(ColumnType::Date),
            "boolean" => Ok(ColumnType::Boolean),
            "url" => Ok(ColumnType::Url),
            other => Err(ValidationError::InvalidValue {
                field: "type".to_string(),
                reason: format!(
                    "unknown column type {:?}, expected one of text, number, select, date, boolean, url",
                    other
                ),
            }),
        }
    }
}

/// One choice of a select column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    /// UI hint: "red", "#ff0000", etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// UI display hints for a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnDisplay {
    /// Column width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Optional value constraints for a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A typed field definition shared by all rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Only present when the agent needs extra context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<ColumnDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ColumnConstraints>,
}

impl Column {
    /// Whether a value for this column is mandatory in new rows.
    pub fn is_required(&self) -> bool {
        self.constraints
            .as_ref()
            .and_then(|c| c.required)
            .unwrap_or(false)
    }

    /// Whether a select column accepts multiple values.
    pub fn is_multi_select(&self) -> bool {
        self.constraints
            .as_ref()
            .and_then(|c| c.multi_select)
            .unwrap_or(false)
    }

    /// Declared select options, if any.
    pub fn options(&self) -> &[SelectOption] {
        self.constraints
            .as_ref()
            .and_then(|c| c.options.as_deref())
            .unwrap_or(&[])
    }

    pub(crate) fn validate(&self, dialect: &Dialect, path: &str) -> Result<(), ValidationError> {
        if !dialect.is_column_id(&self.id) {
            return Err(ValidationError::IdShapeMismatch {
                field: format!("{path}.id"),
                value: self.id.clone(),
                pattern: dialect.column_id_pattern().to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// ROW
// ============================================================================

/// One record: a mapping from column ID to an arbitrary value.
///
/// The manager stores cells without checking them against column types; strict
/// checking is opt-in through the synthesized row-tool schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub cells: Map<String, Value>,
}

// ============================================================================
// VIEW
// ============================================================================

/// Closed set of filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Is,
    IsNot,
    Contains,
    Gt,
    Lt,
    IsEmpty,
    IsNotEmpty,
}

/// One filter condition of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilter {
    pub id: String,
    pub column_id: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl ViewFilter {
    pub(crate) fn validate(&self, dialect: &Dialect, path: &str) -> Result<(), ValidationError> {
        if !dialect.is_filter_id(&self.id) {
            return Err(ValidationError::IdShapeMismatch {
                field: format!("{path}.id"),
                value: self.id.clone(),
                pattern: dialect.filter_id_pattern().to_string(),
            });
        }
        Ok(())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSort {
    pub column_id: String,
    pub direction: SortDirection,
}

/// A saved presentation (filter/sort/column-visibility/order) over the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub filters: Vec<ViewFilter>,
    pub sorts: Vec<ViewSort>,
    pub hidden_columns: Vec<String>,
    pub column_order: Vec<String>,
}

impl View {
    pub(crate) fn validate(&self, dialect: &Dialect, path: &str) -> Result<(), ValidationError> {
        if !dialect.is_view_id(&self.id) {
            return Err(ValidationError::IdShapeMismatch {
                field: format!("{path}.id"),
                value: self.id.clone(),
                pattern: dialect.view_id_pattern().to_string(),
            });
        }
        for (i, filter) in self.filters.iter().enumerate() {
            filter.validate(dialect, &format!("{path}.filters[{i}]"))?;
        }
        Ok(())
    }
}

// ============================================================================
// SCHEMA ENVELOPE
// ============================================================================

/// Table title and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Advisory agent permissions. Carried as data; the core never reads these to
/// gate its own operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_agent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_agent_create: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_agent_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_agent_delete: Option<bool>,
}

/// Advisory policy envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<AgentPermissions>,
}

/// The table: version tag, metadata, policy, ordered columns/views/rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Envelope alias carried by one wire format; emitted only when present.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
    pub version: String,
    pub metadata: TableMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<TablePolicy>,
    pub columns: Vec<Column>,
    pub views: Vec<View>,
    pub rows: Vec<Row>,
}

impl TableSchema {
    /// A fresh, empty table carrying the dialect's version literal.
    pub fn empty(dialect: &Dialect, title: &str) -> Self {
        TableSchema {
            schema_url: None,
            version: dialect.version.to_string(),
            metadata: TableMetadata {
                title: title.to_string(),
                description: None,
            },
            policy: None,
            columns: Vec::new(),
            views: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Dialect-dependent structural checks: exact version literal and
    /// identifier shapes, with the offending field path in every error.
    pub fn validate(&self, dialect: &Dialect) -> Result<(), ValidationError> {
        if self.version != dialect.version {
            return Err(ValidationError::VersionMismatch {
                expected: dialect.version.to_string(),
                actual: self.version.clone(),
            });
        }
        for (i, column) in self.columns.iter().enumerate() {
            column.validate(dialect, &format!("columns[{i}]"))?;
        }
        for (i, view) in self.views.iter().enumerate() {
            view.validate(dialect, &format!("views[{i}]"))?;
        }
        if dialect.enforce_row_id_shape {
            for (i, row) in self.rows.iter().enumerate() {
                if !dialect.is_row_id(&row.id) {
                    return Err(ValidationError::IdShapeMismatch {
                        field: format!("rows[{i}].id"),
                        value: row.id.clone(),
                        pattern: dialect.row_id_pattern().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Effective advisory permission lookup with a default.
    pub fn permissions(&self) -> AgentPermissions {
        self.policy
            .as_ref()
            .and_then(|p| p.permissions.clone())
            .unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
