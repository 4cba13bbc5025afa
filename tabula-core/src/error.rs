//! Error types for TABULA operations

use crate::IdKind;
use thiserror::Error;

/// Structural validation errors.
/// Raised when a document or entity does not match the schema shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Constraint violation on {constraint}: {reason}")]
    ConstraintViolation { constraint: String, reason: String },

    #[error("Unsupported schema version: expected {expected:?}, got {actual:?}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Invalid identifier at {field}: {value:?} does not match {pattern}")]
    IdShapeMismatch {
        field: String,
        value: String,
        pattern: String,
    },

    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("Document root must be a JSON object")]
    NotAnObject,
}

/// Table mutation errors.
/// Absent entities on delete/get are no-ops, never errors; these variants
/// cover the operations that do require their target to exist.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Column not found: {id}")]
    ColumnNotFound { id: String },

    #[error("Row not found: {id}")]
    RowNotFound { id: String },

    #[error("Column \"{name}\" is not a select column, cannot add options")]
    NotSelectColumn { id: String, name: String },

    #[error("Identifier space exhausted for {kind:?} after {attempts} attempts")]
    IdSpaceExhausted { kind: IdKind, attempts: usize },
}

/// Master error type for all TABULA operations.
#[derive(Debug, Clone, Error)]
pub enum TabulaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        TabulaError::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for TABULA operations.
pub type TabulaResult<T> = Result<T, TabulaError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_version_mismatch() {
        let err = ValidationError::VersionMismatch {
            expected: "tabula-1.0.0".to_string(),
            actual: "2.0.0".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Unsupported schema version"));
        assert!(msg.contains("tabula-1.0.0"));
        assert!(msg.contains("2.0.0"));
    }

    #[test]
    fn test_validation_error_display_id_shape_mismatch() {
        let err = ValidationError::IdShapeMismatch {
            field: "columns[0].id".to_string(),
            value: "bogus".to_string(),
            pattern: "^col_[0-9a-z]{3}$".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("columns[0].id"));
        assert!(msg.contains("bogus"));
        assert!(msg.contains("^col_[0-9a-z]{3}$"));
    }

    #[test]
    fn test_table_error_display_not_select_column() {
        let err = TableError::NotSelectColumn {
            id: "col_abc".to_string(),
            name: "Count".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Count"));
        assert!(msg.contains("not a select column"));
    }

    #[test]
    fn test_table_error_display_id_space_exhausted() {
        let err = TableError::IdSpaceExhausted {
            kind: IdKind::Column,
            attempts: 4096,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Column"));
        assert!(msg.contains("4096"));
    }

    #[test]
    fn test_tabula_error_from_variants() {
        let validation = TabulaError::from(ValidationError::NotAnObject);
        assert!(matches!(validation, TabulaError::Validation(_)));

        let table = TabulaError::from(TableError::ColumnNotFound {
            id: "col_xyz".to_string(),
        });
        assert!(matches!(table, TabulaError::Table(_)));
    }
}
