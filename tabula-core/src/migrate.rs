//! Document validation and migration
//!
//! [`validate_document`] is the named entry point for strict validation of a
//! decoded document. [`migrate_document`] normalizes a loosely-shaped input
//! first: absent top-level fields get defaults, present fields are never
//! overwritten, then the result goes through the same strict validation.

use crate::{Dialect, TableSchema, TabulaResult, ValidationError};
use serde_json::{json, Value};

/// Validate a decoded document against the dialect's schema shape.
pub fn validate_document(doc: &Value, dialect: &Dialect) -> TabulaResult<TableSchema> {
    let schema: TableSchema = serde_json::from_value(doc.clone()).map_err(|e| {
        ValidationError::MalformedDocument {
            reason: e.to_string(),
        }
    })?;
    schema.validate(dialect)?;
    Ok(schema)
}

/// Fill defaults for missing top-level fields, then validate.
///
/// Defaults: the dialect's version literal, empty `columns`/`views`/`rows`
/// lists, and `{"title": "Migrated Table"}` metadata. Only absent fields are
/// touched.
pub fn migrate_document(doc: Value, dialect: &Dialect) -> TabulaResult<TableSchema> {
    let mut map = match doc {
        Value::Object(map) => map,
        _ => return Err(ValidationError::NotAnObject.into()),
    };

    map.entry("version")
        .or_insert_with(|| Value::String(dialect.version.to_string()));
    map.entry("columns").or_insert_with(|| json!([]));
    map.entry("views").or_insert_with(|| json!([]));
    map.entry("rows").or_insert_with(|| json!([]));
    map.entry("metadata")
        .or_insert_with(|| json!({ "title": "Migrated Table" }));

    validate_document(&Value::Object(map), dialect)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TabulaError;
    use serde_json::json;

    #[test]
    fn test_migrate_empty_object_fills_defaults() {
        for dialect in [Dialect::base36(), Dialect::crockford32()] {
            let schema = migrate_document(json!({}), &dialect).unwrap();
            assert_eq!(schema.version, dialect.version);
            assert_eq!(schema.metadata.title, "Migrated Table");
            assert!(schema.columns.is_empty());
            assert!(schema.views.is_empty());
            assert!(schema.rows.is_empty());
        }
    }

    #[test]
    fn test_migrate_rejects_non_object_input() {
        for doc in [json!([]), json!("table"), json!(42), json!(null)] {
            let err = migrate_document(doc, &Dialect::base36()).unwrap_err();
            assert!(matches!(
                err,
                TabulaError::Validation(ValidationError::NotAnObject)
            ));
        }
    }

    #[test]
    fn test_migrate_never_overwrites_present_fields() {
        let doc = json!({
            "metadata": { "title": "Inventory" },
            "columns": [{ "id": "col_abc", "name": "SKU", "type": "text" }],
        });
        let schema = migrate_document(doc, &Dialect::base36()).unwrap();
        assert_eq!(schema.metadata.title, "Inventory");
        assert_eq!(schema.columns.len(), 1);
        assert_eq!(schema.version, "tabula-1.0.0");
    }

    #[test]
    fn test_migrate_keeps_existing_version_even_when_stale() {
        // A present-but-wrong version is not rewritten; it fails validation.
        let doc = json!({ "version": "0.1.0" });
        let err = migrate_document(doc, &Dialect::base36()).unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Validation(ValidationError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_reports_malformed_shapes() {
        let doc = json!({
            "version": "tabula-1.0.0",
            "metadata": { "title": "T" },
            "columns": "not an array",
            "views": [],
            "rows": [],
        });
        let err = validate_document(&doc, &Dialect::base36()).unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Validation(ValidationError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_validate_requires_version_field() {
        let doc = json!({
            "metadata": { "title": "T" },
            "columns": [],
            "views": [],
            "rows": [],
        });
        assert!(validate_document(&doc, &Dialect::base36()).is_err());
    }
}
