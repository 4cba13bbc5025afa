//! Table manager
//!
//! The single mutation authority over one [`TableSchema`] instance. All
//! create/update/delete operations go through the manager, which owns
//! identifier uniqueness (collision-retried generation) and the cascade that
//! keeps views and rows free of dangling column references after a column
//! delete. Reads hand out references into the live schema; callers must not
//! mutate through them.

use crate::{
    Column, ColumnConstraints, ColumnDisplay, ColumnType, Dialect, IdKind, IdSource,
    RandomIdSource, Row, SelectOption, TableError, TableSchema, TabulaResult, View,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Upper bound on identifier-generation retries. Far above any realistic
/// collision count for the short-ID space, so the bound only rules out a
/// pathological infinite loop (e.g. a misbehaving scripted source).
pub const MAX_ID_ATTEMPTS: usize = 4096;

/// Optional fields accepted when creating a column.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub description: Option<String>,
    pub display: Option<ColumnDisplay>,
    pub constraints: Option<ColumnConstraints>,
}

/// Update payload for a column. `Some` fields are applied, `None` fields are
/// left untouched; the ID is never updatable.
#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub description: Option<String>,
    pub display: Option<ColumnDisplay>,
    pub constraints: Option<ColumnConstraints>,
}

/// The single mutation authority over one table.
pub struct TableManager {
    schema: TableSchema,
    dialect: Dialect,
    ids: Box<dyn IdSource>,
}

impl TableManager {
    /// A manager over a fresh, empty table.
    pub fn new(dialect: Dialect) -> Self {
        let mut schema = TableSchema::empty(&dialect, "New Table");
        schema.metadata.description = Some("Created by TableManager".to_string());
        let ids = Box::new(RandomIdSource::new(dialect.clone()));
        TableManager { schema, dialect, ids }
    }

    /// Wrap an existing schema, revalidating it against the dialect.
    pub fn from_schema(schema: TableSchema, dialect: Dialect) -> TabulaResult<Self> {
        schema.validate(&dialect)?;
        let ids = Box::new(RandomIdSource::new(dialect.clone()));
        Ok(TableManager { schema, dialect, ids })
    }

    /// Migrate a raw document and wrap the result.
    pub fn from_document(doc: Value, dialect: Dialect) -> TabulaResult<Self> {
        let schema = crate::migrate_document(doc, &dialect)?;
        let ids = Box::new(RandomIdSource::new(dialect.clone()));
        Ok(TableManager { schema, dialect, ids })
    }

    /// Swap the identifier source. Test seam for forcing collisions.
    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// The live schema. Read-only by convention; all mutation goes through
    /// the manager's operations.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The full untyped document representation of the current schema,
    /// using the exact wire field names.
    pub fn to_document(&self) -> TabulaResult<Value> {
        Ok(serde_json::to_value(&self.schema)?)
    }

    // ========================================================================
    // COLUMN OPERATIONS
    // ========================================================================

    /// Create a column with a fresh collision-free ID and append it.
    pub fn add_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        spec: ColumnSpec,
    ) -> TabulaResult<Column> {
        let id = self.fresh_column_id()?;
        let column = Column {
            id,
            name: name.to_string(),
            column_type,
            description: spec.description,
            display: spec.display,
            constraints: spec.constraints,
        };
        column.validate(&self.dialect, "column")?;
        debug!(id = %column.id, name = %column.name, "added column");
        self.schema.columns.push(column.clone());
        Ok(column)
    }

    /// Linear lookup by ID; `None` when absent.
    pub fn get_column(&self, id: &str) -> Option<&Column> {
        self.schema.columns.iter().find(|c| c.id == id)
    }

    /// Apply an update to an existing column.
    pub fn update_column(&mut self, id: &str, update: ColumnUpdate) -> TabulaResult<Column> {
        let column = self
            .schema
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TableError::ColumnNotFound { id: id.to_string() })?;
        if let Some(name) = update.name {
            column.name = name;
        }
        if let Some(column_type) = update.column_type {
            column.column_type = column_type;
        }
        if let Some(description) = update.description {
            column.description = Some(description);
        }
        if let Some(display) = update.display {
            column.display = Some(display);
        }
        if let Some(constraints) = update.constraints {
            column.constraints = Some(constraints);
        }
        debug!(id = %id, "updated column");
        Ok(column.clone())
    }

    /// Remove a column and every reference to it: the matching cell in each
    /// row, and any filter/sort/hidden/order entry in each view. One call,
    /// nothing left dangling. No-op when the ID is absent.
    pub fn delete_column(&mut self, id: &str) {
        self.schema.columns.retain(|c| c.id != id);
        for row in &mut self.schema.rows {
            row.cells.remove(id);
        }
        for view in &mut self.schema.views {
            view.filters.retain(|f| f.column_id != id);
            view.sorts.retain(|s| s.column_id != id);
            view.hidden_columns.retain(|cid| cid != id);
            view.column_order.retain(|cid| cid != id);
        }
        debug!(id = %id, "deleted column");
    }

    /// Append an option to a select column. Idempotent by option value; the
    /// color of an existing option is left as it was.
    pub fn add_option_to_column(
        &mut self,
        column_id: &str,
        value: &str,
        color: Option<&str>,
    ) -> TabulaResult<Column> {
        let column = self
            .schema
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| TableError::ColumnNotFound {
                id: column_id.to_string(),
            })?;
        if column.column_type != ColumnType::Select {
            return Err(TableError::NotSelectColumn {
                id: column.id.clone(),
                name: column.name.clone(),
            }
            .into());
        }
        let constraints = column.constraints.get_or_insert_with(ColumnConstraints::default);
        let options = constraints.options.get_or_insert_with(Vec::new);
        if !options.iter().any(|o| o.value == value) {
            options.push(SelectOption {
                value: value.to_string(),
                color: color.map(str::to_string),
            });
            debug!(column_id = %column_id, value = %value, "added select option");
        }
        Ok(column.clone())
    }

    // ========================================================================
    // ROW OPERATIONS
    // ========================================================================

    /// Append a row with a fresh collision-free ID. Cell values are stored
    /// as given; they are not checked against column types.
    pub fn add_row(&mut self, cells: Map<String, Value>) -> TabulaResult<Row> {
        let id = self.fresh_row_id()?;
        let row = Row { id, cells };
        debug!(id = %row.id, "added row");
        self.schema.rows.push(row.clone());
        Ok(row)
    }

    /// Merge the given cells over an existing row's cells.
    pub fn update_row(&mut self, id: &str, cells: Map<String, Value>) -> TabulaResult<Row> {
        let row = self
            .schema
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TableError::RowNotFound { id: id.to_string() })?;
        for (key, value) in cells {
            row.cells.insert(key, value);
        }
        debug!(id = %id, "updated row");
        Ok(row.clone())
    }

    /// Remove the matching row. No-op when the ID is absent.
    pub fn delete_row(&mut self, id: &str) {
        self.schema.rows.retain(|r| r.id != id);
        debug!(id = %id, "deleted row");
    }

    // ========================================================================
    // VIEW OPERATIONS
    // ========================================================================

    /// Create a view whose `columnOrder` snapshots the current ordered
    /// column IDs; filters, sorts, and hidden columns start empty.
    pub fn create_view(&mut self, name: &str) -> TabulaResult<View> {
        let id = self.fresh_view_id()?;
        let view = View {
            id,
            name: name.to_string(),
            description: None,
            filters: Vec::new(),
            sorts: Vec::new(),
            hidden_columns: Vec::new(),
            column_order: self.schema.columns.iter().map(|c| c.id.clone()).collect(),
        };
        debug!(id = %view.id, name = %view.name, "created view");
        self.schema.views.push(view.clone());
        Ok(view)
    }

    // ========================================================================
    // IDENTIFIER ALLOCATION
    // ========================================================================

    fn fresh_column_id(&mut self) -> TabulaResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_column_id();
            if !self.schema.columns.iter().any(|c| c.id == id) {
                return Ok(id);
            }
        }
        warn!(kind = ?IdKind::Column, attempts = MAX_ID_ATTEMPTS, "identifier space exhausted");
        Err(TableError::IdSpaceExhausted {
            kind: IdKind::Column,
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }

    fn fresh_view_id(&mut self) -> TabulaResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_view_id();
            if !self.schema.views.iter().any(|v| v.id == id) {
                return Ok(id);
            }
        }
        warn!(kind = ?IdKind::View, attempts = MAX_ID_ATTEMPTS, "identifier space exhausted");
        Err(TableError::IdSpaceExhausted {
            kind: IdKind::View,
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }

    fn fresh_row_id(&mut self) -> TabulaResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_row_id();
            if !self.schema.rows.iter().any(|r| r.id == id) {
                return Ok(id);
            }
        }
        warn!(kind = ?IdKind::Row, attempts = MAX_ID_ATTEMPTS, "identifier space exhausted");
        Err(TableError::IdSpaceExhausted {
            kind: IdKind::Row,
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TabulaError;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Scripted identifier source for forcing collisions deterministically.
    struct ScriptedIds {
        queue: VecDeque<String>,
    }

    impl ScriptedIds {
        fn new(ids: &[&str]) -> Box<Self> {
            Box::new(Self {
                queue: ids.iter().map(|s| s.to_string()).collect(),
            })
        }

        fn pop(&mut self) -> String {
            self.queue.pop_front().unwrap_or_default()
        }
    }

    impl IdSource for ScriptedIds {
        fn next_column_id(&mut self) -> String {
            self.pop()
        }
        fn next_view_id(&mut self) -> String {
            self.pop()
        }
        fn next_filter_id(&mut self) -> String {
            self.pop()
        }
        fn next_row_id(&mut self) -> String {
            self.pop()
        }
    }

    fn cells(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_new_manager_has_empty_schema() {
        let manager = TableManager::new(Dialect::base36());
        let schema = manager.schema();
        assert_eq!(schema.version, "tabula-1.0.0");
        assert_eq!(schema.metadata.title, "New Table");
        assert!(schema.columns.is_empty());
        assert!(schema.views.is_empty());
        assert!(schema.rows.is_empty());
    }

    #[test]
    fn test_add_column_id_matches_pattern() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Name", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        assert!(manager.dialect().is_column_id(&col.id));
        assert_eq!(manager.schema().columns.len(), 1);
    }

    #[test]
    fn test_add_column_ids_stay_unique() {
        let mut manager = TableManager::new(Dialect::base36());
        for i in 0..40 {
            manager
                .add_column(&format!("C{i}"), ColumnType::Text, ColumnSpec::default())
                .unwrap();
        }
        let mut ids: Vec<_> = manager.schema().columns.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40);
    }

    #[test]
    fn test_add_column_retries_on_collision() {
        let mut manager = TableManager::new(Dialect::base36())
            .with_id_source(ScriptedIds::new(&["col_123", "col_123", "col_456"]));
        let first = manager
            .add_column("A", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        assert_eq!(first.id, "col_123");

        // The scripted source repeats col_123 once before yielding col_456.
        let second = manager
            .add_column("B", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        assert_eq!(second.id, "col_456");
        assert_eq!(manager.schema().columns.len(), 2);
    }

    #[test]
    fn test_exhausted_id_space_fails() {
        let script: Vec<&str> = std::iter::repeat("col_aaa")
            .take(MAX_ID_ATTEMPTS + 1)
            .collect();
        let mut manager =
            TableManager::new(Dialect::base36()).with_id_source(ScriptedIds::new(&script));
        manager
            .add_column("A", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let err = manager
            .add_column("B", ColumnType::Text, ColumnSpec::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Table(TableError::IdSpaceExhausted { .. })
        ));
    }

    #[test]
    fn test_get_and_delete_column() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Temp", ColumnType::Number, ColumnSpec::default())
            .unwrap();
        assert!(manager.get_column(&col.id).is_some());

        manager.delete_column(&col.id);
        assert!(manager.get_column(&col.id).is_none());
    }

    #[test]
    fn test_update_column() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Temp", ColumnType::Number, ColumnSpec::default())
            .unwrap();
        let updated = manager
            .update_column(
                &col.id,
                ColumnUpdate {
                    name: Some("Updated".to_string()),
                    ..ColumnUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.column_type, ColumnType::Number);
        assert_eq!(manager.get_column(&col.id).unwrap().name, "Updated");
    }

    #[test]
    fn test_update_missing_column_fails() {
        let mut manager = TableManager::new(Dialect::base36());
        let err = manager
            .update_column("col_zzz", ColumnUpdate::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Table(TableError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_add_row_stores_cells_verbatim() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Name", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let row = manager.add_row(cells(&[(&col.id, json!("Bob"))])).unwrap();
        assert_eq!(row.id.len(), 12);
        assert_eq!(row.cells[&col.id], json!("Bob"));
        assert_eq!(manager.schema().rows.len(), 1);
    }

    #[test]
    fn test_row_id_length_per_dialect() {
        let mut crockford = TableManager::new(Dialect::crockford32());
        let row = crockford.add_row(Map::new()).unwrap();
        assert_eq!(row.id.len(), 13);
    }

    #[test]
    fn test_add_row_does_not_type_check_cells() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Count", ColumnType::Number, ColumnSpec::default())
            .unwrap();
        // A string in a number column is stored as-is.
        let row = manager
            .add_row(cells(&[(&col.id, json!("not a number"))]))
            .unwrap();
        assert_eq!(row.cells[&col.id], json!("not a number"));
    }

    #[test]
    fn test_update_row_merges_cells() {
        let mut manager = TableManager::new(Dialect::base36());
        let a = manager
            .add_column("A", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let b = manager
            .add_column("B", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let row = manager
            .add_row(cells(&[(&a.id, json!("one")), (&b.id, json!("two"))]))
            .unwrap();

        let updated = manager
            .update_row(&row.id, cells(&[(&b.id, json!("three"))]))
            .unwrap();
        assert_eq!(updated.cells[&a.id], json!("one"));
        assert_eq!(updated.cells[&b.id], json!("three"));
    }

    #[test]
    fn test_update_missing_row_fails() {
        let mut manager = TableManager::new(Dialect::base36());
        let err = manager.update_row("nope", Map::new()).unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Table(TableError::RowNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_row() {
        let mut manager = TableManager::new(Dialect::base36());
        let row = manager.add_row(Map::new()).unwrap();
        assert_eq!(manager.schema().rows.len(), 1);
        manager.delete_row(&row.id);
        assert_eq!(manager.schema().rows.len(), 0);
    }

    #[test]
    fn test_deletes_are_idempotent() {
        let mut manager = TableManager::new(Dialect::base36());
        manager
            .add_column("Keep", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        manager.add_row(Map::new()).unwrap();

        manager.delete_column("col_zzz");
        manager.delete_row("000000000zzz");
        assert_eq!(manager.schema().columns.len(), 1);
        assert_eq!(manager.schema().rows.len(), 1);
    }

    #[test]
    fn test_delete_column_cascades_everywhere() {
        let mut manager = TableManager::new(Dialect::base36())
            .with_id_source(ScriptedIds::new(&[
                "col_aaa",
                "col_bbb",
                "000000000001", // row
                "view_vvv",
            ]));
        let doomed = manager
            .add_column("Doomed", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let kept = manager
            .add_column("Kept", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let row = manager
            .add_row(cells(&[
                (&doomed.id, json!("x")),
                (&kept.id, json!("y")),
            ]))
            .unwrap();
        let view = manager.create_view("Everything").unwrap();

        // Wire the view to both columns through every reference kind.
        {
            let view_mut = manager
                .schema
                .views
                .iter_mut()
                .find(|v| v.id == view.id)
                .unwrap();
            view_mut.filters.push(crate::ViewFilter {
                id: "flt_001".to_string(),
                column_id: doomed.id.clone(),
                operator: crate::FilterOperator::Is,
                value: json!("x"),
            });
            view_mut.sorts.push(crate::ViewSort {
                column_id: doomed.id.clone(),
                direction: crate::SortDirection::Asc,
            });
            view_mut.hidden_columns.push(doomed.id.clone());
        }

        manager.delete_column(&doomed.id);

        let schema = manager.schema();
        assert_eq!(schema.columns.len(), 1);
        let row_after = schema.rows.iter().find(|r| r.id == row.id).unwrap();
        assert!(!row_after.cells.contains_key(&doomed.id));
        assert_eq!(row_after.cells[&kept.id], json!("y"));

        let view_after = schema.views.iter().find(|v| v.id == view.id).unwrap();
        assert!(view_after.filters.is_empty());
        assert!(view_after.sorts.is_empty());
        assert!(view_after.hidden_columns.is_empty());
        assert_eq!(view_after.column_order, vec![kept.id.clone()]);
    }

    #[test]
    fn test_create_view_snapshots_column_order() {
        let mut manager = TableManager::new(Dialect::base36());
        let a = manager
            .add_column("A", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let b = manager
            .add_column("B", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let view = manager.create_view("V").unwrap();
        assert_eq!(view.column_order, vec![a.id.clone(), b.id.clone()]);
        assert!(view.filters.is_empty());
        assert!(view.sorts.is_empty());
        assert!(view.hidden_columns.is_empty());

        // Columns added later do not rewrite existing views.
        let c = manager
            .add_column("C", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        let stored = &manager.schema().views[0];
        assert!(!stored.column_order.contains(&c.id));
    }

    #[test]
    fn test_add_option_to_select_column() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Status", ColumnType::Select, ColumnSpec::default())
            .unwrap();

        manager
            .add_option_to_column(&col.id, "In Progress", Some("blue"))
            .unwrap();
        let updated = manager.get_column(&col.id).unwrap();
        assert_eq!(updated.options().len(), 1);
        assert_eq!(updated.options()[0].value, "In Progress");
        assert_eq!(updated.options()[0].color.as_deref(), Some("blue"));

        // Duplicate value is ignored, original color kept.
        manager
            .add_option_to_column(&col.id, "In Progress", Some("red"))
            .unwrap();
        let updated = manager.get_column(&col.id).unwrap();
        assert_eq!(updated.options().len(), 1);
        assert_eq!(updated.options()[0].color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_add_option_rejects_non_select_column() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Count", ColumnType::Number, ColumnSpec::default())
            .unwrap();
        let err = manager.add_option_to_column(&col.id, "One", None).unwrap_err();
        assert!(matches!(
            err,
            TabulaError::Table(TableError::NotSelectColumn { .. })
        ));
    }

    #[test]
    fn test_to_document_uses_wire_names() {
        let mut manager = TableManager::new(Dialect::base36());
        manager
            .add_column("Name", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        manager.create_view("V").unwrap();
        let doc = manager.to_document().unwrap();
        assert_eq!(doc["version"], "tabula-1.0.0");
        assert!(doc["views"][0].get("columnOrder").is_some());
        assert!(doc["views"][0].get("column_order").is_none());
    }

    #[test]
    fn test_from_document_round_trip() {
        let mut manager = TableManager::new(Dialect::base36());
        let col = manager
            .add_column("Name", ColumnType::Text, ColumnSpec::default())
            .unwrap();
        manager.add_row(cells(&[(&col.id, json!("Ada"))])).unwrap();
        let doc = manager.to_document().unwrap();

        let reloaded = TableManager::from_document(doc.clone(), Dialect::base36()).unwrap();
        assert_eq!(reloaded.to_document().unwrap(), doc);
    }
}
