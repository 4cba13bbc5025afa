//! TABULA Core - Schema Data Model and Table Manager
//!
//! In-memory, schema-validated tabular data model: typed columns, rows, and
//! saved views, mutated exclusively through a single [`TableManager`] and
//! round-tripped as JSON documents. Two wire dialects share this one
//! implementation; see [`Dialect`].
//!
//! Everything here is synchronous, single-threaded, and free of I/O. The
//! embedding application owns loading/persisting documents; this crate only
//! consumes and produces decoded `serde_json::Value` trees.

pub mod dialect;
pub mod error;
pub mod ids;
pub mod manager;
pub mod migrate;
pub mod schema;

pub use dialect::{
    Dialect, COLUMN_ID_PREFIX, FILTER_ID_PREFIX, ROW_SUFFIX_WIDTH, SHORT_SUFFIX_WIDTH,
    VIEW_ID_PREFIX,
};
pub use error::{TableError, TabulaError, TabulaResult, ValidationError};
pub use ids::{encode_fixed, random_suffix, IdKind, IdSource, RandomIdSource};
pub use manager::{ColumnSpec, ColumnUpdate, TableManager, MAX_ID_ATTEMPTS};
pub use migrate::{migrate_document, validate_document};
pub use schema::{
    AgentPermissions, Column, ColumnConstraints, ColumnDisplay, ColumnType, FilterOperator, Row,
    SelectOption, SortDirection, TableMetadata, TablePolicy, TableSchema, View, ViewFilter,
    ViewSort,
};
