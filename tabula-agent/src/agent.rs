//! Agent-facing tooling over one table
//!
//! [`TableAgent`] wraps a [`TableManager`] and exposes the surfaces an LLM
//! agent drives: a markdown rendering of the table state, the row-tool schema
//! synthesized fresh from the current columns, provider envelope formatting,
//! and the legacy tools whose contract with the agent caller is "always
//! return a string, never fail" - every error is rendered into the result.
//!
//! Advisory policy permissions are consulted here and only here; the core
//! manager never reads them.

use crate::providers::{anthropic, openai};
use crate::RowToolSchema;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use tabula_core::{ColumnSpec, ColumnType, TableManager};
use tracing::debug;

/// Agent tooling over one managed table.
pub struct TableAgent {
    manager: TableManager,
}

impl TableAgent {
    pub fn new(manager: TableManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &TableManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut TableManager {
        &mut self.manager
    }

    pub fn into_manager(self) -> TableManager {
        self.manager
    }

    /// "The eyes": a markdown description of the current table state.
    pub fn describe_table(&self) -> String {
        let schema = self.manager.schema();
        let meta = &schema.metadata;

        let mut out = format!(
            "# {}\n{}\n\n",
            meta.title,
            meta.description.as_deref().unwrap_or("")
        );

        out.push_str("## Columns\n");
        for col in &schema.columns {
            let _ = writeln!(out, "- **{}** ({}) [ID: {}]", col.name, col.column_type, col.id);
            if let Some(description) = &col.description {
                let _ = writeln!(out, "  - Description: {description}");
            }
            if !col.options().is_empty() {
                let values: Vec<&str> = col.options().iter().map(|o| o.value.as_str()).collect();
                let _ = writeln!(out, "  - Options: {}", values.join(", "));
            }
        }

        out.push_str("\n## Views\n");
        if schema.views.is_empty() {
            out.push_str("(No views defined)\n");
        } else {
            for view in &schema.views {
                let _ = writeln!(out, "- **{}** [ID: {}]", view.name, view.id);
            }
        }

        let _ = write!(out, "\n## Row Count: {}\n", schema.rows.len());
        out
    }

    /// The row-tool schema for the current columns. Synthesized on every
    /// call; never cached.
    pub fn row_tool_schema(&self) -> RowToolSchema {
        RowToolSchema::from_columns(&self.manager.schema().columns)
    }

    /// The row tool wrapped in the OpenAI function-calling envelope.
    pub fn openai_tool(&self, name: &str, description: &str) -> openai::FunctionTool {
        openai::FunctionTool::from_schema(&self.row_tool_schema(), name, description)
    }

    /// The row tool wrapped in the Anthropic tool-use envelope.
    pub fn anthropic_tool(&self, name: &str, description: &str) -> anthropic::ToolDefinition {
        anthropic::ToolDefinition::from_schema(&self.row_tool_schema(), name, description)
    }

    // ========================================================================
    // LEGACY STRING-CONTRACT TOOLS
    // ========================================================================

    /// Add a column. The type arrives as the agent's literal string.
    pub fn tool_add_column(
        &mut self,
        name: &str,
        column_type: &str,
        description: Option<&str>,
    ) -> String {
        debug!(tool = "add_column", name = %name, "tool call");
        let column_type: ColumnType = match column_type.parse() {
            Ok(t) => t,
            Err(e) => return format!("Error: {e}"),
        };
        let spec = ColumnSpec {
            description: description.map(str::to_string),
            ..ColumnSpec::default()
        };
        match self.manager.add_column(name, column_type, spec) {
            Ok(col) => format!("Success: Added column \"{}\" with ID {}", col.name, col.id),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Add a row from a `cells` document keyed by column ID.
    pub fn tool_add_row(&mut self, cells: Map<String, Value>) -> String {
        debug!(tool = "add_row", "tool call");
        if !self
            .manager
            .schema()
            .permissions()
            .allow_agent_create
            .unwrap_or(true)
        {
            return "Permission Denied: Agent is not allowed to create rows.".to_string();
        }
        match self.manager.add_row(cells) {
            Ok(row) => format!("Success: Added row with ID {}", row.id),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Merge cells over an existing row.
    pub fn tool_update_row(&mut self, row_id: &str, cells: Map<String, Value>) -> String {
        debug!(tool = "update_row", row_id = %row_id, "tool call");
        if !self
            .manager
            .schema()
            .permissions()
            .allow_agent_update
            .unwrap_or(true)
        {
            return "Permission Denied: Agent is not allowed to update rows.".to_string();
        }
        match self.manager.update_row(row_id, cells) {
            Ok(row) => format!("Success: Updated row {}", row.id),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Add an option to a select column.
    pub fn tool_add_select_option(
        &mut self,
        column_id: &str,
        value: &str,
        color: Option<&str>,
    ) -> String {
        debug!(tool = "add_select_option", column_id = %column_id, "tool call");
        if !self
            .manager
            .schema()
            .permissions()
            .allow_agent_update
            .unwrap_or(true)
        {
            return "Permission Denied: Agent is not allowed to update columns.".to_string();
        }
        match self.manager.add_option_to_column(column_id, value, color) {
            Ok(_) => format!("Success: Added option \"{value}\" to column {column_id}"),
            Err(e) => format!("Error: {e}"),
        }
    }

    /// Delete a row. Deleting an absent row still reports success; the
    /// operation is an idempotent no-op.
    pub fn tool_delete_row(&mut self, row_id: &str) -> String {
        debug!(tool = "delete_row", row_id = %row_id, "tool call");
        self.manager.delete_row(row_id);
        format!("Success: Deleted row {row_id}")
    }
}

// =============================================================================
// TESTS
// =============================================================================
