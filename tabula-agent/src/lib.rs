//! TABULA Agent - Tool-Calling Surface
//!
//! Everything an LLM agent needs to drive a TABULA table: a markdown
//! description of the table state, a strict row-creation schema synthesized
//! from the live column set on every call, adapters into the OpenAI and
//! Anthropic tool envelope formats, and legacy string-contract tools that
//! never fail - they render errors into their result instead.
//!
//! The core manager stays the single mutation authority; this crate reads
//! through [`tabula_core::TableManager`] and routes all writes through it.

pub mod agent;
pub mod providers;
pub mod tool_schema;

pub use agent::TableAgent;
pub use tool_schema::{CellProperty, CellType, RowToolSchema};
