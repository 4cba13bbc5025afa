//! Provider tool-envelope formats
//!
//! Each module wraps the synthesized row-tool schema into the envelope shape
//! one agent-tool-calling convention expects. The schemas themselves come
//! from [`crate::RowToolSchema`]; these types only add the framing.

pub mod anthropic;
pub mod openai;
