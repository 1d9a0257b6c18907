//! Utility functions shared by the dispatch inputs crates.

pub mod text_processing;
pub mod workflow_commands;

pub use text_processing::{escape_table_cell, redact_json, redact_sensitive};
pub use workflow_commands::{Annotation, format_command};
