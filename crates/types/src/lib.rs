//! Shared type definitions for the dispatch inputs summary.
//!
//! - [`workflow`]: declared `workflow_dispatch` inputs and workflow coordinates
//! - [`inputs`]: resolved inputs and the resolution outcome
//! - [`settings`]: configuration enumerations (value source, summary layout)

pub mod inputs;
pub mod settings;
pub mod workflow;

pub use inputs::{ResolutionResult, ResolvedInput, ResolvedInputs};
pub use settings::{SummaryLayout, ValueSourceKind};
pub use workflow::{DeclaredInput, DeclaredInputs, InputDefault, ReferenceError, WorkflowInfo, WorkflowRef};
