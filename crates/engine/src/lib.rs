//! # Dispatch Engine
//!
//! Resolves the inputs of a manually dispatched workflow run and writes them to
//! the job summary.
//!
//! ## Flow
//!
//! 1. A [`DefinitionSource`] loads the workflow file and extracts the declared
//!    `workflow_dispatch` inputs.
//! 2. An [`InputValueSource`] answers which of those inputs received a value.
//! 3. [`resolve_inputs`] pairs declarations with values in declared order.
//! 4. A [`SummarySink`] renders the outcome into the job summary.
//!
//! [`DisplayInputs`] wires the three ports together and [`run_action`] gates the
//! whole flow on the triggering event.
//!
//! ## Usage
//!
//! ```rust
//! use dispatch_engine::{
//!     DisplayInputs, EnvironmentValueSource, FileDefinitionSource, MemorySummarySink, RunOutcome, run_action,
//! };
//! use dispatch_types::SummaryLayout;
//!
//! # tokio::runtime::Runtime::new()?.block_on(async {
//! let temp_dir = tempfile::tempdir()?;
//! let workflow_path = temp_dir.path().join("deploy.yml");
//! std::fs::write(&workflow_path, r#"
//! on:
//!   workflow_dispatch:
//!     inputs:
//!       environment:
//!         description: Deployment Environment
//! "#)?;
//!
//! let use_case = DisplayInputs::new(
//!     Box::new(FileDefinitionSource::new(&workflow_path, None)),
//!     Box::new(EnvironmentValueSource::from_vars([("INPUT_ENVIRONMENT", "staging")])),
//!     Box::new(MemorySummarySink::new(SummaryLayout::DescriptionValue)),
//! );
//!
//! let RunOutcome::Completed(result) = run_action("workflow_dispatch", &use_case).await else {
//!     panic!("expected a completed run");
//! };
//! assert_eq!(result.inputs()[0].value, "staging");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod config;
pub mod definition;
pub mod naming;
pub mod resolve;
pub mod source;
pub mod summary;
pub mod use_case;
pub mod values;

pub use action::{RunOutcome, WORKFLOW_DISPATCH_EVENT, run_action, skip_unless_dispatch};
pub use config::{ActionConfig, ConfigError, event_name_from_env};
pub use definition::{DefinitionError, parse_input_definitions};
pub use naming::{env_key_for_input, input_name_from_env_key};
pub use resolve::resolve_inputs;
pub use source::{DefinitionSource, FetchError, FileDefinitionSource, GitHubDefinitionSource};
pub use summary::{JobSummaryWriter, MemorySummarySink, SummaryError, SummarySink, render_summary};
pub use use_case::DisplayInputs;
pub use values::{EnvironmentValueSource, EventPayloadValueSource, InputValueSource, ValueSourceError, value_source_for};
