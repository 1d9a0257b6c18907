//! Entry gate for a single action run.

use dispatch_types::ResolutionResult;
use tracing::{info, warn};

use crate::use_case::DisplayInputs;

/// Event name of a manually dispatched workflow run.
pub const WORKFLOW_DISPATCH_EVENT: &str = "workflow_dispatch";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The triggering event was not `workflow_dispatch`; nothing ran.
    Skipped { event_name: String },
    Completed(ResolutionResult),
    /// The summary could not be saved. Holds the error message verbatim.
    Failed(String),
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }
}

/// Returns [`RunOutcome::Skipped`] unless `event_name` is `workflow_dispatch`.
///
/// Callers check this before reading any other configuration so a skipped run
/// never fails.
pub fn skip_unless_dispatch(event_name: &str) -> Option<RunOutcome> {
    if event_name == WORKFLOW_DISPATCH_EVENT {
        return None;
    }

    warn!("This action is designed for workflow_dispatch events only. Current event: {}", event_name);
    info!("Skipping action execution.");
    Some(RunOutcome::Skipped {
        event_name: event_name.to_string(),
    })
}

/// Runs `use_case` when `event_name` is `workflow_dispatch`, otherwise skips.
pub async fn run_action(event_name: &str, use_case: &DisplayInputs) -> RunOutcome {
    if let Some(skipped) = skip_unless_dispatch(event_name) {
        return skipped;
    }

    match use_case.execute().await {
        Ok(result) => RunOutcome::Completed(result),
        Err(error) => RunOutcome::Failed(error.to_string()),
    }
}
