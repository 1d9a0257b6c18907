//! The fetch, resolve, save flow behind a single run.

use dispatch_types::{ResolutionResult, WorkflowInfo};
use dispatch_util::redact_sensitive;
use tracing::{debug, warn};

use crate::{
    resolve::resolve_inputs,
    source::DefinitionSource,
    summary::{SummaryError, SummarySink},
    values::InputValueSource,
};

/// Displays the inputs of the current run in the job summary.
pub struct DisplayInputs {
    definitions: Box<dyn DefinitionSource>,
    values: Box<dyn InputValueSource>,
    sink: Box<dyn SummarySink>,
}

impl DisplayInputs {
    pub fn new(definitions: Box<dyn DefinitionSource>, values: Box<dyn InputValueSource>, sink: Box<dyn SummarySink>) -> Self {
        Self { definitions, values, sink }
    }

    /// Runs the flow once.
    ///
    /// A definition that cannot be fetched is logged and treated as declaring
    /// nothing. Only a failure to save the summary is returned.
    pub async fn execute(&self) -> Result<ResolutionResult, SummaryError> {
        let info = match self.definitions.fetch_workflow_info().await {
            Ok(info) => info,
            Err(error) => {
                warn!(error = %error, "could not load workflow definition; continuing without declared inputs");
                WorkflowInfo::empty()
            }
        };

        let supplied = self.values.supplied_inputs();
        debug!(source = %self.values.kind(), count = supplied.len(), "supplied inputs");
        for (name, value) in &supplied {
            debug!(input = %name, value = %redact_sensitive(value), "supplied input");
        }

        let result = resolve_inputs(&info.inputs, self.values.as_ref());
        self.sink.save_inputs(&result).await?;
        Ok(result)
    }
}
