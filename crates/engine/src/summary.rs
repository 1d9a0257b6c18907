//! Rendering of resolved inputs into the job summary.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use dispatch_types::{ResolutionResult, SummaryLayout};
use dispatch_util::escape_table_cell;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Environment variable naming the job summary file.
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";
/// Heading written above the inputs table.
pub const SUMMARY_HEADING: &str = "Workflow Inputs";
/// Text written when no input resolved.
pub const NO_INPUTS_MESSAGE: &str = "No inputs provided.";

/// Failure to write the job summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Unable to find environment variable for $GITHUB_STEP_SUMMARY. Check if your runtime environment supports job summaries.")]
    MissingPath,
    #[error("Unable to access summary file: '{path}'. Check if the file has correct read/write permissions.")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write job summary {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `result` as markdown.
///
/// ```rust
/// use dispatch_engine::summary::render_summary;
/// use dispatch_types::{ResolutionResult, ResolvedInput, SummaryLayout};
///
/// let result = ResolutionResult::from_resolved(vec![ResolvedInput::new("version", "1.2.3", "Version Number")]);
/// let markdown = render_summary(&result, SummaryLayout::DescriptionValue);
/// assert!(markdown.contains("| Version Number | 1.2.3 |"));
/// ```
pub fn render_summary(result: &ResolutionResult, layout: SummaryLayout) -> String {
    let mut markdown = format!("## {}\n\n", SUMMARY_HEADING);

    let ResolutionResult::Inputs(inputs) = result else {
        markdown.push_str(NO_INPUTS_MESSAGE);
        markdown.push('\n');
        return markdown;
    };

    let headers = layout.headers();
    markdown.push_str(&table_row(headers.iter().map(|header| header.to_string())));
    markdown.push_str(&table_row(headers.iter().map(|_| "---".to_string())));

    for input in inputs {
        let row = match layout {
            SummaryLayout::DescriptionValue => table_row([escape_table_cell(&input.description), escape_table_cell(&input.value)]),
            SummaryLayout::NameDescriptionValue => table_row([
                escape_table_cell(&input.name),
                escape_table_cell(&input.description),
                escape_table_cell(&input.value),
            ]),
        };
        markdown.push_str(&row);
    }

    markdown
}

fn table_row(cells: impl IntoIterator<Item = String>) -> String {
    let cells: Vec<String> = cells.into_iter().collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Persists the resolution outcome to the run's report.
#[async_trait]
pub trait SummarySink: Send + Sync {
    async fn save_inputs(&self, result: &ResolutionResult) -> Result<(), SummaryError>;
}

#[async_trait]
impl<S: SummarySink + ?Sized> SummarySink for Arc<S> {
    async fn save_inputs(&self, result: &ResolutionResult) -> Result<(), SummaryError> {
        (**self).save_inputs(result).await
    }
}

/// Appends the rendered summary to the `GITHUB_STEP_SUMMARY` file.
#[derive(Debug, Clone)]
pub struct JobSummaryWriter {
    path: Option<PathBuf>,
    layout: SummaryLayout,
}

impl JobSummaryWriter {
    /// `path` is the configured summary file; `None` makes every write fail.
    pub fn new(path: Option<PathBuf>, layout: SummaryLayout) -> Self {
        Self { path, layout }
    }
}

#[async_trait]
impl SummarySink for JobSummaryWriter {
    async fn save_inputs(&self, result: &ResolutionResult) -> Result<(), SummaryError> {
        let path = self.path.as_ref().ok_or(SummaryError::MissingPath)?;
        let markdown = render_summary(result, self.layout);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|source| SummaryError::Access {
                path: path.clone(),
                source,
            })?;
        let write_error = |source: std::io::Error| SummaryError::Write {
            path: path.clone(),
            source,
        };
        file.write_all(markdown.as_bytes()).await.map_err(write_error)?;
        file.flush().await.map_err(write_error)?;

        match result {
            ResolutionResult::NoInputs => info!("No workflow_dispatch inputs found."),
            ResolutionResult::Inputs(inputs) => info!("Displayed {} input(s) in Job Summary", inputs.len()),
        }
        Ok(())
    }
}

/// Keeps rendered summaries in memory.
#[derive(Debug, Default)]
pub struct MemorySummarySink {
    layout: SummaryLayout,
    rendered: Mutex<Vec<String>>,
}

impl MemorySummarySink {
    pub fn new(layout: SummaryLayout) -> Self {
        Self {
            layout,
            rendered: Mutex::new(Vec::new()),
        }
    }

    /// Every summary saved so far, oldest first.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().map(|rendered| rendered.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SummarySink for MemorySummarySink {
    async fn save_inputs(&self, result: &ResolutionResult) -> Result<(), SummaryError> {
        let markdown = render_summary(result, self.layout);
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push(markdown);
        }
        Ok(())
    }
}
