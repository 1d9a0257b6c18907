//! Where workflow definitions come from.
//!
//! [`DefinitionSource`] reports failures as a tagged [`FetchError`] instead of
//! swallowing them, so callers can tell "nothing declared" apart from "could
//! not fetch". The use case decides to degrade both to an empty declaration
//! map.

use std::path::PathBuf;

use async_trait::async_trait;
use dispatch_api::{ApiError, GitHubClient};
use dispatch_types::{ReferenceError, WorkflowInfo, WorkflowRef};
use thiserror::Error;
use tracing::{debug, info};

use crate::definition::{DefinitionError, parse_input_definitions};

/// Why a workflow definition could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GITHUB_WORKFLOW_REF environment variable is not set")]
    MissingReference,
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error("failed to fetch workflow file: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read workflow file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Produces the declared inputs of the workflow being run.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn fetch_workflow_info(&self) -> Result<WorkflowInfo, FetchError>;
}

/// Parses an optional workflow reference string.
fn parse_reference(workflow_ref: Option<&str>) -> Result<WorkflowRef, FetchError> {
    let raw = workflow_ref
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(FetchError::MissingReference)?;
    Ok(WorkflowRef::parse(raw)?)
}

/// Fetches the workflow file through the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GitHubDefinitionSource {
    client: GitHubClient,
    workflow_ref: Option<String>,
}

impl GitHubDefinitionSource {
    /// `workflow_ref` is the raw `GITHUB_WORKFLOW_REF` value; it is parsed on fetch.
    pub fn new(client: GitHubClient, workflow_ref: Option<String>) -> Self {
        Self { client, workflow_ref }
    }
}

#[async_trait]
impl DefinitionSource for GitHubDefinitionSource {
    async fn fetch_workflow_info(&self) -> Result<WorkflowInfo, FetchError> {
        let reference = parse_reference(self.workflow_ref.as_deref())?;
        debug!(
            owner = %reference.owner,
            repo = %reference.repo,
            workflow = %reference.workflow_file,
            git_ref = %reference.git_ref,
            "fetching workflow definition"
        );

        let content = self
            .client
            .fetch_file_content(&reference.owner, &reference.repo, &reference.path(), &reference.git_ref)
            .await?;
        let inputs = parse_input_definitions(&content)?;

        info!(workflow = %reference, inputs = inputs.len(), "loaded workflow definition");
        Ok(WorkflowInfo::new(Some(reference), inputs))
    }
}

/// Reads the workflow file from a local checkout.
#[derive(Debug, Clone)]
pub struct FileDefinitionSource {
    path: PathBuf,
    workflow_ref: Option<String>,
}

impl FileDefinitionSource {
    pub fn new(path: impl Into<PathBuf>, workflow_ref: Option<String>) -> Self {
        Self {
            path: path.into(),
            workflow_ref,
        }
    }
}

#[async_trait]
impl DefinitionSource for FileDefinitionSource {
    async fn fetch_workflow_info(&self) -> Result<WorkflowInfo, FetchError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        let inputs = parse_input_definitions(&content)?;

        // The reference only labels the definition here; a bad one is not fatal.
        let reference = parse_reference(self.workflow_ref.as_deref()).ok();
        info!(path = %self.path.display(), inputs = inputs.len(), "loaded workflow definition from file");
        Ok(WorkflowInfo::new(reference, inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKFLOW: &str = "on:\n  workflow_dispatch:\n    inputs:\n      environment:\n        description: Deployment Environment\n";

    #[test]
    fn parse_reference_distinguishes_missing_and_malformed() {
        assert!(matches!(parse_reference(None), Err(FetchError::MissingReference)));
        assert!(matches!(parse_reference(Some("  ")), Err(FetchError::MissingReference)));
        assert!(matches!(
            parse_reference(Some("not-a-ref")),
            Err(FetchError::Reference(ReferenceError::Malformed(_)))
        ));
        assert!(parse_reference(Some("o/r/.github/workflows/ci.yml@refs/heads/main")).is_ok());
    }

    #[tokio::test]
    async fn github_source_fails_closed_without_reference() {
        let client = GitHubClient::new("https://api.github.com", None).expect("build client");

        let missing = GitHubDefinitionSource::new(client.clone(), None);
        assert!(matches!(missing.fetch_workflow_info().await, Err(FetchError::MissingReference)));

        let malformed = GitHubDefinitionSource::new(client, Some("owner/repo/workflow.yml".into()));
        assert!(matches!(malformed.fetch_workflow_info().await, Err(FetchError::Reference(_))));
    }

    #[tokio::test]
    async fn file_source_reads_local_definition() {
        let directory = tempfile::tempdir().expect("create temp dir");
        let path = directory.path().join("deploy.yml");
        std::fs::write(&path, WORKFLOW).expect("write workflow");

        let source = FileDefinitionSource::new(&path, Some("owner/repo/.github/workflows/deploy.yml@refs/tags/v1".into()));
        let info = source.fetch_workflow_info().await.expect("read workflow");
        assert_eq!(info.inputs.len(), 1);
        assert_eq!(info.reference.map(|reference| reference.git_ref), Some("v1".to_string()));
    }

    #[tokio::test]
    async fn file_source_reports_io_and_parse_failures() {
        let directory = tempfile::tempdir().expect("create temp dir");

        let missing = FileDefinitionSource::new(directory.path().join("missing.yml"), None);
        assert!(matches!(missing.fetch_workflow_info().await, Err(FetchError::Io { .. })));

        let invalid_path = directory.path().join("invalid.yml");
        std::fs::write(&invalid_path, "on: [unterminated").expect("write workflow");
        let invalid = FileDefinitionSource::new(&invalid_path, None);
        assert!(matches!(invalid.fetch_workflow_info().await, Err(FetchError::Definition(_))));
    }
}
