use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use dispatch_engine::{
    DefinitionSource, DisplayInputs, EnvironmentValueSource, EventPayloadValueSource, FetchError, FileDefinitionSource,
    JobSummaryWriter, RunOutcome, SummaryError, SummarySink, parse_input_definitions, run_action,
};
use dispatch_types::{ResolutionResult, ResolvedInput, SummaryLayout, WorkflowInfo, WorkflowRef};
use serde_json::json;

const WITH_INPUTS: &str = include_str!("data/test-with-inputs.yml");
const WITHOUT_INPUTS: &str = include_str!("data/test-without-inputs.yml");
const WORKFLOW_REF: &str = "owner/repo/.github/workflows/test-with-inputs.yml@refs/heads/main";

/// Returns a fixed definition and counts how often it was asked.
#[derive(Clone)]
struct StubDefinitions {
    info: Option<WorkflowInfo>,
    calls: Arc<AtomicUsize>,
}

impl StubDefinitions {
    fn returning(content: &str) -> Self {
        let inputs = parse_input_definitions(content).expect("parse fixture");
        let reference = WorkflowRef::parse(WORKFLOW_REF).ok();
        Self {
            info: Some(WorkflowInfo::new(reference, inputs)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            info: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefinitionSource for StubDefinitions {
    async fn fetch_workflow_info(&self) -> Result<WorkflowInfo, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.info.clone().ok_or(FetchError::MissingReference)
    }
}

/// Records every result it is asked to save, optionally failing.
#[derive(Clone, Default)]
struct SpySink {
    saved: Arc<Mutex<Vec<ResolutionResult>>>,
    fail_with: Option<PathBuf>,
}

impl SpySink {
    fn failing_at(path: &str) -> Self {
        Self {
            fail_with: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    fn saved(&self) -> Vec<ResolutionResult> {
        self.saved.lock().expect("spy lock").clone()
    }
}

#[async_trait]
impl SummarySink for SpySink {
    async fn save_inputs(&self, result: &ResolutionResult) -> Result<(), SummaryError> {
        if let Some(path) = &self.fail_with {
            return Err(SummaryError::Access {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        self.saved.lock().expect("spy lock").push(result.clone());
        Ok(())
    }
}

fn deployment_values() -> EnvironmentValueSource {
    EnvironmentValueSource::from_vars([
        ("INPUT_ENVIRONMENT", "production"),
        ("INPUT_VERSION", "1.2.3"),
        ("INPUT_ENABLE_DEBUG", "true"),
    ])
}

#[tokio::test]
async fn dispatch_run_summarizes_supplied_inputs_in_declared_order() {
    let definitions = StubDefinitions::returning(WITH_INPUTS);
    let sink = SpySink::default();
    let use_case = DisplayInputs::new(Box::new(definitions.clone()), Box::new(deployment_values()), Box::new(sink.clone()));

    let outcome = run_action("workflow_dispatch", &use_case).await;

    let expected = ResolutionResult::from_resolved(vec![
        ResolvedInput::new("environment", "production", "Deployment Environment"),
        ResolvedInput::new("version", "1.2.3", "Version Number"),
        ResolvedInput::new("enable-debug", "true", "Enable Debug Mode"),
    ]);
    assert_eq!(outcome, RunOutcome::Completed(expected.clone()));
    assert_eq!(sink.saved(), vec![expected]);
    assert_eq!(definitions.call_count(), 1);
}

#[tokio::test]
async fn event_payload_values_fall_back_to_name_without_description() {
    let values = EventPayloadValueSource::from_payload(&json!({
        "inputs": {
            "environment": "production",
            "version": "2.0.1",
            "enable-debug": "true",
            "log-level": "debug",
            "notes": "Test deployment"
        }
    }));
    let sink = SpySink::default();
    let use_case = DisplayInputs::new(Box::new(StubDefinitions::returning(WITH_INPUTS)), Box::new(values), Box::new(sink.clone()));

    let RunOutcome::Completed(result) = run_action("workflow_dispatch", &use_case).await else {
        panic!("expected completed run");
    };

    assert_eq!(result.len(), 5);
    assert_eq!(result.inputs()[4], ResolvedInput::new("notes", "Test deployment", "notes"));
}

#[tokio::test]
async fn workflow_without_inputs_saves_sentinel() {
    let sink = SpySink::default();
    let use_case = DisplayInputs::new(
        Box::new(StubDefinitions::returning(WITHOUT_INPUTS)),
        Box::new(deployment_values()),
        Box::new(sink.clone()),
    );

    let outcome = run_action("workflow_dispatch", &use_case).await;

    assert_eq!(outcome, RunOutcome::Completed(ResolutionResult::NoInputs));
    assert_eq!(sink.saved(), vec![ResolutionResult::NoInputs]);
}

#[tokio::test]
async fn definition_fetch_failure_still_completes_with_sentinel() {
    let sink = SpySink::default();
    let use_case = DisplayInputs::new(Box::new(StubDefinitions::failing()), Box::new(deployment_values()), Box::new(sink.clone()));

    let outcome = run_action("workflow_dispatch", &use_case).await;

    assert_eq!(outcome, RunOutcome::Completed(ResolutionResult::NoInputs));
    assert_eq!(sink.saved(), vec![ResolutionResult::NoInputs]);
}

#[tokio::test]
async fn summary_failure_fails_the_run_with_its_message() {
    let sink = SpySink::failing_at("/readonly/summary.md");
    let use_case = DisplayInputs::new(
        Box::new(StubDefinitions::returning(WITH_INPUTS)),
        Box::new(deployment_values()),
        Box::new(sink.clone()),
    );

    let outcome = run_action("workflow_dispatch", &use_case).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed(
            "Unable to access summary file: '/readonly/summary.md'. Check if the file has correct read/write permissions.".to_string()
        )
    );
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn other_events_are_skipped_without_side_effects() {
    let definitions = StubDefinitions::returning(WITH_INPUTS);
    let sink = SpySink::default();
    let use_case = DisplayInputs::new(Box::new(definitions.clone()), Box::new(deployment_values()), Box::new(sink.clone()));

    for event in ["push", "pull_request", ""] {
        let outcome = run_action(event, &use_case).await;
        assert_eq!(
            outcome,
            RunOutcome::Skipped {
                event_name: event.to_string()
            }
        );
    }

    assert_eq!(definitions.call_count(), 0);
    assert!(sink.saved().is_empty());
}

#[tokio::test]
async fn local_workflow_file_flows_into_job_summary_file() {
    let directory = tempfile::tempdir().expect("create temp dir");
    let workflow_path = directory.path().join("test-with-inputs.yml");
    let summary_path = directory.path().join("step-summary.md");
    std::fs::write(&workflow_path, WITH_INPUTS).expect("write workflow");

    let use_case = DisplayInputs::new(
        Box::new(FileDefinitionSource::new(&workflow_path, Some(WORKFLOW_REF.to_string()))),
        Box::new(EnvironmentValueSource::from_vars([("INPUT_VERSION", "3.0.0"), ("INPUT_LOG_LEVEL", "debug")])),
        Box::new(JobSummaryWriter::new(Some(summary_path.clone()), SummaryLayout::NameDescriptionValue)),
    );

    let outcome = run_action("workflow_dispatch", &use_case).await;
    assert!(matches!(outcome, RunOutcome::Completed(ResolutionResult::Inputs(_))));

    let summary = std::fs::read_to_string(&summary_path).expect("read summary");
    assert_eq!(
        summary,
        "## Workflow Inputs\n\n\
         | Name | Description | Value |\n\
         | --- | --- | --- |\n\
         | version | Version Number | 3.0.0 |\n\
         | log-level | Log Level | debug |\n"
    );
}
