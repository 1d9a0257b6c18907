use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use dispatch_api::GitHubClient;
use dispatch_engine::{
    ActionConfig, DefinitionSource, DisplayInputs, FileDefinitionSource, GitHubDefinitionSource, JobSummaryWriter, MemorySummarySink,
    RunOutcome, SummarySink, event_name_from_env, run_action, skip_unless_dispatch, value_source_for,
};
use dispatch_types::{SummaryLayout, ValueSourceKind};
use dispatch_util::{Annotation, format_command};
use tracing::debug;

/// Write the inputs of a workflow_dispatch run to the job summary.
#[derive(Parser, Debug, Default)]
#[command(name = "dispatch-inputs", version, about)]
struct Args {
    /// Where supplied values are read from: `event` or `env`
    #[arg(long)]
    source: Option<ValueSourceKind>,

    /// Summary table columns: `description-value` or `name-description-value`
    #[arg(long)]
    layout: Option<SummaryLayout>,

    /// Workflow reference (`owner/repo/.github/workflows/<file>@<ref>`)
    #[arg(long)]
    workflow_ref: Option<String>,

    /// Read the workflow definition from a local file instead of the API
    #[arg(long)]
    workflow_file: Option<PathBuf>,

    /// Triggering event name
    #[arg(long)]
    event_name: Option<String>,

    /// Job summary file to append to
    #[arg(long)]
    summary_path: Option<PathBuf>,

    /// Print the summary to stdout instead of writing the job summary
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(outcome) => {
            if let Some(command) = outcome_command(&outcome) {
                println!("{command}");
            }
            if outcome.is_failure() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        Err(error) => {
            println!("{}", format_command(Annotation::Error, &format!("{error:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(args: Args) -> Result<RunOutcome> {
    let event_name = args.event_name.clone().or_else(event_name_from_env).unwrap_or_default();
    if let Some(skipped) = skip_unless_dispatch(&event_name) {
        return Ok(skipped);
    }

    let config = ActionConfig::from_env().context("failed to read action configuration")?;
    let config = apply_overrides(config, &args);
    debug!(config = ?config, "resolved configuration");

    let definitions = definition_source(&config, args.workflow_file.clone())?;
    let values = value_source_for(config.value_source, config.event_path.as_deref());

    let preview = args.dry_run.then(|| Arc::new(MemorySummarySink::new(config.layout)));
    let sink: Box<dyn SummarySink> = match &preview {
        Some(memory) => Box::new(Arc::clone(memory)),
        None => Box::new(JobSummaryWriter::new(config.summary_path.clone(), config.layout)),
    };

    let use_case = DisplayInputs::new(definitions, values, sink);
    let outcome = run_action(&event_name, &use_case).await;

    if let Some(memory) = preview {
        for rendered in memory.rendered() {
            print!("{rendered}");
        }
    }
    Ok(outcome)
}

/// Command-line flags take precedence over the environment.
fn apply_overrides(mut config: ActionConfig, args: &Args) -> ActionConfig {
    if let Some(source) = args.source {
        config.value_source = source;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(workflow_ref) = &args.workflow_ref {
        config.workflow_ref = Some(workflow_ref.clone());
    }
    if let Some(event_name) = &args.event_name {
        config.event_name = Some(event_name.clone());
    }
    if let Some(summary_path) = &args.summary_path {
        config.summary_path = Some(summary_path.clone());
    }
    config
}

fn definition_source(config: &ActionConfig, workflow_file: Option<PathBuf>) -> Result<Box<dyn DefinitionSource>> {
    if let Some(path) = workflow_file {
        return Ok(Box::new(FileDefinitionSource::new(path, config.workflow_ref.clone())));
    }

    let client = GitHubClient::new(&config.api_url, config.token.as_deref()).context("failed to build GitHub API client")?;
    Ok(Box::new(GitHubDefinitionSource::new(client, config.workflow_ref.clone())))
}

/// Workflow command announcing how the run ended, if any.
fn outcome_command(outcome: &RunOutcome) -> Option<String> {
    match outcome {
        RunOutcome::Skipped { event_name } => Some(format_command(
            Annotation::Warning,
            &format!("This action is designed for workflow_dispatch events only. Current event: {event_name}"),
        )),
        RunOutcome::Completed(_) => None,
        RunOutcome::Failed(message) => Some(format_command(Annotation::Error, message)),
    }
}
