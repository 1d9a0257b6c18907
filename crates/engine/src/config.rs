//! Run configuration read from the runner environment.

use std::{env, path::PathBuf};

use dispatch_api::DEFAULT_API_BASE;
use dispatch_types::{SummaryLayout, ValueSourceKind};
use thiserror::Error;

use crate::{summary::STEP_SUMMARY_ENV, values::EVENT_PATH_ENV};

pub const EVENT_NAME_ENV: &str = "GITHUB_EVENT_NAME";
pub const WORKFLOW_REF_ENV: &str = "GITHUB_WORKFLOW_REF";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Token passed as the action's `token` input.
pub const TOKEN_INPUT_ENV: &str = "INPUT_TOKEN";
pub const API_URL_ENV: &str = "GITHUB_API_URL";
pub const VALUE_SOURCE_ENV: &str = "DISPATCH_INPUTS_SOURCE";
pub const LAYOUT_ENV: &str = "DISPATCH_INPUTS_LAYOUT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {variable}: {message}")]
    InvalidValue { variable: &'static str, message: String },
}

/// Everything a run needs to know about its environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ActionConfig {
    pub event_name: Option<String>,
    pub workflow_ref: Option<String>,
    pub event_path: Option<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub token: Option<String>,
    pub api_url: String,
    pub value_source: ValueSourceKind,
    pub layout: SummaryLayout,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("event_name", &self.event_name)
            .field("workflow_ref", &self.workflow_ref)
            .field("event_path", &self.event_path)
            .field("summary_path", &self.summary_path)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("value_source", &self.value_source)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Triggering event name, read on its own so the event gate runs before any other setting.
pub fn event_name_from_env() -> Option<String> {
    non_blank(env::var(EVENT_NAME_ENV).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ActionConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| non_blank(lookup(key));

        let value_source = match read(VALUE_SOURCE_ENV) {
            Some(raw) => raw.parse::<ValueSourceKind>().map_err(|message| ConfigError::InvalidValue {
                variable: VALUE_SOURCE_ENV,
                message,
            })?,
            None => ValueSourceKind::default(),
        };
        let layout = match read(LAYOUT_ENV) {
            Some(raw) => raw.parse::<SummaryLayout>().map_err(|message| ConfigError::InvalidValue {
                variable: LAYOUT_ENV,
                message,
            })?,
            None => SummaryLayout::default(),
        };

        Ok(Self {
            event_name: read(EVENT_NAME_ENV),
            workflow_ref: read(WORKFLOW_REF_ENV),
            event_path: read(EVENT_PATH_ENV).map(PathBuf::from),
            summary_path: read(STEP_SUMMARY_ENV).map(PathBuf::from),
            token: read(TOKEN_ENV).or_else(|| read(TOKEN_INPUT_ENV)),
            api_url: read(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            value_source,
            layout,
        })
    }
}
