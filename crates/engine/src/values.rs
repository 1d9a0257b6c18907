//! Sources of the values supplied for a workflow run.
//!
//! Two strategies sit behind [`InputValueSource`]:
//!
//! - [`EnvironmentValueSource`] holds a snapshot of `INPUT_*` variables and
//!   translates declared names into variable names before looking them up.
//! - [`EventPayloadValueSource`] holds the `inputs` object of the event payload
//!   and matches declared names verbatim.
//!
//! Both are built once at startup; lookups never touch process state.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use dispatch_types::ValueSourceKind;
use dispatch_util::redact_json;
use serde_json::{Map as JsonMap, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::naming::{INPUT_ENV_PREFIX, env_key_for_input, input_name_from_env_key};

/// Environment variable naming the event payload file.
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";

/// Answers "what value, if any, was supplied for declared input N".
pub trait InputValueSource: Send + Sync + Debug {
    /// Raw value supplied for declared input `name`, if any.
    fn value_for(&self, name: &str) -> Option<String>;

    /// Every value the source holds, labelled with the input name it stands for.
    fn supplied_inputs(&self) -> Vec<(String, String)>;

    fn kind(&self) -> ValueSourceKind;
}

/// Failure to load the event payload.
#[derive(Debug, Error)]
pub enum ValueSourceError {
    #[error("failed to read event payload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("event payload {path} is not valid JSON: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Snapshot of `INPUT_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentValueSource {
    variables: BTreeMap<String, String>,
}

impl EnvironmentValueSource {
    /// Captures every `INPUT_*` variable of the current process.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os().filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    /// Builds a source from explicit key/value pairs; keys outside the prefix are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let variables = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| key.starts_with(INPUT_ENV_PREFIX))
            .collect();
        Self { variables }
    }
}

impl InputValueSource for EnvironmentValueSource {
    fn value_for(&self, name: &str) -> Option<String> {
        self.variables.get(&env_key_for_input(name)).cloned()
    }

    fn supplied_inputs(&self) -> Vec<(String, String)> {
        self.variables
            .iter()
            .filter_map(|(key, value)| input_name_from_env_key(key).map(|name| (name, value.clone())))
            .collect()
    }

    fn kind(&self) -> ValueSourceKind {
        ValueSourceKind::Environment
    }
}

/// The `inputs` object of a `workflow_dispatch` event payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPayloadValueSource {
    inputs: JsonMap<String, Value>,
}

impl EventPayloadValueSource {
    /// Reads the payload file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ValueSourceError> {
        let content = fs::read_to_string(path).map_err(|source| ValueSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let payload: Value = serde_json::from_str(&content).map_err(|source| ValueSourceError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_payload(&payload))
    }

    /// Takes the top-level `inputs` object of `payload`; anything else yields an empty source.
    pub fn from_payload(payload: &Value) -> Self {
        let inputs = payload
            .get("inputs")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let redacted = redact_json(&Value::Object(inputs.clone()));
        debug!(count = inputs.len(), inputs = %redacted, "inputs found in event payload");
        Self { inputs }
    }

    /// Loads the payload when a path is configured, degrading to an empty source otherwise.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("{} not set; no event inputs available", EVENT_PATH_ENV);
            return Self::default();
        };

        match Self::from_path(path) {
            Ok(source) => source,
            Err(error) => {
                warn!(error = %error, "failed to read event payload; continuing without event inputs");
                Self::default()
            }
        }
    }
}

impl InputValueSource for EventPayloadValueSource {
    fn value_for(&self, name: &str) -> Option<String> {
        self.inputs.get(name).and_then(json_value_text)
    }

    fn supplied_inputs(&self) -> Vec<(String, String)> {
        self.inputs
            .iter()
            .filter_map(|(name, value)| json_value_text(value).map(|text| (name.clone(), text)))
            .collect()
    }

    fn kind(&self) -> ValueSourceKind {
        ValueSourceKind::EventPayload
    }
}

/// Builds the value source selected by `kind`.
pub fn value_source_for(kind: ValueSourceKind, event_path: Option<&Path>) -> Box<dyn InputValueSource> {
    match kind {
        ValueSourceKind::Environment => Box::new(EnvironmentValueSource::from_env()),
        ValueSourceKind::EventPayload => Box::new(EventPayloadValueSource::load(event_path)),
    }
}

/// Text form of a payload value; `null` counts as absent.
fn json_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
