//! Extraction of `workflow_dispatch` input declarations from workflow YAML.

use dispatch_types::{DeclaredInput, DeclaredInputs};
use serde_yaml::Value as YamlValue;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to interpret a workflow document.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("workflow file is not valid YAML: {0}")]
    InvalidYaml(#[source] serde_yaml::Error),
}

/// Parses the declared inputs found under `on.workflow_dispatch.inputs`.
///
/// A document without that path (no `on` key, `on: push`, `on: [push]`, a
/// dispatch trigger without inputs) declares nothing and yields an empty map.
/// Entries keep the order they have in the file. Each entry is read on its
/// own: one that cannot be interpreted is still declared, with no metadata.
///
/// ```rust
/// use dispatch_engine::definition::parse_input_definitions;
///
/// let yaml = r#"
/// on:
///   workflow_dispatch:
///     inputs:
///       environment:
///         description: Deployment Environment
///         required: true
/// "#;
/// let inputs = parse_input_definitions(yaml).unwrap();
/// assert_eq!(inputs["environment"].description.as_deref(), Some("Deployment Environment"));
/// ```
pub fn parse_input_definitions(content: &str) -> Result<DeclaredInputs, DefinitionError> {
    let document: YamlValue = serde_yaml::from_str(content).map_err(DefinitionError::InvalidYaml)?;

    let Some(raw_inputs) = document
        .get("on")
        .and_then(|triggers| triggers.get("workflow_dispatch"))
        .and_then(|dispatch| dispatch.get("inputs"))
        .and_then(YamlValue::as_mapping)
    else {
        debug!("workflow declares no workflow_dispatch inputs");
        return Ok(DeclaredInputs::new());
    };

    let mut inputs = DeclaredInputs::with_capacity(raw_inputs.len());
    for (key, body) in raw_inputs {
        let name = match key {
            YamlValue::String(name) => name.clone(),
            other => yaml_scalar_text(other),
        };

        let declaration = match body {
            YamlValue::Null => DeclaredInput::default(),
            YamlValue::Mapping(_) => serde_yaml::from_value::<DeclaredInput>(body.clone()).unwrap_or_else(|error| {
                warn!(input = %name, error = %error, "ignoring unreadable input declaration");
                DeclaredInput::default()
            }),
            _ => {
                warn!(input = %name, "input declaration is not a mapping; ignoring its metadata");
                DeclaredInput::default()
            }
        };

        debug!(input = %name, input_type = declaration.r#type.as_deref().unwrap_or("string"), "declared input");
        inputs.insert(name, declaration);
    }

    debug!(count = inputs.len(), "parsed workflow_dispatch inputs");
    Ok(inputs)
}

/// Text of a non-string mapping key (`123:` or `true:` in YAML).
fn yaml_scalar_text(value: &YamlValue) -> String {
    match value {
        YamlValue::Bool(flag) => flag.to_string(),
        YamlValue::Number(number) => number.to_string(),
        other => serde_yaml::to_string(other).map(|text| text.trim().to_string()).unwrap_or_default(),
    }
}
