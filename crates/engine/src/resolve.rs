//! Reconciles declared inputs with the values supplied for a run.

use dispatch_types::{DeclaredInputs, ResolutionResult, ResolvedInput};
use tracing::debug;

use crate::values::InputValueSource;

/// Resolves every declared input that received a value.
///
/// Declarations are visited in map order and the output keeps that order.
/// A value counts as supplied only when it is non-empty, whichever source
/// produced it. The description falls back to the input name when the
/// declaration has none. When nothing resolves, including when nothing is
/// declared, the result is [`ResolutionResult::NoInputs`].
///
/// ```rust
/// use dispatch_engine::resolve::resolve_inputs;
/// use dispatch_engine::values::EnvironmentValueSource;
/// use dispatch_types::{DeclaredInput, DeclaredInputs, ResolutionResult};
///
/// let mut declared = DeclaredInputs::new();
/// declared.insert("enable-debug".into(), DeclaredInput::default());
/// let source = EnvironmentValueSource::from_vars([("INPUT_ENABLE_DEBUG", "true")]);
///
/// let result = resolve_inputs(&declared, &source);
/// assert_eq!(result.inputs()[0].description, "enable-debug");
///
/// assert_eq!(resolve_inputs(&DeclaredInputs::new(), &source), ResolutionResult::NoInputs);
/// ```
pub fn resolve_inputs(declared: &DeclaredInputs, source: &dyn InputValueSource) -> ResolutionResult {
    let resolved: Vec<ResolvedInput> = declared
        .iter()
        .filter_map(|(name, declaration)| match source.value_for(name) {
            Some(value) if !value.is_empty() => {
                debug!(input = %name, "found supplied value");
                Some(ResolvedInput::new(name.clone(), value, declaration.display_description(name)))
            }
            _ => {
                debug!(input = %name, "no value supplied");
                None
            }
        })
        .collect();

    debug!(declared = declared.len(), resolved = resolved.len(), source = %source.kind(), "resolved inputs");
    ResolutionResult::from_resolved(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{EnvironmentValueSource, EventPayloadValueSource};
    use dispatch_types::{DeclaredInput, InputDefault};
    use serde_json::json;

    fn described(description: &str) -> DeclaredInput {
        DeclaredInput {
            description: Some(description.to_string()),
            ..DeclaredInput::default()
        }
    }

    fn deployment_declarations() -> DeclaredInputs {
        let mut declared = DeclaredInputs::new();
        declared.insert(
            "environment".into(),
            DeclaredInput {
                required: Some(true),
                ..described("Deployment Environment")
            },
        );
        declared.insert(
            "version".into(),
            DeclaredInput {
                required: Some(true),
                ..described("Version Number")
            },
        );
        declared.insert(
            "enable-debug".into(),
            DeclaredInput {
                r#type: Some("boolean".into()),
                default: Some(InputDefault::Flag(false)),
                ..described("Enable Debug Mode")
            },
        );
        declared
    }

    #[test]
    fn resolves_deployment_scenario_from_environment() {
        let source = EnvironmentValueSource::from_vars([
            ("INPUT_ENVIRONMENT", "production"),
            ("INPUT_VERSION", "1.2.3"),
            ("INPUT_ENABLE_DEBUG", "true"),
        ]);

        let result = resolve_inputs(&deployment_declarations(), &source);
        assert_eq!(
            result.inputs(),
            &[
                ResolvedInput::new("environment", "production", "Deployment Environment"),
                ResolvedInput::new("version", "1.2.3", "Version Number"),
                ResolvedInput::new("enable-debug", "true", "Enable Debug Mode"),
            ]
        );
    }

    #[test]
    fn resolves_deployment_scenario_from_event_payload() {
        let source = EventPayloadValueSource::from_payload(&json!({
            "inputs": { "enable-debug": true, "version": "1.2.3", "environment": "production" }
        }));

        let result = resolve_inputs(&deployment_declarations(), &source);
        let rows: Vec<_> = result
            .inputs()
            .iter()
            .map(|input| (input.name.as_str(), input.value.as_str()))
            .collect();
        assert_eq!(rows, vec![("environment", "production"), ("version", "1.2.3"), ("enable-debug", "true")]);
    }

    #[test]
    fn empty_declarations_yield_sentinel_regardless_of_values() {
        let source = EnvironmentValueSource::from_vars([("INPUT_ENVIRONMENT", "production")]);
        assert_eq!(resolve_inputs(&DeclaredInputs::new(), &source), ResolutionResult::NoInputs);
    }

    #[test]
    fn unsupplied_optional_input_yields_sentinel() {
        let mut declared = DeclaredInputs::new();
        declared.insert(
            "optional-input".into(),
            DeclaredInput {
                required: Some(false),
                r#type: Some("string".into()),
                ..described("Optional Input")
            },
        );

        let result = resolve_inputs(&declared, &EnvironmentValueSource::default());
        assert_eq!(result, ResolutionResult::NoInputs);
    }

    #[test]
    fn empty_values_are_absent_for_both_sources() {
        let mut declared = DeclaredInputs::new();
        declared.insert("notes".into(), described("Release Notes"));

        let environment = EnvironmentValueSource::from_vars([("INPUT_NOTES", "")]);
        assert_eq!(resolve_inputs(&declared, &environment), ResolutionResult::NoInputs);

        let payload = EventPayloadValueSource::from_payload(&json!({ "inputs": { "notes": "" } }));
        assert_eq!(resolve_inputs(&declared, &payload), ResolutionResult::NoInputs);
    }

    #[test]
    fn preserves_declared_order_not_source_order() {
        let mut declared = DeclaredInputs::new();
        for name in ["c", "a", "b"] {
            declared.insert(name.into(), DeclaredInput::default());
        }
        let source = EnvironmentValueSource::from_vars([("INPUT_A", "1"), ("INPUT_B", "2"), ("INPUT_C", "3")]);

        let names: Vec<_> = resolve_inputs(&declared, &source)
            .inputs()
            .iter()
            .map(|input| input.name.clone())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn loosely_typed_declaration_does_not_hide_other_inputs() {
        let yaml = "on:\n  workflow_dispatch:\n    inputs:\n      environment:\n        description: Deployment Environment\n      year:\n        description: 2024\n";
        let declared = crate::definition::parse_input_definitions(yaml).expect("parse workflow");
        let source = EnvironmentValueSource::from_vars([("INPUT_ENVIRONMENT", "production")]);

        let result = resolve_inputs(&declared, &source);
        assert_eq!(result.inputs(), &[ResolvedInput::new("environment", "production", "Deployment Environment")]);
    }

    #[test]
    fn undeclared_values_are_ignored_and_missing_descriptions_fall_back() {
        let mut declared = DeclaredInputs::new();
        declared.insert("version".into(), DeclaredInput::default());
        let source = EnvironmentValueSource::from_vars([("INPUT_VERSION", "2.0.0"), ("INPUT_EXTRA", "ignored")]);

        let result = resolve_inputs(&declared, &source);
        assert_eq!(result.inputs(), &[ResolvedInput::new("version", "2.0.0", "version")]);
    }
}
