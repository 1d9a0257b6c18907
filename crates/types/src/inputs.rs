//! Resolved input values and the outcome of a resolution pass.

use serde::{Deserialize, Serialize};

/// A declared input paired with the value supplied for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInput {
    pub name: String,
    pub value: String,
    /// Never empty; falls back to `name` when nothing was declared.
    pub description: String,
}

impl ResolvedInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Non-empty, ordered list of resolved inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedInputs(Vec<ResolvedInput>);

impl ResolvedInputs {
    /// Wraps `inputs`, returning `None` when the list is empty.
    pub fn new(inputs: Vec<ResolvedInput>) -> Option<Self> {
        if inputs.is_empty() { None } else { Some(Self(inputs)) }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[ResolvedInput] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ResolvedInputs {
    type Item = &'a ResolvedInput;
    type IntoIter = std::slice::Iter<'a, ResolvedInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of resolving declared inputs against supplied values.
///
/// `NoInputs` covers both "nothing declared" and "nothing supplied"; an empty
/// list is never produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "inputs", rename_all = "snake_case")]
pub enum ResolutionResult {
    NoInputs,
    Inputs(ResolvedInputs),
}

impl ResolutionResult {
    /// Collapses an empty list into [`ResolutionResult::NoInputs`].
    pub fn from_resolved(inputs: Vec<ResolvedInput>) -> Self {
        match ResolvedInputs::new(inputs) {
            Some(inputs) => ResolutionResult::Inputs(inputs),
            None => ResolutionResult::NoInputs,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResolutionResult::NoInputs)
    }

    /// Number of resolved inputs (zero for the sentinel).
    pub fn len(&self) -> usize {
        match self {
            ResolutionResult::NoInputs => 0,
            ResolutionResult::Inputs(inputs) => inputs.len(),
        }
    }

    pub fn inputs(&self) -> &[ResolvedInput] {
        match self {
            ResolutionResult::NoInputs => &[],
            ResolutionResult::Inputs(inputs) => inputs.as_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_collapses_to_sentinel() {
        assert_eq!(ResolutionResult::from_resolved(Vec::new()), ResolutionResult::NoInputs);
        assert!(ResolvedInputs::new(Vec::new()).is_none());
    }

    #[test]
    fn keeps_inputs_in_given_order() {
        let result = ResolutionResult::from_resolved(vec![
            ResolvedInput::new("b", "2", "b"),
            ResolvedInput::new("a", "1", "a"),
        ]);
        let names: Vec<_> = result.inputs().iter().map(|input| input.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(ResolutionResult::NoInputs).expect("serialize sentinel");
        assert_eq!(json, serde_json::json!({ "status": "no_inputs" }));

        let json = serde_json::to_value(ResolutionResult::from_resolved(vec![ResolvedInput::new("env", "prod", "Env")]))
            .expect("serialize inputs");
        assert_eq!(json["status"], "inputs");
        assert_eq!(json["inputs"][0]["value"], "prod");
    }
}
