//! Strongly typed views of a GitHub Actions workflow definition.
//!
//! Only the parts of a workflow file needed to describe `workflow_dispatch`
//! inputs are modelled here. Declarations are kept in an `IndexMap` so the
//! summary renders inputs in the order they were authored.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Declared `workflow_dispatch` inputs keyed by input name, in authoring order.
pub type DeclaredInputs = IndexMap<String, DeclaredInput>;

/// Metadata for a single `workflow_dispatch` input as written in the workflow file.
///
/// Every field is optional and passed through without validation: scalars of
/// any type are accepted as text, and values that make no sense for a field
/// are dropped instead of rejecting the declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeclaredInput {
    /// Human-readable text shown in the dispatch form.
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Whether the dispatch form requires a value.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub required: Option<bool>,
    /// Default value offered by the dispatch form.
    #[serde(default, deserialize_with = "lenient_default")]
    pub default: Option<InputDefault>,
    /// Declared input type (`string`, `boolean`, `choice`, `number`, `environment`).
    #[serde(default, deserialize_with = "lenient_text")]
    pub r#type: Option<String>,
}

impl DeclaredInput {
    /// Label used in the summary: the declared description, or the name when none is set.
    pub fn display_description(&self, name: &str) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description.to_string(),
            _ => name.to_string(),
        }
    }

    /// Returns true when the declaration marks the input as required.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Default value of a declared input.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum InputDefault {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for InputDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputDefault::Flag(flag) => write!(f, "{flag}"),
            InputDefault::Number(number) => write!(f, "{number}"),
            InputDefault::Text(text) => f.write_str(text),
        }
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(flag) => Some(flag),
        JsonValue::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<InputDefault>, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => None,
        JsonValue::Bool(flag) => Some(InputDefault::Flag(flag)),
        JsonValue::Number(number) => Some(InputDefault::Number(number)),
        JsonValue::String(text) => Some(InputDefault::Text(text)),
        other => Some(InputDefault::Text(other.to_string())),
    })
}

static WORKFLOW_REF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^/]+)/([^/]+)/\.github/workflows/([^@]+)@(.+)").expect("valid workflow ref pattern"));

/// Errors produced when interpreting a workflow reference string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("workflow reference is empty")]
    Empty,
    #[error("invalid workflow reference format: {0}")]
    Malformed(String),
}

/// Coordinates of a workflow file, parsed from `GITHUB_WORKFLOW_REF`.
///
/// The expected shape is `owner/repo/.github/workflows/<file>@<ref>`, where the
/// ref may be a full `refs/heads/<branch>` or `refs/tags/<tag>` name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRef {
    pub owner: String,
    pub repo: String,
    pub workflow_file: String,
    /// Branch, tag, or commit with any `refs/heads/` or `refs/tags/` prefix removed.
    pub git_ref: String,
}

impl WorkflowRef {
    /// Parse a workflow reference string.
    ///
    /// ```rust
    /// use dispatch_types::WorkflowRef;
    ///
    /// let reference = WorkflowRef::parse("octo/app/.github/workflows/deploy.yml@refs/heads/main").unwrap();
    /// assert_eq!(reference.owner, "octo");
    /// assert_eq!(reference.repo, "app");
    /// assert_eq!(reference.workflow_file, "deploy.yml");
    /// assert_eq!(reference.git_ref, "main");
    /// ```
    pub fn parse(value: &str) -> Result<Self, ReferenceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let captures = WORKFLOW_REF_PATTERN
            .captures(trimmed)
            .ok_or_else(|| ReferenceError::Malformed(trimmed.to_string()))?;

        let raw_ref = &captures[4];
        let git_ref = raw_ref
            .strip_prefix("refs/heads/")
            .or_else(|| raw_ref.strip_prefix("refs/tags/"))
            .unwrap_or(raw_ref);

        Ok(Self {
            owner: captures[1].to_string(),
            repo: captures[2].to_string(),
            workflow_file: captures[3].to_string(),
            git_ref: git_ref.to_string(),
        })
    }

    /// Repository-relative path of the workflow file.
    pub fn path(&self) -> String {
        format!(".github/workflows/{}", self.workflow_file)
    }
}

impl FromStr for WorkflowRef {
    type Err = ReferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for WorkflowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}@{}", self.owner, self.repo, self.path(), self.git_ref)
    }
}

/// A workflow file's coordinates together with its declared dispatch inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowInfo {
    /// Where the definition came from, when known.
    pub reference: Option<WorkflowRef>,
    pub inputs: DeclaredInputs,
}

impl WorkflowInfo {
    pub fn new(reference: Option<WorkflowRef>, inputs: DeclaredInputs) -> Self {
        Self { reference, inputs }
    }

    /// Workflow info with no declared inputs, used when a definition cannot be obtained.
    pub fn empty() -> Self {
        Self {
            reference: None,
            inputs: DeclaredInputs::new(),
        }
    }
}
