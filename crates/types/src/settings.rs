//! Enumerations selected through configuration.

use std::{fmt, str::FromStr};

/// Which strategy supplies input values for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueSourceKind {
    /// `INPUT_*` process variables, matched through name translation.
    Environment,
    /// The `inputs` object of the event payload, matched verbatim.
    #[default]
    EventPayload,
}

impl FromStr for ValueSourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "env" | "environment" => Ok(Self::Environment),
            "event" | "event-payload" | "payload" => Ok(Self::EventPayload),
            other => Err(format!("unknown value source '{other}'; expected 'env' or 'event'")),
        }
    }
}

impl fmt::Display for ValueSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSourceKind::Environment => f.write_str("env"),
            ValueSourceKind::EventPayload => f.write_str("event"),
        }
    }
}

/// Column layout of the rendered summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLayout {
    /// `| Description | Value |`
    #[default]
    DescriptionValue,
    /// `| Name | Description | Value |`
    NameDescriptionValue,
}

impl SummaryLayout {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            SummaryLayout::DescriptionValue => &["Description", "Value"],
            SummaryLayout::NameDescriptionValue => &["Name", "Description", "Value"],
        }
    }
}

impl FromStr for SummaryLayout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "description-value" | "compact" => Ok(Self::DescriptionValue),
            "name-description-value" | "full" => Ok(Self::NameDescriptionValue),
            other => Err(format!(
                "unknown summary layout '{other}'; expected 'description-value' or 'name-description-value'"
            )),
        }
    }
}

impl fmt::Display for SummaryLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLayout::DescriptionValue => f.write_str("description-value"),
            SummaryLayout::NameDescriptionValue => f.write_str("name-description-value"),
        }
    }
}
