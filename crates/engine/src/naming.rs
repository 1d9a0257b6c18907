//! Translation between declared input names and `INPUT_*` variable names.
//!
//! The runner exposes action inputs as upper snake case variables with an
//! `INPUT_` prefix. Declared names are free-form (`enable-debug`,
//! `log level`), so both directions are needed: forward to look a declared
//! name up, and backward to label variables no declaration mentions.

/// Prefix shared by every input variable.
pub const INPUT_ENV_PREFIX: &str = "INPUT_";

/// Variable name holding the value of declared input `name`.
///
/// Spaces and hyphens become underscores and the result is uppercased.
///
/// ```rust
/// use dispatch_engine::naming::env_key_for_input;
///
/// assert_eq!(env_key_for_input("environment"), "INPUT_ENVIRONMENT");
/// assert_eq!(env_key_for_input("enable-debug"), "INPUT_ENABLE_DEBUG");
/// ```
pub fn env_key_for_input(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|character| match character {
            ' ' | '-' => '_',
            other => other,
        })
        .collect();
    format!("{}{}", INPUT_ENV_PREFIX, normalized.to_uppercase())
}

/// Input name derived from an `INPUT_*` variable when no declaration is available.
///
/// Returns `None` for variables outside the prefix or with nothing after it.
pub fn input_name_from_env_key(key: &str) -> Option<String> {
    let stripped = key.strip_prefix(INPUT_ENV_PREFIX)?;
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_lowercase().replace('_', "-"))
}
