//! GitHub Actions workflow commands.
//!
//! The runner scans stdout for lines of the form `::command::message` and turns
//! them into annotations. Messages must escape `%`, `\r`, and `\n` so a single
//! command never spans more than one line.

/// Severity of an annotation emitted through a workflow command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Debug,
    Notice,
    Warning,
    Error,
}

impl Annotation {
    fn command(self) -> &'static str {
        match self {
            Annotation::Debug => "debug",
            Annotation::Notice => "notice",
            Annotation::Warning => "warning",
            Annotation::Error => "error",
        }
    }
}

/// Formats a workflow command line for `annotation` carrying `message`.
///
/// ```rust
/// use dispatch_util::workflow_commands::{Annotation, format_command};
///
/// assert_eq!(format_command(Annotation::Error, "boom"), "::error::boom");
/// assert_eq!(format_command(Annotation::Warning, "50%\ndone"), "::warning::50%25%0Adone");
/// ```
pub fn format_command(annotation: Annotation, message: &str) -> String {
    format!("::{}::{}", annotation.command(), escape_data(message))
}

/// Escapes command data the way the Actions runner expects.
pub fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
