//! Errors for conversions and calendar arithmetic
//!
//! Two layers: `DateTimeError` is what the typed API returns, `AlmanacError`
//! is the structured, serializable error carried by `Value::Error` through
//! the function registry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const FORMAT_ERROR: &str = "FORMAT_ERROR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by the typed temporal API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    /// A required parameter is missing or fails a precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Text does not conform to the pattern
    #[error("Text '{text}' could not be parsed at index {index}: {message}")]
    Parse {
        text: String,
        index: usize,
        message: String,
    },

    /// The pattern itself is malformed, or asks for a field the value lacks
    #[error("Format error: {0}")]
    Format(String),
}

impl DateTimeError {
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    pub fn parse(text: &str, index: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            text: text.to_string(),
            index,
            message: message.into(),
        }
    }

    pub fn format(details: impl Into<String>) -> Self {
        Self::Format(details.into())
    }
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Call succeeded with a degraded result
    Warning,
    /// Call failed
    Error,
    /// Registry or configuration is unusable
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Function being called
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Offending text, for parse errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Character index within `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error carried through the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlmanacError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Severity level
    pub severity: Severity,
}

impl AlmanacError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: add context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Builder: set function context
    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.function = Some(function.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// True when this error came from the given code
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::new(codes::INVALID_ARGUMENT, format!("Invalid argument: {}", details.into()))
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Check that the text matches the pattern exactly")
    }

    pub fn format_error(details: impl Into<String>) -> Self {
        Self::new(codes::FORMAT_ERROR, format!("Format error: {}", details.into()))
            .with_suggestion("Use pattern letters such as yyyy, MM, dd, HH, mm, ss; quote literals with '...'")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use list_functions() to see available functions")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn config_error(details: impl Into<String>) -> Self {
        Self::new(codes::CONFIG_ERROR, format!("Configuration error: {}", details.into()))
            .with_severity(Severity::Fatal)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for AlmanacError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for AlmanacError {}

impl From<DateTimeError> for AlmanacError {
    fn from(err: DateTimeError) -> Self {
        match err {
            DateTimeError::InvalidArgument(s) => Self::invalid_argument(s),
            DateTimeError::Parse { text, index, message } => {
                let mut e = Self::parse_error(format!("'{}' at index {}: {}", text, index, message));
                let ctx = e.context.get_or_insert_with(ErrorContext::default);
                ctx.text = Some(text);
                ctx.index = Some(index);
                e
            }
            DateTimeError::Format(s) => Self::format_error(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_datetime_error_codes() {
        let e: AlmanacError = DateTimeError::invalid_argument("weekday is required").into();
        assert!(e.is(codes::INVALID_ARGUMENT));

        let e: AlmanacError = DateTimeError::format("Unknown pattern letter: b").into();
        assert!(e.is(codes::FORMAT_ERROR));
        assert!(e.suggestion.is_some());
    }

    #[test]
    fn test_parse_error_keeps_index() {
        let e: AlmanacError = DateTimeError::parse("2017-01-x5", 8, "expected digit").into();
        assert!(e.is(codes::PARSE_ERROR));
        let ctx = e.context.unwrap();
        assert_eq!(ctx.index, Some(8));
        assert_eq!(ctx.text.as_deref(), Some("2017-01-x5"));
    }

    #[test]
    fn test_display() {
        let e = AlmanacError::arg_count("firstDay", 3, 1);
        let s = e.to_string();
        assert!(s.starts_with("[ARG_COUNT] firstDay() expects 3 arguments, got 1"));
        assert!(s.contains("help('firstDay')"));
    }

    #[test]
    fn test_serialize_skips_empty() {
        let json = serde_json::to_value(AlmanacError::invalid_argument("x")).unwrap();
        assert_eq!(json["code"], "INVALID_ARGUMENT");
        assert_eq!(json["severity"], "error");
        assert!(json.get("context").is_none());
    }
}
