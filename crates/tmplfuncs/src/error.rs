//! Error types for the rendering surface and the domain value constructors.
//!
//! Helpers themselves never fail: a rejected input becomes the helper's
//! fallback value. The errors here come from template compilation, template
//! lookup and from parsing the values callers hand to the helpers.

use thiserror::Error;

/// Error type for rendering through [`Engine`](crate::Engine).
///
/// Wraps the template engine's errors behind a stable set of variants so
/// callers do not have to match on MiniJinja's error kinds.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template syntax error, unknown filter/function, or undefined access.
    #[error("template error: {0}")]
    TemplateError(String),

    /// Template not registered with the engine.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Context data could not be serialized.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Any other failure raised while rendering.
    #[error("{0}")]
    OperationError(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod
            | ErrorKind::MissingArgument
            | ErrorKind::TooManyArguments => RenderError::TemplateError(err.to_string()),
            ErrorKind::BadSerialization => RenderError::SerializationError(err.to_string()),
            _ => RenderError::OperationError(err.to_string()),
        }
    }
}

/// Error type for building the values the helpers consume.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Input is not 24 hex characters.
    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    /// Input is not an RFC 3339 timestamp.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Name is not in the IANA time zone database.
    #[error("unknown time zone: {0:?}")]
    UnknownTimezone(String),
}
