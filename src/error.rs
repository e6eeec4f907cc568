//! Error types for the invoice_fixture crate.
//!
//! Every failure is reported to the caller. Parsing and validation happen before any bytes are
//! produced, so neither of them can leave a partial artifact behind.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by the end-to-end helpers.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// The input payload is not well-formed JSON.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input is well-formed but violates a field constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document could not be laid out, serialized or written.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Malformed input payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed scenario payload at line {line}, column {column}: {message}")]
pub struct ParseError {
    message: String,
    line: usize,
    column: usize,
}

impl ParseError {
    /// Human-readable description of the syntax problem.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-based line of the offending input, as reported by serde_json.
    pub fn line(&self) -> usize {
        self.line
    }

    /// One-based column of the offending input.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// A required field is missing or a value has the wrong type or range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    field: String,
    reason: String,
}

impl ValidationError {
    /// Creates an error for the given field path.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a required field that is absent.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required field is missing")
    }

    /// Dotted / indexed path of the offending field, e.g. `extraLineItems[1].quantity`.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Why the field was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Failures while laying out or emitting a document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The drawing surface refused an operation or failed to serialize.
    #[error("render backend failed: {0}")]
    Backend(String),

    /// Content cannot be placed on the configured page geometry.
    #[error("layout error: {0}")]
    Layout(String),

    /// The rendered bytes could not be written to the destination.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub(crate) fn layout(message: impl Into<String>) -> Self {
        Self::Layout(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
