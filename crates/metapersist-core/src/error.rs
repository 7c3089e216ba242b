//! Error types for metapersist.
//!
//! Three layers of errors, each bridging into the next with `#[from]`:
//! - [`RecordError`]: a single record map is structurally incompatible
//!   (wrong JSON shape, unknown enum tag, non-integral number)
//! - [`MetadataError`]: a whole metadata document could not be rebuilt, or a
//!   record was inserted into a container of the wrong family
//! - [`ReportError`]: a report could not be written or read back
//!
//! None of these are retried or swallowed by the core. Identity misuse (two
//! records sharing a symbol id with divergent fields) is not an
//! error; see [`crate::metadata::RecordSet`].

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::model::RecordKind;

// ============================================================================
// Record Errors
// ============================================================================

/// Structural error while reading one record from its map representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record value is not a JSON object.
    #[error("{kind}: expected an object, found {found}")]
    NotAnObject {
        kind: &'static str,
        found: &'static str,
    },

    /// A key holds a value of the wrong JSON shape.
    #[error("{kind}.{key}: expected {expected}, found {found}")]
    WrongShape {
        kind: &'static str,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A key holds a value of the right shape that is still not acceptable.
    #[error("{kind}.{key}: invalid value: {reason}")]
    InvalidValue {
        kind: &'static str,
        key: String,
        reason: String,
    },
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

impl RecordError {
    /// Build a [`RecordError::WrongShape`] for `found`.
    pub fn wrong_shape(
        kind: &'static str,
        key: impl Into<String>,
        expected: &'static str,
        found: &Value,
    ) -> Self {
        RecordError::WrongShape {
            kind,
            key: key.into(),
            expected,
            found: json_shape(found),
        }
    }

    /// Prefix the key of this error with `parent`, for values read from a
    /// nested object (`outerPosition.startLine`).
    pub fn nested_under(self, parent: &str) -> Self {
        match self {
            RecordError::WrongShape {
                kind,
                key,
                expected,
                found,
            } => RecordError::WrongShape {
                kind,
                key: format!("{parent}.{key}"),
                expected,
                found,
            },
            RecordError::InvalidValue { kind, key, reason } => RecordError::InvalidValue {
                kind,
                key: format!("{parent}.{key}"),
                reason,
            },
            other => other,
        }
    }

    /// Build a [`RecordError::InvalidValue`].
    pub fn invalid_value(kind: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        RecordError::InvalidValue {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Name of the JSON shape of `value`, for error messages.
pub fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Metadata Errors
// ============================================================================

/// Errors while populating or rebuilding a metadata container.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The document is not a JSON object.
    #[error("metadata document: expected an object, found {found}")]
    NotAnObject { found: &'static str },

    /// A reserved report key holds something other than an array.
    #[error("metadata key '{key}': expected an array, found {found}")]
    NotAnArray {
        key: &'static str,
        found: &'static str,
    },

    /// An element of a reserved array could not be read as a record.
    #[error("metadata key '{key}' element {index}: {source}")]
    InvalidRecord {
        key: &'static str,
        index: usize,
        #[source]
        source: RecordError,
    },

    /// The record kind does not belong to this container's family.
    #[error("{family} metadata does not hold {kind} records")]
    UnsupportedKind {
        kind: RecordKind,
        family: &'static str,
    },

    /// The document text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

// ============================================================================
// Report Errors
// ============================================================================

/// Errors while writing or reading a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error while creating, writing, flushing or reading.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The finished temporary file could not be moved into place.
    #[error("could not persist report to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A report that was read back is not valid metadata.
    #[error("invalid report: {0}")]
    Metadata(#[from] MetadataError),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

// ============================================================================
// Tests
// ============================================================================
