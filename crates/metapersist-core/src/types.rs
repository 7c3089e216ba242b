//! Common types shared between the record model and the token index.
//!
//! This module contains the [`Position`] span type, which is attached to most
//! records and is the value type of the token-location index.

use std::fmt;

use serde_json::Value;

use crate::error::RecordResult;
use crate::model::fields::MapReader;
use crate::model::JsonMap;

// ============================================================================
// Position Type
// ============================================================================

/// A source span: start line/column and end line/column.
///
/// Serialized as:
/// - `startLine`: first line of the span
/// - `startColumn`: first column of the span
/// - `endLine`: last line of the span
/// - `endColumn`: last column of the span
///
/// `(0, 0, 0, 0)` means "no known location". Positions are immutable values;
/// two positions are equal iff all four fields match. They order
/// lexicographically over `(startLine, startColumn, endLine, endColumn)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    start_line: u64,
    start_column: u64,
    end_line: u64,
    end_column: u64,
}

impl Position {
    /// The "no known location" position.
    pub const UNKNOWN: Position = Position::new(0, 0, 0, 0);

    /// Create a new position.
    pub const fn new(start_line: u64, start_column: u64, end_line: u64, end_column: u64) -> Self {
        Position {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn start_line(&self) -> u64 {
        self.start_line
    }

    pub fn start_column(&self) -> u64 {
        self.start_column
    }

    pub fn end_line(&self) -> u64 {
        self.end_line
    }

    pub fn end_column(&self) -> u64 {
        self.end_column
    }

    /// True when this is the all-zero "no known location" position.
    pub fn is_unknown(&self) -> bool {
        *self == Position::UNKNOWN
    }

    /// Map representation of this position.
    pub fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        map.insert("startLine".to_string(), Value::from(self.start_line));
        map.insert("startColumn".to_string(), Value::from(self.start_column));
        map.insert("endLine".to_string(), Value::from(self.end_line));
        map.insert("endColumn".to_string(), Value::from(self.end_column));
        map
    }

    /// Read a position from its map representation.
    ///
    /// `kind` names the record the position belongs to and is only used for
    /// error messages. Missing keys default to zero.
    pub fn from_map(kind: &'static str, map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(kind, map);
        Ok(Position {
            start_line: reader.u64("startLine")?,
            start_column: reader.u64("startColumn")?,
            end_line: reader.u64("endLine")?,
            end_column: reader.u64("endColumn")?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}-{}.{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
