//! Typed access to record maps.
//!
//! [`MapReader`] reads keys with the defaulting rules of the serialization
//! contract: an absent key or a `null` value yields the default, a value of
//! the wrong shape is a [`RecordError`]. The `put_*` helpers write keys the
//! way every record kind does, omitting unset optional strings.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RecordError, RecordResult};
use crate::model::JsonMap;
use crate::types::Position;

/// Upper bound (exclusive) of integral floats accepted for `u64` fields.
const U64_LIMIT_F64: f64 = 18_446_744_073_709_551_616.0;

/// Reader over one record map.
#[derive(Debug, Clone, Copy)]
pub struct MapReader<'a> {
    kind: &'static str,
    map: &'a JsonMap,
}

impl<'a> MapReader<'a> {
    /// Create a reader; `kind` is used in error messages.
    pub fn new(kind: &'static str, map: &'a JsonMap) -> Self {
        MapReader { kind, map }
    }

    /// The value at `key`, treating `null` as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Optional string.
    pub fn opt_string(&self, key: &str) -> RecordResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(RecordError::wrong_shape(self.kind, key, "string", other)),
        }
    }

    /// String, defaulting to empty.
    pub fn string(&self, key: &str) -> RecordResult<String> {
        Ok(self.opt_string(key)?.unwrap_or_default())
    }

    /// Boolean, defaulting to `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> RecordResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(RecordError::wrong_shape(self.kind, key, "boolean", other)),
        }
    }

    /// Boolean, defaulting to `false`.
    pub fn bool(&self, key: &str) -> RecordResult<bool> {
        self.bool_or(key, false)
    }

    /// Unsigned 64-bit integer, defaulting to zero.
    ///
    /// Integral floats (as written by JSON libraries that store every number
    /// as a double) are accepted when they fit; fractions, negatives and
    /// out-of-range values are rejected rather than truncated.
    pub fn u64(&self, key: &str) -> RecordResult<u64> {
        let value = match self.get(key) {
            None => return Ok(0),
            Some(value) => value,
        };
        let number = match value {
            Value::Number(n) => n,
            other => return Err(RecordError::wrong_shape(self.kind, key, "integer", other)),
        };
        if let Some(n) = number.as_u64() {
            return Ok(n);
        }
        if number.as_i64().is_some() {
            return Err(RecordError::invalid_value(
                self.kind,
                key,
                format!("negative integer {number}"),
            ));
        }
        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && (0.0..U64_LIMIT_F64).contains(&f) => Ok(f as u64),
            _ => Err(RecordError::invalid_value(
                self.kind,
                key,
                format!("{number} is not an unsigned 64-bit integer"),
            )),
        }
    }

    /// Array of strings, defaulting to empty. Order is preserved.
    pub fn strings(&self, key: &str) -> RecordResult<Vec<String>> {
        let items = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(RecordError::wrong_shape(self.kind, key, "array", other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(RecordError::wrong_shape(
                    self.kind,
                    format!("{key}[{index}]"),
                    "string",
                    other,
                )),
            })
            .collect()
    }

    /// Optional nested object.
    pub fn object(&self, key: &str) -> RecordResult<Option<&'a JsonMap>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(RecordError::wrong_shape(self.kind, key, "object", other)),
        }
    }

    /// Array of nested objects, defaulting to empty.
    pub fn objects(&self, key: &str) -> RecordResult<Vec<&'a JsonMap>> {
        let items = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(RecordError::wrong_shape(self.kind, key, "array", other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(RecordError::wrong_shape(
                    self.kind,
                    format!("{key}[{index}]"),
                    "object",
                    other,
                )),
            })
            .collect()
    }

    /// Nested position, defaulting to [`Position::UNKNOWN`].
    pub fn position(&self, key: &str) -> RecordResult<Position> {
        match self.object(key)? {
            None => Ok(Position::UNKNOWN),
            Some(map) => {
                Position::from_map(self.kind, map).map_err(|err| err.nested_under(key))
            }
        }
    }

    /// Enum tag stored as a string, defaulting to `T::default()`.
    pub fn tagged<T: DeserializeOwned + Default>(&self, key: &str) -> RecordResult<T> {
        match self.get(key) {
            None => Ok(T::default()),
            Some(Value::String(tag)) => serde_json::from_value(Value::String(tag.clone()))
                .map_err(|_| {
                    RecordError::invalid_value(self.kind, key, format!("unknown tag '{tag}'"))
                }),
            Some(other) => Err(RecordError::wrong_shape(self.kind, key, "string", other)),
        }
    }
}

/// Write `value` under `key`.
pub fn put(map: &mut JsonMap, key: &str, value: impl Into<Value>) {
    map.insert(key.to_string(), value.into());
}

/// Write an optional string, omitting the key when unset.
pub fn put_opt(map: &mut JsonMap, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.clone()));
    }
}

/// Write a nested position.
pub fn put_position(map: &mut JsonMap, key: &str, position: &Position) {
    map.insert(key.to_string(), Value::Object(position.to_map()));
}

// ============================================================================
// Tests
// ============================================================================
