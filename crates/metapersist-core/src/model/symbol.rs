//! The identity layers: [`Symbol`], [`SymbolWithId`] and [`Element`].
//!
//! Each layer exposes `save_to` (write its keys into a map) and `load_from`
//! (read them back through a [`MapReader`]). Leaf kinds call their layer's
//! helpers before handling their own fields.

use std::cmp::Ordering;

use crate::error::RecordResult;
use crate::model::fields::{put, put_opt, put_position, MapReader};
use crate::model::{JsonMap, Record, RecordKind};
use crate::types::Position;

// ============================================================================
// Symbol Layer
// ============================================================================

/// Base layer: where a record was found.
///
/// Serialized keys: `position`, `sourceFileName` (omitted when unset) and
/// `source`. None of these take part in record equality.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Declaration span.
    pub position: Position,
    /// Name of the source file the record comes from.
    pub source_file_name: Option<String>,
    /// True when declared in analyzed source, false for external/library code.
    pub source: bool,
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol {
            position: Position::UNKNOWN,
            source_file_name: None,
            source: true,
        }
    }
}

impl Symbol {
    /// Create a symbol declared in analyzed source.
    pub fn new(position: Position, source_file_name: impl Into<String>) -> Self {
        Symbol {
            position,
            source_file_name: Some(source_file_name.into()),
            source: true,
        }
    }

    /// Mark this symbol as coming from analyzed source or not.
    pub fn with_source(mut self, source: bool) -> Self {
        self.source = source;
        self
    }

    pub fn save_to(&self, map: &mut JsonMap) {
        put_position(map, "position", &self.position);
        put_opt(map, "sourceFileName", &self.source_file_name);
        put(map, "source", self.source);
    }

    pub fn load_from(reader: &MapReader<'_>) -> RecordResult<Self> {
        Ok(Symbol {
            position: reader.position("position")?,
            source_file_name: reader.opt_string("sourceFileName")?,
            source: reader.bool_or("source", true)?,
        })
    }
}

// ============================================================================
// SymbolWithId Layer
// ============================================================================

/// A symbol with an id unique within one analysis run.
///
/// Serialized keys: the [`Symbol`] keys, then `id` (the symbol id) and
/// `artifactName` (omitted when unset). Equality and ordering use the symbol
/// id only.
#[derive(Debug, Clone, Default)]
pub struct SymbolWithId {
    pub symbol: Symbol,
    /// Unique id of this symbol (e.g. a fully qualified method signature).
    pub symbol_id: String,
    /// Originating archive or module (e.g. `foo-1.2.jar`).
    pub artifact_name: Option<String>,
}

record_identity!(SymbolWithId { symbol_id });

impl SymbolWithId {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
    ) -> Self {
        SymbolWithId {
            symbol: Symbol::new(position, source_file_name),
            symbol_id: symbol_id.into(),
            artifact_name: None,
        }
    }

    /// Set the originating artifact.
    pub fn with_artifact_name(mut self, artifact_name: impl Into<String>) -> Self {
        self.artifact_name = Some(artifact_name.into());
        self
    }

    /// Mark this symbol as coming from analyzed source or not.
    pub fn with_source(mut self, source: bool) -> Self {
        self.symbol.source = source;
        self
    }

    pub fn save_to(&self, map: &mut JsonMap) {
        self.symbol.save_to(map);
        put(map, "id", self.symbol_id.as_str());
        put_opt(map, "artifactName", &self.artifact_name);
    }

    pub fn load_from(reader: &MapReader<'_>) -> RecordResult<Self> {
        Ok(SymbolWithId {
            symbol: Symbol::load_from(reader)?,
            symbol_id: reader.string("id")?,
            artifact_name: reader.opt_string("artifactName")?,
        })
    }
}

impl PartialOrd for SymbolWithId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolWithId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol_id.cmp(&other.symbol_id)
    }
}

// ============================================================================
// Element Layer
// ============================================================================

/// A persistent element scoped to a root element (an analysis or a bundle).
///
/// Only `rootElemId` is serialized and only `rootElemId` decides equality.
/// This is coarser than [`SymbolWithId`] identity: two elements of
/// the same analysis compare equal.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Id of the root element this element belongs to.
    pub root_elem_id: Option<String>,
    /// In-memory id; never serialized.
    pub id: Option<String>,
}

record_identity!(Element { root_elem_id });

impl Element {
    pub fn new(root_elem_id: impl Into<String>) -> Self {
        Element {
            root_elem_id: Some(root_elem_id.into()),
            id: None,
        }
    }

    pub fn save_to(&self, map: &mut JsonMap) {
        put_opt(map, "rootElemId", &self.root_elem_id);
    }

    pub fn load_from(reader: &MapReader<'_>) -> RecordResult<Self> {
        Ok(Element {
            root_elem_id: reader.opt_string("rootElemId")?,
            id: None,
        })
    }
}

impl Record for Element {
    const KIND: RecordKind = RecordKind::Element;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.save_to(&mut map);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        Element::load_from(&MapReader::new(Self::KIND.name(), map))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    mod symbol_with_id_tests {
        use super::*;

        #[test]
        fn layers_are_written_parent_first() {
            let id = SymbolWithId::new(Position::new(1, 2, 3, 4), "A.java", "A")
                .with_artifact_name("a.jar");
            let mut map = JsonMap::new();
            id.save_to(&mut map);
            assert_eq!(
                Value::Object(map),
                json!({
                    "position": {"startLine": 1, "startColumn": 2, "endLine": 3, "endColumn": 4},
                    "sourceFileName": "A.java",
                    "source": true,
                    "id": "A",
                    "artifactName": "a.jar",
                })
            );
        }

        #[test]
        fn equality_ignores_position_and_file() {
            let a = SymbolWithId::new(Position::new(1, 1, 1, 1), "A.java", "A");
            let b = SymbolWithId::new(Position::new(9, 9, 9, 9), "B.java", "A");
            let c = SymbolWithId::new(Position::new(1, 1, 1, 1), "A.java", "B");
            assert_eq!(a, b);
            assert_ne!(a, c);
            assert!(a < c);
        }

        #[test]
        fn missing_source_flag_defaults_to_true() {
            let map = json!({"id": "x"}).as_object().cloned().unwrap();
            let id = SymbolWithId::load_from(&MapReader::new("Type", &map)).unwrap();
            assert!(id.symbol.source);
            assert!(id.symbol.position.is_unknown());
            assert_eq!(id.artifact_name, None);
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn element_does_not_serialize_id() {
            let mut element = Element::new("analysis-1");
            element.id = Some("e42".to_string());
            assert_eq!(element.to_value(), json!({"rootElemId": "analysis-1"}));
        }

        #[test]
        fn element_equality_is_by_root_only() {
            let mut a = Element::new("bundle-7");
            a.id = Some("x".to_string());
            let b = Element::from_map(&a.to_map()).unwrap();
            assert_eq!(a, b);
            assert_ne!(a, Element::new("bundle-8"));
        }
    }
}
