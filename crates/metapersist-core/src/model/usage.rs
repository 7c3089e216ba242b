//! Reference records: [`Usage`] and [`SymbolAlias`].
//!
//! Neither declares anything. A usage points at a declared symbol id; an
//! alias gives a declared symbol a second id within one source file or
//! artifact. Whether those ids resolve is for consumers to check.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecordResult;
use crate::model::fields::{put, MapReader};
use crate::model::{JsonMap, Record, RecordKind, SymbolWithId};
use crate::types::Position;

// ============================================================================
// Usage
// ============================================================================

/// How a usage refers to its symbol.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageKind {
    /// Reference to a type.
    Type,
    /// Call or reference to a function/method.
    Function,
    /// Read of a variable or field.
    DataRead,
    /// Write to a variable or field.
    DataWrite,
    #[default]
    Unknown,
}

impl UsageKind {
    /// The serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::Type => "TYPE",
            UsageKind::Function => "FUNCTION",
            UsageKind::DataRead => "DATA_READ",
            UsageKind::DataWrite => "DATA_WRITE",
            UsageKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A usage of an existing symbol at some position.
///
/// The id layer holds the *referenced* symbol id. Two usages are equal when
/// they reference the same symbol the same way, wherever they occur.
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub base: SymbolWithId,
    pub usage_kind: UsageKind,
}

record_identity!(Usage { base, usage_kind });

impl Usage {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        usage_kind: UsageKind,
    ) -> Self {
        Usage {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            usage_kind,
        }
    }
}

impl Record for Usage {
    const KIND: RecordKind = RecordKind::Usage;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "usageKind", self.usage_kind.as_str());
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(Usage {
            base: SymbolWithId::load_from(&reader)?,
            usage_kind: reader.tagged("usageKind")?,
        })
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Usage[{}]: {}@{}/{}",
            self.usage_kind,
            self.base.symbol_id,
            self.base.symbol.source_file_name.as_deref().unwrap_or(""),
            self.base.symbol.position
        )
    }
}

// ============================================================================
// SymbolAlias
// ============================================================================

/// A secondary id that resolves to a canonical symbol id.
///
/// The id layer holds the alias id; `canonical_id` (serialized as
/// `canonicalId`) is the symbol it stands for. The scope of the alias is the
/// source file and artifact of the layers.
#[derive(Debug, Clone, Default)]
pub struct SymbolAlias {
    pub base: SymbolWithId,
    pub canonical_id: String,
}

record_identity!(SymbolAlias { base, canonical_id });

impl SymbolAlias {
    pub fn new(
        source_file_name: impl Into<String>,
        alias_id: impl Into<String>,
        canonical_id: impl Into<String>,
    ) -> Self {
        SymbolAlias {
            base: SymbolWithId::new(Position::UNKNOWN, source_file_name, alias_id),
            canonical_id: canonical_id.into(),
        }
    }

    /// The alternate id.
    pub fn alias_id(&self) -> &str {
        &self.base.symbol_id
    }
}

impl Record for SymbolAlias {
    const KIND: RecordKind = RecordKind::SymbolAlias;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "canonicalId", self.canonical_id.as_str());
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(SymbolAlias {
            base: SymbolWithId::load_from(&reader)?,
            canonical_id: reader.string("canonicalId")?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
