//! Record model: the closed hierarchy of program-element records.
//!
//! Every record kind converts to and from an ordered JSON map:
//! - [`Record::to_map`] writes the layers top-down (parent first), then the
//!   kind's own fields
//! - [`Record::from_map`] reads the same keys back, defaulting absent or
//!   `null` keys and rejecting values of the wrong shape
//!
//! # Identity Layers
//!
//! | Layer | Adds | Equality |
//! |-------|------|----------|
//! | [`Symbol`] | position, source file, source flag | nothing (metadata only) |
//! | [`SymbolWithId`] | symbol id, artifact name | symbol id |
//! | [`Element`] | root element id | root element id only |
//!
//! Layers are composed as fields, not inherited: each leaf struct embeds the
//! layer it builds on and calls that layer's `save_to`/`load_from`.
//!
//! # Kind Selection
//!
//! No key inside a record map selects its kind. Callers either know the
//! concrete type (`JvmClass::from_map`) or name the kind explicitly
//! ([`AnyRecord::from_map`]), which is what the metadata containers do with
//! their reserved report keys.

use std::fmt;

use serde_json::Value;

use crate::error::{json_shape, RecordError, RecordResult};
use crate::types::Position;

/// Ordered JSON object used as the map representation of records.
///
/// `serde_json::Map` keeps keys sorted, which makes serialized records
/// canonical without extra work.
pub type JsonMap = serde_json::Map<String, Value>;

/// Implement `PartialEq`, `Eq` and `Hash` over the listed identity fields.
///
/// Positions are never listed: they locate a record, they do not identify it.
macro_rules! record_identity {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $(self.$field == other.$field)&&+
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                $(self.$field.hash(state);)+
            }
        }
    };
}

pub mod artifact;
pub mod fields;
pub mod jvm;
pub mod source;
pub mod symbol;
pub mod usage;

pub use artifact::{Artifact, ArtifactKind, SourceFile};
pub use jvm::{
    JvmClass, JvmField, JvmHeapAllocation, JvmMethod, JvmMethodInvocation, JvmStringConstant,
    JvmVariable,
};
pub use source::{Field, Function, Type};
pub use symbol::{Element, Symbol, SymbolWithId};
pub use usage::{SymbolAlias, Usage, UsageKind};

// ============================================================================
// Record Kinds
// ============================================================================

/// The closed set of record kinds.
///
/// The kind name doubles as the reserved top-level key of the kind's array in
/// a JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Type,
    Field,
    Function,
    JvmClass,
    JvmField,
    JvmMethod,
    JvmVariable,
    JvmMethodInvocation,
    JvmHeapAllocation,
    JvmStringConstant,
    Usage,
    SymbolAlias,
    SourceFile,
    Artifact,
    Element,
}

impl RecordKind {
    /// Every kind, in declaration order.
    pub const ALL: [RecordKind; 15] = [
        RecordKind::Type,
        RecordKind::Field,
        RecordKind::Function,
        RecordKind::JvmClass,
        RecordKind::JvmField,
        RecordKind::JvmMethod,
        RecordKind::JvmVariable,
        RecordKind::JvmMethodInvocation,
        RecordKind::JvmHeapAllocation,
        RecordKind::JvmStringConstant,
        RecordKind::Usage,
        RecordKind::SymbolAlias,
        RecordKind::SourceFile,
        RecordKind::Artifact,
        RecordKind::Element,
    ];

    /// The kind name, also used as its report key.
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Type => "Type",
            RecordKind::Field => "Field",
            RecordKind::Function => "Function",
            RecordKind::JvmClass => "JvmClass",
            RecordKind::JvmField => "JvmField",
            RecordKind::JvmMethod => "JvmMethod",
            RecordKind::JvmVariable => "JvmVariable",
            RecordKind::JvmMethodInvocation => "JvmMethodInvocation",
            RecordKind::JvmHeapAllocation => "JvmHeapAllocation",
            RecordKind::JvmStringConstant => "JvmStringConstant",
            RecordKind::Usage => "Usage",
            RecordKind::SymbolAlias => "SymbolAlias",
            RecordKind::SourceFile => "SourceFile",
            RecordKind::Artifact => "Artifact",
            RecordKind::Element => "Element",
        }
    }

    /// Look a kind up by its name.
    pub fn from_name(name: &str) -> Option<RecordKind> {
        RecordKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether records of this kind carry a symbol id and therefore sort by it.
    pub fn is_symbol_with_id(&self) -> bool {
        !matches!(
            self,
            RecordKind::JvmStringConstant
                | RecordKind::SourceFile
                | RecordKind::Artifact
                | RecordKind::Element
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Record Traits
// ============================================================================

/// The serialization contract every record kind implements.
pub trait Record: Sized {
    /// The kind of this record type.
    const KIND: RecordKind;

    /// Map representation, layers first.
    fn to_map(&self) -> JsonMap;

    /// Rebuild a record from its map representation.
    fn from_map(map: &JsonMap) -> RecordResult<Self>;

    /// [`Record::to_map`] wrapped as a JSON value.
    fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Rebuild a record from a JSON value, which must be an object.
    fn from_value(value: &Value) -> RecordResult<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(RecordError::NotAnObject {
                kind: Self::KIND.name(),
                found: json_shape(other),
            }),
        }
    }
}

/// Records built on the [`SymbolWithId`] layer.
///
/// Their natural order is lexicographic by symbol id.
pub trait Identified: Record {
    /// The id layer of this record.
    fn identity(&self) -> &SymbolWithId;

    fn symbol_id(&self) -> &str {
        &self.identity().symbol_id
    }

    fn artifact_name(&self) -> Option<&str> {
        self.identity().artifact_name.as_deref()
    }

    fn position(&self) -> Position {
        self.identity().symbol.position
    }

    fn source_file_name(&self) -> Option<&str> {
        self.identity().symbol.source_file_name.as_deref()
    }
}

/// Implement [`Identified`] for leaf kinds that keep their id layer in `base`.
macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn identity(&self) -> &SymbolWithId {
                    &self.base
                }
            }
        )+
    };
}

impl_identified!(
    Type,
    Field,
    Function,
    JvmClass,
    JvmField,
    JvmMethod,
    JvmVariable,
    JvmMethodInvocation,
    JvmHeapAllocation,
    Usage,
    SymbolAlias,
);

// ============================================================================
// Tagged Records
// ============================================================================

/// A record of any kind.
///
/// Used where the kind is only known at run time, e.g. a front-end feeding a
/// container through [`crate::metadata::Metadata::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyRecord {
    Type(Type),
    Field(Field),
    Function(Function),
    JvmClass(JvmClass),
    JvmField(JvmField),
    JvmMethod(JvmMethod),
    JvmVariable(JvmVariable),
    JvmMethodInvocation(JvmMethodInvocation),
    JvmHeapAllocation(JvmHeapAllocation),
    JvmStringConstant(JvmStringConstant),
    Usage(Usage),
    SymbolAlias(SymbolAlias),
    SourceFile(SourceFile),
    Artifact(Artifact),
    Element(Element),
}

/// Generate the per-variant dispatch of [`AnyRecord`].
macro_rules! any_record_dispatch {
    ($($variant:ident),+ $(,)?) => {
        impl AnyRecord {
            /// The kind of the wrapped record.
            pub fn kind(&self) -> RecordKind {
                match self {
                    $(AnyRecord::$variant(_) => RecordKind::$variant,)+
                }
            }

            /// Map representation of the wrapped record.
            pub fn to_map(&self) -> JsonMap {
                match self {
                    $(AnyRecord::$variant(record) => record.to_map(),)+
                }
            }

            /// Rebuild a record of the given kind from its map representation.
            pub fn from_map(kind: RecordKind, map: &JsonMap) -> RecordResult<AnyRecord> {
                match kind {
                    $(RecordKind::$variant => Ok(AnyRecord::$variant($variant::from_map(map)?)),)+
                }
            }
        }

        $(
            impl From<$variant> for AnyRecord {
                fn from(record: $variant) -> Self {
                    AnyRecord::$variant(record)
                }
            }
        )+
    };
}

any_record_dispatch!(
    Type,
    Field,
    Function,
    JvmClass,
    JvmField,
    JvmMethod,
    JvmVariable,
    JvmMethodInvocation,
    JvmHeapAllocation,
    JvmStringConstant,
    Usage,
    SymbolAlias,
    SourceFile,
    Artifact,
    Element,
);

// ============================================================================
// Tests
// ============================================================================
