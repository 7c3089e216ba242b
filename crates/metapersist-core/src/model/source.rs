//! Language-agnostic declaration records: [`Type`], [`Field`], [`Function`].

use crate::error::RecordResult;
use crate::model::fields::{put, put_opt, put_position, MapReader};
use crate::model::{JsonMap, Record, RecordKind, SymbolWithId};
use crate::types::Position;

// ============================================================================
// Type
// ============================================================================

/// A type declaration (class, struct, typedef, ...).
#[derive(Debug, Clone, Default)]
pub struct Type {
    pub base: SymbolWithId,
    pub name: String,
}

record_identity!(Type { base, name });

impl Type {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Type {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
        }
    }
}

impl Record for Type {
    const KIND: RecordKind = RecordKind::Type;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(Type {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
        })
    }
}

// ============================================================================
// Field
// ============================================================================

/// A field (member variable) declaration.
#[derive(Debug, Clone, Default)]
pub struct Field {
    pub base: SymbolWithId,
    pub name: String,
    /// Declared type, serialized as `type`.
    pub type_name: String,
    /// Symbol id of the declaring type.
    pub declaring_symbol_id: Option<String>,
}

record_identity!(Field {
    base,
    name,
    type_name,
    declaring_symbol_id
});

impl Field {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Field {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            type_name: type_name.into(),
            declaring_symbol_id: None,
        }
    }

    pub fn with_declaring_symbol(mut self, declaring_symbol_id: impl Into<String>) -> Self {
        self.declaring_symbol_id = Some(declaring_symbol_id.into());
        self
    }
}

impl Record for Field {
    const KIND: RecordKind = RecordKind::Field;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "type", self.type_name.as_str());
        put_opt(&mut map, "declaringSymbolId", &self.declaring_symbol_id);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(Field {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            type_name: reader.string("type")?,
            declaring_symbol_id: reader.opt_string("declaringSymbolId")?,
        })
    }
}

// ============================================================================
// Function
// ============================================================================

/// A function or method declaration.
///
/// `outer_position` spans the whole body and is distinct from the declaration
/// span in the id layer. Neither span takes part in equality.
#[derive(Debug, Clone, Default)]
pub struct Function {
    pub base: SymbolWithId,
    pub name: String,
    pub return_type: String,
    /// Parameter names, in declaration order.
    pub params: Vec<String>,
    /// Parameter types, parallel to `params`.
    pub param_types: Vec<String>,
    /// Symbol id of the declaring type, if any.
    pub declaring_symbol_id: Option<String>,
    pub outer_position: Position,
}

record_identity!(Function {
    base,
    name,
    return_type,
    params,
    param_types,
    declaring_symbol_id
});

impl Function {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Function {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            return_type: return_type.into(),
            ..Default::default()
        }
    }

    /// Set parameter names and types.
    pub fn with_params(mut self, params: Vec<String>, param_types: Vec<String>) -> Self {
        self.params = params;
        self.param_types = param_types;
        self
    }

    pub fn with_declaring_symbol(mut self, declaring_symbol_id: impl Into<String>) -> Self {
        self.declaring_symbol_id = Some(declaring_symbol_id.into());
        self
    }

    pub fn with_outer_position(mut self, outer_position: Position) -> Self {
        self.outer_position = outer_position;
        self
    }
}

impl Record for Function {
    const KIND: RecordKind = RecordKind::Function;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "returnType", self.return_type.as_str());
        put(&mut map, "params", self.params.clone());
        put(&mut map, "paramTypes", self.param_types.clone());
        put_opt(&mut map, "declaringSymbolId", &self.declaring_symbol_id);
        put_position(&mut map, "outerPosition", &self.outer_position);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(Function {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            return_type: reader.string("returnType")?,
            params: reader.strings("params")?,
            param_types: reader.strings("paramTypes")?,
            declaring_symbol_id: reader.opt_string("declaringSymbolId")?,
            outer_position: reader.position("outerPosition")?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
