//! JVM-specific records produced by Java source or bytecode analyses.
//!
//! Classes, fields, methods and variables are declarations; invocations and
//! heap allocations are sites inside a method body; string constants are pure
//! values with no unique id.

use crate::error::RecordResult;
use crate::model::fields::{put, put_opt, put_position, MapReader};
use crate::model::{JsonMap, Record, RecordKind, Symbol, SymbolWithId};
use crate::types::Position;

// ============================================================================
// JvmClass
// ============================================================================

/// A class, interface or enum type.
///
/// The symbol id is the fully qualified name; `name` is the simple name.
#[derive(Debug, Clone, Default)]
pub struct JvmClass {
    pub base: SymbolWithId,
    pub name: String,
    pub package_name: String,
    pub is_interface: bool,
    pub is_enum: bool,
    pub is_static: bool,
    pub is_inner: bool,
    pub is_anonymous: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_public: bool,
    pub is_protected: bool,
    pub is_private: bool,
    /// Id of the type or method this type is declared in.
    pub declaring_symbol_id: Option<String>,
    pub size_in_bytes: u64,
    /// Fully qualified names of the types this type extends or implements.
    pub super_types: Vec<String>,
}

record_identity!(JvmClass {
    base,
    name,
    package_name,
    is_interface,
    is_enum,
    is_static,
    is_inner,
    is_anonymous,
    is_abstract,
    is_final,
    is_public,
    is_protected,
    is_private,
    declaring_symbol_id,
    size_in_bytes,
    super_types,
});

impl JvmClass {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        JvmClass {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    pub fn with_super_types(mut self, super_types: Vec<String>) -> Self {
        self.super_types = super_types;
        self
    }

    pub fn with_declaring_symbol(mut self, declaring_symbol_id: impl Into<String>) -> Self {
        self.declaring_symbol_id = Some(declaring_symbol_id.into());
        self
    }
}

impl Record for JvmClass {
    const KIND: RecordKind = RecordKind::JvmClass;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "packageName", self.package_name.as_str());
        put(&mut map, "isInterface", self.is_interface);
        put(&mut map, "isEnum", self.is_enum);
        put(&mut map, "isStatic", self.is_static);
        put(&mut map, "isInner", self.is_inner);
        put(&mut map, "isAnonymous", self.is_anonymous);
        put(&mut map, "isAbstract", self.is_abstract);
        put(&mut map, "isFinal", self.is_final);
        put(&mut map, "isPublic", self.is_public);
        put(&mut map, "isProtected", self.is_protected);
        put(&mut map, "isPrivate", self.is_private);
        put_opt(&mut map, "declaringSymbolId", &self.declaring_symbol_id);
        put(&mut map, "sizeInBytes", self.size_in_bytes);
        put(&mut map, "superTypes", self.super_types.clone());
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmClass {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            package_name: reader.string("packageName")?,
            is_interface: reader.bool("isInterface")?,
            is_enum: reader.bool("isEnum")?,
            is_static: reader.bool("isStatic")?,
            is_inner: reader.bool("isInner")?,
            is_anonymous: reader.bool("isAnonymous")?,
            is_abstract: reader.bool("isAbstract")?,
            is_final: reader.bool("isFinal")?,
            is_public: reader.bool("isPublic")?,
            is_protected: reader.bool("isProtected")?,
            is_private: reader.bool("isPrivate")?,
            declaring_symbol_id: reader.opt_string("declaringSymbolId")?,
            size_in_bytes: reader.u64("sizeInBytes")?,
            super_types: reader.strings("superTypes")?,
        })
    }
}

// ============================================================================
// JvmField
// ============================================================================

/// A field of a class or interface.
#[derive(Debug, Clone, Default)]
pub struct JvmField {
    pub base: SymbolWithId,
    pub name: String,
    /// Declared type, serialized as `type`.
    pub type_name: String,
    pub declaring_class_id: Option<String>,
    pub is_static: bool,
}

record_identity!(JvmField {
    base,
    name,
    type_name,
    declaring_class_id,
    is_static
});

impl JvmField {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        declaring_class_id: impl Into<String>,
    ) -> Self {
        JvmField {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            type_name: type_name.into(),
            declaring_class_id: Some(declaring_class_id.into()),
            is_static: false,
        }
    }
}

impl Record for JvmField {
    const KIND: RecordKind = RecordKind::JvmField;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "type", self.type_name.as_str());
        put_opt(&mut map, "declaringClassId", &self.declaring_class_id);
        put(&mut map, "isStatic", self.is_static);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmField {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            type_name: reader.string("type")?,
            declaring_class_id: reader.opt_string("declaringClassId")?,
            is_static: reader.bool("isStatic")?,
        })
    }
}

// ============================================================================
// JvmMethod
// ============================================================================

/// A method or constructor.
///
/// `outer_position` spans the method body; the id layer's position spans the
/// declaration.
#[derive(Debug, Clone, Default)]
pub struct JvmMethod {
    pub base: SymbolWithId,
    pub name: String,
    pub return_type: String,
    pub params: Vec<String>,
    pub param_types: Vec<String>,
    pub declaring_class_id: Option<String>,
    pub outer_position: Position,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_native: bool,
    pub is_synchronized: bool,
    pub is_final: bool,
    pub is_synthetic: bool,
    pub is_public: bool,
    pub is_protected: bool,
    pub is_private: bool,
}

record_identity!(JvmMethod {
    base,
    name,
    return_type,
    params,
    param_types,
    declaring_class_id,
    is_static,
    is_abstract,
    is_native,
    is_synchronized,
    is_final,
    is_synthetic,
    is_public,
    is_protected,
    is_private,
});

impl JvmMethod {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        declaring_class_id: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        JvmMethod {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            declaring_class_id: Some(declaring_class_id.into()),
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

    pub fn with_outer_position(mut self, outer_position: Position) -> Self {
        self.outer_position = outer_position;
        self
    }
}

impl Record for JvmMethod {
    const KIND: RecordKind = RecordKind::JvmMethod;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "returnType", self.return_type.as_str());
        put(&mut map, "params", self.params.clone());
        put(&mut map, "paramTypes", self.param_types.clone());
        put_opt(&mut map, "declaringClassId", &self.declaring_class_id);
        put_position(&mut map, "outerPosition", &self.outer_position);
        put(&mut map, "isStatic", self.is_static);
        put(&mut map, "isAbstract", self.is_abstract);
        put(&mut map, "isNative", self.is_native);
        put(&mut map, "isSynchronized", self.is_synchronized);
        put(&mut map, "isFinal", self.is_final);
        put(&mut map, "isSynthetic", self.is_synthetic);
        put(&mut map, "isPublic", self.is_public);
        put(&mut map, "isProtected", self.is_protected);
        put(&mut map, "isPrivate", self.is_private);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmMethod {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            return_type: reader.string("returnType")?,
            params: reader.strings("params")?,
            param_types: reader.strings("paramTypes")?,
            declaring_class_id: reader.opt_string("declaringClassId")?,
            outer_position: reader.position("outerPosition")?,
            is_static: reader.bool("isStatic")?,
            is_abstract: reader.bool("isAbstract")?,
            is_native: reader.bool("isNative")?,
            is_synchronized: reader.bool("isSynchronized")?,
            is_final: reader.bool("isFinal")?,
            is_synthetic: reader.bool("isSynthetic")?,
            is_public: reader.bool("isPublic")?,
            is_protected: reader.bool("isProtected")?,
            is_private: reader.bool("isPrivate")?,
        })
    }
}

// ============================================================================
// JvmVariable
// ============================================================================

/// A local variable or parameter of a JVM method.
///
/// For bytecode these come from an IR's locals; for dex code from its
/// registers.
#[derive(Debug, Clone, Default)]
pub struct JvmVariable {
    pub base: SymbolWithId,
    pub name: String,
    /// Declared type, serialized as `type`.
    pub type_name: String,
    pub is_local: bool,
    pub is_parameter: bool,
    pub declaring_method_id: Option<String>,
    /// True inside an instance initializer block.
    pub in_iib: bool,
}

record_identity!(JvmVariable {
    base,
    name,
    type_name,
    is_local,
    is_parameter,
    declaring_method_id,
    in_iib
});

impl JvmVariable {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        declaring_method_id: impl Into<String>,
        is_local: bool,
        is_parameter: bool,
    ) -> Self {
        JvmVariable {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            type_name: type_name.into(),
            is_local,
            is_parameter,
            declaring_method_id: Some(declaring_method_id.into()),
            in_iib: false,
        }
    }
}

impl Record for JvmVariable {
    const KIND: RecordKind = RecordKind::JvmVariable;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "type", self.type_name.as_str());
        put(&mut map, "isLocal", self.is_local);
        put(&mut map, "isParameter", self.is_parameter);
        put_opt(&mut map, "declaringMethodId", &self.declaring_method_id);
        put(&mut map, "inIIB", self.in_iib);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmVariable {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            type_name: reader.string("type")?,
            is_local: reader.bool("isLocal")?,
            is_parameter: reader.bool("isParameter")?,
            declaring_method_id: reader.opt_string("declaringMethodId")?,
            in_iib: reader.bool("inIIB")?,
        })
    }
}

// ============================================================================
// JvmMethodInvocation
// ============================================================================

/// A method call site.
#[derive(Debug, Clone, Default)]
pub struct JvmMethodInvocation {
    pub base: SymbolWithId,
    /// Name of the invoked method.
    pub name: String,
    pub invoking_method_id: Option<String>,
    pub in_iib: bool,
}

record_identity!(JvmMethodInvocation {
    base,
    name,
    invoking_method_id,
    in_iib
});

impl JvmMethodInvocation {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        name: impl Into<String>,
        invoking_method_id: impl Into<String>,
    ) -> Self {
        JvmMethodInvocation {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            name: name.into(),
            invoking_method_id: Some(invoking_method_id.into()),
            in_iib: false,
        }
    }
}

impl Record for JvmMethodInvocation {
    const KIND: RecordKind = RecordKind::JvmMethodInvocation;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "name", self.name.as_str());
        put_opt(&mut map, "invokingMethodId", &self.invoking_method_id);
        put(&mut map, "inIIB", self.in_iib);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmMethodInvocation {
            base: SymbolWithId::load_from(&reader)?,
            name: reader.string("name")?,
            invoking_method_id: reader.opt_string("invokingMethodId")?,
            in_iib: reader.bool("inIIB")?,
        })
    }
}

// ============================================================================
// JvmHeapAllocation
// ============================================================================

/// An allocation site (`new T`, `new T[n]`).
#[derive(Debug, Clone, Default)]
pub struct JvmHeapAllocation {
    pub base: SymbolWithId,
    pub allocated_type_id: String,
    pub allocating_method_id: Option<String>,
    pub in_iib: bool,
    pub is_array: bool,
}

record_identity!(JvmHeapAllocation {
    base,
    allocated_type_id,
    allocating_method_id,
    in_iib,
    is_array
});

impl JvmHeapAllocation {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        symbol_id: impl Into<String>,
        allocated_type_id: impl Into<String>,
        allocating_method_id: impl Into<String>,
    ) -> Self {
        JvmHeapAllocation {
            base: SymbolWithId::new(position, source_file_name, symbol_id),
            allocated_type_id: allocated_type_id.into(),
            allocating_method_id: Some(allocating_method_id.into()),
            in_iib: false,
            is_array: false,
        }
    }
}

impl Record for JvmHeapAllocation {
    const KIND: RecordKind = RecordKind::JvmHeapAllocation;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.base.save_to(&mut map);
        put(&mut map, "allocatedTypeId", self.allocated_type_id.as_str());
        put_opt(&mut map, "allocatingMethodId", &self.allocating_method_id);
        put(&mut map, "inIIB", self.in_iib);
        put(&mut map, "isArray", self.is_array);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmHeapAllocation {
            base: SymbolWithId::load_from(&reader)?,
            allocated_type_id: reader.string("allocatedTypeId")?,
            allocating_method_id: reader.opt_string("allocatingMethodId")?,
            in_iib: reader.bool("inIIB")?,
            is_array: reader.bool("isArray")?,
        })
    }
}

// ============================================================================
// JvmStringConstant
// ============================================================================

/// A string literal and the symbol it appears in.
///
/// Built on the plain [`Symbol`] layer: there is no unique id and no natural
/// order.
#[derive(Debug, Clone, Default)]
pub struct JvmStringConstant {
    pub symbol: Symbol,
    pub value: String,
    pub declaring_symbol_id: Option<String>,
}

record_identity!(JvmStringConstant {
    value,
    declaring_symbol_id
});

impl JvmStringConstant {
    pub fn new(
        position: Position,
        source_file_name: impl Into<String>,
        value: impl Into<String>,
        declaring_symbol_id: impl Into<String>,
    ) -> Self {
        JvmStringConstant {
            symbol: Symbol::new(position, source_file_name),
            value: value.into(),
            declaring_symbol_id: Some(declaring_symbol_id.into()),
        }
    }
}

impl Record for JvmStringConstant {
    const KIND: RecordKind = RecordKind::JvmStringConstant;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        self.symbol.save_to(&mut map);
        put(&mut map, "value", self.value.as_str());
        put_opt(&mut map, "declaringSymbolId", &self.declaring_symbol_id);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(JvmStringConstant {
            symbol: Symbol::load_from(&reader)?,
            value: reader.string("value")?,
            declaring_symbol_id: reader.opt_string("declaringSymbolId")?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identified;
    use serde_json::json;

    fn sample_class() -> JvmClass {
        let mut class = JvmClass::new(
            Position::new(3, 1, 40, 2),
            "p/Foo.java",
            "p.Foo",
            "Foo",
            "p",
        )
        .with_super_types(vec![
            "java.lang.Runnable".to_string(),
            "java.lang.Object".to_string(),
        ]);
        class.is_public = true;
        class.is_final = true;
        class.size_in_bytes = 5_000_000_000;
        class.base.artifact_name = Some("app.jar".to_string());
        class
    }

    mod class_tests {
        use super::*;

        #[test]
        fn class_map_keys() {
            let map = sample_class().to_map();
            for key in [
                "id",
                "name",
                "packageName",
                "isInterface",
                "isEnum",
                "isStatic",
                "isInner",
                "isAnonymous",
                "isAbstract",
                "isFinal",
                "isPublic",
                "isProtected",
                "isPrivate",
                "sizeInBytes",
                "superTypes",
                "artifactName",
                "position",
                "sourceFileName",
                "source",
            ] {
                assert!(map.contains_key(key), "missing key {key}");
            }
            assert!(!map.contains_key("declaringSymbolId"));
            assert_eq!(map["sizeInBytes"], json!(5_000_000_000u64));
        }

        #[test]
        fn class_round_trip_keeps_super_type_order() {
            let class = sample_class();
            let back = JvmClass::from_map(&class.to_map()).unwrap();
            assert_eq!(back, class);
            assert_eq!(back.super_types[0], "java.lang.Runnable");
            assert_eq!(back.artifact_name(), Some("app.jar"));
        }

        #[test]
        fn library_class_keeps_source_flag_false() {
            let mut class = sample_class();
            class.base = class.base.with_source(false);
            let map = class.to_map();
            assert_eq!(map["source"], json!(false));

            let back = JvmClass::from_map(&map).unwrap();
            assert!(!back.base.symbol.source);
            assert_eq!(back.source_file_name(), Some("p/Foo.java"));
            assert_eq!(back.to_map(), map);
        }

        #[test]
        fn same_id_different_flags_are_distinct() {
            let a = sample_class();
            let mut b = sample_class();
            b.is_abstract = true;
            assert_ne!(a, b);
        }

        #[test]
        fn class_rejects_non_boolean_flag() {
            let mut map = sample_class().to_map();
            map.insert("isEnum".to_string(), json!(1));
            let err = JvmClass::from_map(&map).unwrap_err();
            assert_eq!(err.to_string(), "JvmClass.isEnum: expected boolean, found number");
        }
    }

    mod member_tests {
        use super::*;

        #[test]
        fn field_round_trip() {
            let mut field = JvmField::new(
                Position::new(4, 5, 4, 12),
                "p/Foo.java",
                "<p.Foo: int count>",
                "count",
                "int",
                "p.Foo",
            );
            field.is_static = true;
            assert_eq!(JvmField::from_map(&field.to_map()).unwrap(), field);
        }

        #[test]
        fn method_position_errors_name_the_position_key() {
            let map = json!({"id": "m", "outerPosition": {"startLine": "x"}});
            let err = JvmMethod::from_value(&map).unwrap_err();
            assert_eq!(
                err.to_string(),
                "JvmMethod.outerPosition.startLine: expected integer, found string"
            );

            let map = json!({"id": "m", "position": {"endColumn": 1.5}});
            let err = JvmMethod::from_value(&map).unwrap_err();
            assert!(err
                .to_string()
                .starts_with("JvmMethod.position.endColumn: invalid value:"));
        }

        #[test]
        fn method_round_trip() {
            let mut method = JvmMethod::new(
                Position::new(6, 5, 6, 30),
                "p/Foo.java",
                "<p.Foo: void run(int,java.lang.String)>",
                "run",
                "p.Foo",
                "void",
            )
            .with_params(
                vec!["n".to_string(), "s".to_string()],
                vec!["int".to_string(), "java.lang.String".to_string()],
            )
            .with_outer_position(Position::new(6, 5, 12, 6));
            method.is_synchronized = true;
            method.is_public = true;

            let map = method.to_map();
            assert_eq!(
                map["outerPosition"],
                json!({"startLine": 6, "startColumn": 5, "endLine": 12, "endColumn": 6})
            );
            let back = JvmMethod::from_map(&map).unwrap();
            assert_eq!(back, method);
            assert_eq!(back.outer_position, method.outer_position);
        }

        #[test]
        fn variable_round_trip() {
            let mut variable = JvmVariable::new(
                Position::new(7, 9, 7, 10),
                "p/Foo.java",
                "<p.Foo: void run(int,java.lang.String)>/n",
                "n",
                "int",
                "<p.Foo: void run(int,java.lang.String)>",
                false,
                true,
            );
            variable.in_iib = true;
            let map = variable.to_map();
            assert_eq!(map["inIIB"], json!(true));
            assert_eq!(JvmVariable::from_map(&map).unwrap(), variable);
        }
    }

    mod site_tests {
        use super::*;

        #[test]
        fn invocation_round_trip() {
            let call = JvmMethodInvocation::new(
                Position::new(8, 9, 8, 20),
                "p/Foo.java",
                "<p.Foo: void run()>/println/0",
                "println",
                "<p.Foo: void run()>",
            );
            assert_eq!(JvmMethodInvocation::from_map(&call.to_map()).unwrap(), call);
        }

        #[test]
        fn allocation_round_trip() {
            let mut alloc = JvmHeapAllocation::new(
                Position::new(9, 9, 9, 25),
                "p/Foo.java",
                "<p.Foo: void run()>/new int[]/0",
                "int[]",
                "<p.Foo: void run()>",
            );
            alloc.is_array = true;
            assert_eq!(JvmHeapAllocation::from_map(&alloc.to_map()).unwrap(), alloc);
        }

        #[test]
        fn string_constant_has_no_id_key() {
            let constant = JvmStringConstant::new(
                Position::new(10, 20, 10, 27),
                "p/Foo.java",
                "hello",
                "<p.Foo: void run()>",
            );
            let map = constant.to_map();
            assert!(!map.contains_key("id"));
            assert_eq!(JvmStringConstant::from_map(&map).unwrap(), constant);
        }

        #[test]
        fn string_constants_equal_regardless_of_position() {
            let a = JvmStringConstant::new(Position::new(1, 1, 1, 5), "A.java", "x", "m");
            let b = JvmStringConstant::new(Position::new(2, 1, 2, 5), "A.java", "x", "m");
            assert_eq!(a, b);
        }
    }
}
