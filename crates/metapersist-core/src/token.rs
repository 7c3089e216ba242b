//! Token-location index over declarations.
//!
//! Maps each declared name to every position it was declared at. Types and
//! classes contribute both their simple name and their fully qualified id.
//! References (usages, aliases, invocations, allocations) and string
//! constants are not indexed. The index is derived on demand and never
//! persisted.

use std::collections::{BTreeMap, BTreeSet};

use crate::metadata::{JvmMetadata, SourceMetadata};
use crate::model::Identified;
use crate::types::Position;

/// Token to the set of positions where it is declared.
pub type TokenLocations = BTreeMap<String, BTreeSet<Position>>;

/// Containers that can build a [`TokenLocations`] index.
pub trait TokenLocator {
    fn token_locations(&self) -> TokenLocations;
}

/// Record `token` at `position`.
pub fn add_token_with_location(locations: &mut TokenLocations, token: &str, position: Position) {
    locations
        .entry(token.to_string())
        .or_default()
        .insert(position);
}

/// Index a declaration under its name and, when requested, its symbol id.
fn add_declaration<T: Identified>(
    locations: &mut TokenLocations,
    record: &T,
    name: &str,
    with_id: bool,
) {
    let position = record.position();
    add_token_with_location(locations, name, position);
    if with_id {
        add_token_with_location(locations, record.symbol_id(), position);
    }
}

impl TokenLocator for SourceMetadata {
    fn token_locations(&self) -> TokenLocations {
        let mut locations = TokenLocations::new();
        for ty in &self.types {
            add_declaration(&mut locations, ty, &ty.name, true);
        }
        for field in &self.fields {
            add_declaration(&mut locations, field, &field.name, false);
        }
        for function in &self.functions {
            add_declaration(&mut locations, function, &function.name, false);
        }
        locations
    }
}

impl TokenLocator for JvmMetadata {
    fn token_locations(&self) -> TokenLocations {
        let mut locations = TokenLocations::new();
        for class in &self.jvm_classes {
            add_declaration(&mut locations, class, &class.name, true);
        }
        for field in &self.jvm_fields {
            add_declaration(&mut locations, field, &field.name, false);
        }
        for method in &self.jvm_methods {
            add_declaration(&mut locations, method, &method.name, false);
        }
        for variable in &self.jvm_variables {
            add_declaration(&mut locations, variable, &variable.name, false);
        }
        locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Function, JvmClass, JvmField, JvmMethodInvocation, JvmStringConstant, Type, Usage,
        UsageKind,
    };

    #[test]
    fn class_and_field_share_a_token() {
        let mut metadata = JvmMetadata::new();
        metadata.jvm_classes.insert(JvmClass::new(
            Position::new(1, 1, 2, 1),
            "Foo.java",
            "p.Foo",
            "Foo",
            "p",
        ));
        metadata.jvm_fields.insert(JvmField::new(
            Position::new(3, 1, 3, 10),
            "Foo.java",
            "<p.Foo: p.Foo Foo>",
            "Foo",
            "p.Foo",
            "p.Foo",
        ));

        let locations = metadata.token_locations();
        let foo: Vec<Position> = locations["Foo"].iter().copied().collect();
        assert_eq!(foo, vec![Position::new(1, 1, 2, 1), Position::new(3, 1, 3, 10)]);
        assert!(locations["p.Foo"].contains(&Position::new(1, 1, 2, 1)));
        assert!(!locations.contains_key("<p.Foo: p.Foo Foo>"));
    }

    #[test]
    fn references_are_not_indexed() {
        let mut metadata = JvmMetadata::new();
        metadata.usages.insert(Usage::new(
            Position::new(5, 1, 5, 4),
            "Foo.java",
            "p.Bar",
            UsageKind::Type,
        ));
        metadata.jvm_invocations.insert(JvmMethodInvocation::new(
            Position::new(6, 1, 6, 9),
            "Foo.java",
            "p.Foo.run/call/0",
            "call",
            "p.Foo.run",
        ));
        metadata.jvm_string_constants.insert(JvmStringConstant::new(
            Position::new(7, 1, 7, 6),
            "Foo.java",
            "text",
            "p.Foo.run",
        ));
        assert!(metadata.token_locations().is_empty());
    }

    #[test]
    fn source_types_contribute_name_and_id() {
        let mut metadata = SourceMetadata::new();
        metadata.types.insert(Type::new(Position::new(1, 1, 1, 5), "a.c", "t1", "Name"));
        metadata.functions.insert(Function::new(
            Position::new(3, 1, 3, 9),
            "a.c",
            "f1",
            "Name",
            "void",
        ));
        let locations = metadata.token_locations();
        assert_eq!(locations["Name"].len(), 2);
        assert_eq!(locations["t1"].len(), 1);
        assert!(!locations.contains_key("f1"));
    }

    #[test]
    fn repeated_positions_collapse() {
        let mut locations = TokenLocations::new();
        add_token_with_location(&mut locations, "x", Position::new(1, 1, 1, 2));
        add_token_with_location(&mut locations, "x", Position::new(1, 1, 1, 2));
        assert_eq!(locations["x"].len(), 1);
    }
}
