//! End-to-end report scenarios: populate a container, write a report file,
//! read it back and compare.

use std::fs;

use metapersist::config::{Configuration, Printer};
use metapersist::error::{MetadataError, ReportError};
use metapersist::metadata::{JvmMetadata, Metadata, SourceMetadata};
use metapersist::model::{
    AnyRecord, Artifact, ArtifactKind, JvmClass, JvmField, JvmHeapAllocation, JvmMethod,
    JvmMethodInvocation, JvmStringConstant, JvmVariable, SourceFile, SymbolAlias, Type, Usage,
    UsageKind,
};
use metapersist::report::{
    load_report_file, read_report_file, FileReporter, JvmFileReporter, SourceFileReporter,
};
use metapersist::token::TokenLocator;
use metapersist::types::Position;
use serde_json::{json, Value};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn jvm_records() -> Vec<AnyRecord> {
    let method_id = "<p.Foo: void run(int)>";
    let mut class = JvmClass::new(Position::new(1, 1, 20, 1), "p/Foo.java", "p.Foo", "Foo", "p")
        .with_super_types(vec!["java.lang.Runnable".to_string()]);
    class.is_public = true;
    let method = JvmMethod::new(
        Position::new(5, 5, 5, 30),
        "p/Foo.java",
        method_id,
        "run",
        "p.Foo",
        "void",
    )
    .with_params(vec!["n".to_string()], vec!["int".to_string()])
    .with_outer_position(Position::new(5, 5, 12, 6));

    vec![
        class.into(),
        JvmField::new(
            Position::new(3, 5, 3, 20),
            "p/Foo.java",
            "<p.Foo: int count>",
            "count",
            "int",
            "p.Foo",
        )
        .into(),
        method.into(),
        JvmVariable::new(
            Position::new(5, 18, 5, 23),
            "p/Foo.java",
            "<p.Foo: void run(int)>/n",
            "n",
            "int",
            method_id,
            false,
            true,
        )
        .into(),
        JvmMethodInvocation::new(
            Position::new(7, 9, 7, 30),
            "p/Foo.java",
            "<p.Foo: void run(int)>/println/0",
            "println",
            method_id,
        )
        .into(),
        JvmHeapAllocation::new(
            Position::new(8, 9, 8, 25),
            "p/Foo.java",
            "<p.Foo: void run(int)>/new java.lang.StringBuilder/0",
            "java.lang.StringBuilder",
            method_id,
        )
        .into(),
        JvmStringConstant::new(Position::new(7, 28, 7, 35), "p/Foo.java", "hello", method_id)
            .into(),
        Usage::new(
            Position::new(9, 9, 9, 14),
            "p/Foo.java",
            "<p.Foo: int count>",
            UsageKind::DataWrite,
        )
        .into(),
        SymbolAlias::new("p/Foo.java", "var1-alias", "m1/var1").into(),
        SourceFile::new("app.jar", "p/Foo.java", "f1").into(),
        Artifact::new("app", "app.jar", ArtifactKind::Jar)
            .with_size(1u64 << 40)
            .with_checksum(u64::MAX)
            .into(),
    ]
}

fn populate(records: impl IntoIterator<Item = AnyRecord>) -> JvmMetadata {
    let mut metadata = JvmMetadata::new();
    for record in records {
        metadata.insert(record).unwrap();
    }
    metadata
}

fn write_jvm(dir: &TempDir, name: &str, metadata: &JvmMetadata) -> String {
    let path = dir.path().join(name);
    JvmFileReporter::new(Configuration::default(), metadata)
        .create_report_file(&path)
        .unwrap();
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn minimal_type_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("source.json");

    let ty = Type::new(Position::new(1, 1, 1, 10), "a.c", "t1", "Name");
    let mut metadata = SourceMetadata::new();
    metadata.insert(ty.clone().into()).unwrap();
    SourceFileReporter::new(Configuration::default(), &metadata)
        .create_report_file(&path)
        .unwrap();

    let document = read_report_file(&path).unwrap();
    let types = document["Type"].as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["id"], json!("t1"));
    assert_eq!(types[0]["name"], json!("Name"));
    assert_eq!(types[0]["sourceFileName"], json!("a.c"));

    let back: SourceMetadata = load_report_file(&path).unwrap();
    assert_eq!(back.types.len(), 1);
    assert_eq!(back.types.iter().next(), Some(&ty));
}

#[test]
fn every_jvm_kind_round_trips_through_a_file() {
    let temp = TempDir::new().unwrap();
    let metadata = populate(jvm_records());
    let text = write_jvm(&temp, "jvm.json", &metadata);

    let back = JvmMetadata::from_json_str(&text).unwrap();
    assert_eq!(back.len(), metadata.len());
    for record in jvm_records() {
        let mut copy = back.clone();
        assert!(
            !copy.insert(record.clone()).unwrap(),
            "{:?} was not read back",
            record.kind()
        );
    }

    let method = back.jvm_methods.iter().next().unwrap();
    assert_eq!(method.outer_position, Position::new(5, 5, 12, 6));
    let artifact = back.shared.artifacts.iter().next().unwrap();
    assert_eq!(artifact.size_in_bytes, 1_099_511_627_776);
    assert_eq!(artifact.checksum, u64::MAX);
}

#[test]
fn alias_is_found_after_round_trip() {
    let temp = TempDir::new().unwrap();
    let alias = SymbolAlias::new("Main.java", "var1-alias", "m1/var1");
    let metadata = populate([AnyRecord::from(alias.clone())]);
    let text = write_jvm(&temp, "alias.json", &metadata);

    let back = JvmMetadata::from_json_str(&text).unwrap();
    assert!(back.aliases.contains(&alias));
    let stored = back.aliases.iter().next().unwrap();
    assert_eq!(stored.alias_id(), "var1-alias");
    assert_eq!(stored.canonical_id, "m1/var1");
}

#[test]
fn large_integers_are_written_exactly() {
    let temp = TempDir::new().unwrap();
    let artifact = Artifact::new("a", "a.apk", ArtifactKind::Apk).with_size(1u64 << 40);
    let metadata = populate([AnyRecord::from(artifact)]);
    let text = write_jvm(&temp, "artifact.json", &metadata);
    assert!(text.contains("\"sizeInBytes\":1099511627776"));
    assert!(!text.contains("1.099511627776e12"));
}

#[test]
fn insertion_order_does_not_change_bytes() {
    let temp = TempDir::new().unwrap();
    let forward = populate(jvm_records());
    let backward = populate(jvm_records().into_iter().rev());
    assert_eq!(
        write_jvm(&temp, "forward.json", &forward),
        write_jvm(&temp, "backward.json", &backward)
    );
}

#[test]
fn reports_sort_by_symbol_id() {
    let temp = TempDir::new().unwrap();
    let ids = ["p.C", "p.A", "p.B"];
    let metadata = populate(ids.iter().map(|id| {
        AnyRecord::from(JvmClass::new(Position::UNKNOWN, "p/X.java", *id, &id[2..], "p"))
    }));
    let text = write_jvm(&temp, "classes.json", &metadata);
    let document: Value = serde_json::from_str(&text).unwrap();
    let written: Vec<&str> = document["JvmClass"]
        .as_array()
        .unwrap()
        .iter()
        .map(|class| class["id"].as_str().unwrap())
        .collect();
    assert_eq!(written, vec!["p.A", "p.B", "p.C"]);
}

#[test]
fn library_records_keep_source_flag_through_a_file() {
    let temp = TempDir::new().unwrap();
    let mut class = JvmClass::new(
        Position::UNKNOWN,
        "String.class",
        "java.lang.String",
        "String",
        "java.lang",
    );
    class.base = class.base.with_source(false);
    let mut constant =
        JvmStringConstant::new(Position::UNKNOWN, "String.class", "null", "java.lang.String");
    constant.symbol = constant.symbol.with_source(false);
    let metadata = populate([AnyRecord::from(class), AnyRecord::from(constant)]);
    let text = write_jvm(&temp, "library.json", &metadata);

    let document: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document["JvmClass"][0]["source"], json!(false));
    assert_eq!(document["JvmStringConstant"][0]["source"], json!(false));

    let back = JvmMetadata::from_json_str(&text).unwrap();
    assert!(!back.jvm_classes.iter().next().unwrap().base.symbol.source);
    assert!(!back.jvm_string_constants.iter().next().unwrap().symbol.source);
}

#[test]
fn double_insert_is_idempotent() {
    let mut metadata = populate(jvm_records());
    let before = metadata.len();
    for record in jvm_records() {
        assert!(!metadata.insert(record).unwrap());
    }
    assert_eq!(metadata.len(), before);
}

#[test]
fn token_index_collects_declarations() {
    let mut metadata = JvmMetadata::new();
    metadata.jvm_classes.insert(JvmClass::new(
        Position::new(1, 1, 2, 1),
        "Foo.java",
        "Foo",
        "Foo",
        "",
    ));
    metadata.jvm_fields.insert(JvmField::new(
        Position::new(3, 1, 3, 10),
        "Foo.java",
        "<Foo: Foo Foo>",
        "Foo",
        "Foo",
        "Foo",
    ));
    let locations = metadata.token_locations();
    let foo = &locations["Foo"];
    assert_eq!(foo.len(), 2);
    assert!(foo.contains(&Position::new(1, 1, 2, 1)));
    assert!(foo.contains(&Position::new(3, 1, 3, 10)));
}

#[test]
fn summary_lines_match_container_sizes() {
    let metadata = populate(jvm_records());
    let mut printer = Printer::new(Vec::new(), false);
    JvmFileReporter::new(Configuration::default(), &metadata)
        .print_report_stats(&mut printer)
        .unwrap();
    let text = String::from_utf8(printer.into_inner()).unwrap();
    for line in [
        "Classes: 1",
        "Fields: 1",
        "Methods: 1",
        "Variables: 1",
        "HeapAllocations: 1",
        "MethodInvocations: 1",
        "Usages: 1",
        "Aliases: 1",
        "StringConstants: 1",
        "SourceFiles: 1",
        "Artifacts: 1",
    ] {
        assert!(text.lines().any(|l| l == line), "missing line {line}");
    }
}

// ============================================================================
// Failure Paths
// ============================================================================

#[test]
fn failed_write_leaves_no_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("no-such-dir").join("report.json");
    let metadata = populate(jvm_records());
    let result = JvmFileReporter::new(Configuration::default(), &metadata).create_report_file(&path);
    assert!(matches!(result, Err(ReportError::Io(_))));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn wrong_shapes_are_rejected_with_context() {
    let err = JvmMetadata::from_value(&json!({"JvmClass": [{"id": "p.A", "superTypes": "x"}]}))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "metadata key 'JvmClass' element 0: JvmClass.superTypes: expected array, found string"
    );

    let err = JvmMetadata::from_value(&json!({"Usage": "none"})).unwrap_err();
    assert!(matches!(err, MetadataError::NotAnArray { key: "Usage", found: "string" }));
}

#[test]
fn unknown_top_level_keys_are_ignored() {
    let document = json!({
        "SymbolAlias": [{"id": "a", "canonicalId": "b"}],
        "Comment": "written by a newer tool",
    });
    let metadata = JvmMetadata::from_value(&document).unwrap();
    assert_eq!(metadata.len(), 1);
}
