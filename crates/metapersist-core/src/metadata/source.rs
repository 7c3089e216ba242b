//! Language-agnostic metadata family.

use std::io::{self, Write};

use crate::config::Printer;
use crate::error::{MetadataError, MetadataResult};
use crate::metadata::{
    extend_counting, print_count, put_records, read_records, sorted_by_symbol_id, Metadata,
    RecordSet, SharedMetadata,
};
use crate::model::{AnyRecord, Field, Function, JsonMap, RecordKind, Type};

/// Types, functions and fields of a non-JVM front-end, plus the shared sets.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    pub types: RecordSet<Type>,
    pub functions: RecordSet<Function>,
    pub fields: RecordSet<Field>,
    pub shared: SharedMetadata,
}

impl SourceMetadata {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metadata for SourceMetadata {
    const FAMILY: &'static str = "source";

    const REPORT_KEYS: &'static [RecordKind] = &[
        RecordKind::Type,
        RecordKind::Function,
        RecordKind::Field,
        RecordKind::SourceFile,
        RecordKind::Artifact,
    ];

    fn insert(&mut self, record: AnyRecord) -> MetadataResult<bool> {
        match record {
            AnyRecord::Type(ty) => Ok(self.types.insert(ty)),
            AnyRecord::Function(function) => Ok(self.functions.insert(function)),
            AnyRecord::Field(field) => Ok(self.fields.insert(field)),
            AnyRecord::SourceFile(file) => Ok(self.shared.source_files.insert(file)),
            AnyRecord::Artifact(artifact) => Ok(self.shared.artifacts.insert(artifact)),
            other => Err(MetadataError::UnsupportedKind {
                kind: other.kind(),
                family: Self::FAMILY,
            }),
        }
    }

    fn len(&self) -> usize {
        self.types.len() + self.functions.len() + self.fields.len() + self.shared.len()
    }

    fn merge(&mut self, other: Self) -> usize {
        extend_counting(&mut self.types, other.types)
            + extend_counting(&mut self.functions, other.functions)
            + extend_counting(&mut self.fields, other.fields)
            + self.shared.merge(other.shared)
    }

    fn populate_json_report(&self, report: &mut JsonMap) {
        put_records(Self::FAMILY, report, sorted_by_symbol_id(&self.types));
        put_records(Self::FAMILY, report, sorted_by_symbol_id(&self.functions));
        put_records(Self::FAMILY, report, sorted_by_symbol_id(&self.fields));
        self.shared.populate_json_report(Self::FAMILY, report);
    }

    fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()> {
        print_count(printer, "Types", self.types.len())?;
        print_count(printer, "Functions", self.functions.len())?;
        print_count(printer, "Fields", self.fields.len())?;
        self.shared.print_report_stats(printer)
    }

    fn from_map(document: &JsonMap) -> MetadataResult<Self> {
        Ok(SourceMetadata {
            types: read_records::<Type>(document)?.into_iter().collect(),
            functions: read_records::<Function>(document)?.into_iter().collect(),
            fields: read_records::<Field>(document)?.into_iter().collect(),
            shared: SharedMetadata::from_map(document)?,
        })
    }
}
