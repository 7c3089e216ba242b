//! JVM metadata family.

use std::io::{self, Write};

use crate::config::Printer;
use crate::error::{MetadataError, MetadataResult};
use crate::metadata::{
    extend_counting, print_count, put_records, read_records, sorted_by_symbol_id, Metadata,
    RecordSet, SharedMetadata,
};
use crate::model::{
    AnyRecord, JsonMap, JvmClass, JvmField, JvmHeapAllocation, JvmMethod, JvmMethodInvocation,
    JvmStringConstant, JvmVariable, RecordKind, SymbolAlias, Usage,
};

/// Everything a JVM front-end (source or bytecode) reports.
#[derive(Debug, Clone, Default)]
pub struct JvmMetadata {
    pub jvm_classes: RecordSet<JvmClass>,
    pub jvm_fields: RecordSet<JvmField>,
    pub jvm_methods: RecordSet<JvmMethod>,
    pub jvm_variables: RecordSet<JvmVariable>,
    pub jvm_invocations: RecordSet<JvmMethodInvocation>,
    pub jvm_heap_allocations: RecordSet<JvmHeapAllocation>,
    pub usages: RecordSet<Usage>,
    pub aliases: RecordSet<SymbolAlias>,
    /// Kept in insertion order in reports; there is no id to sort by.
    pub jvm_string_constants: RecordSet<JvmStringConstant>,
    pub shared: SharedMetadata,
}

impl JvmMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical id an alias id stands for, if an alias for it exists.
    pub fn canonical_id(&self, alias_id: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|alias| alias.alias_id() == alias_id)
            .map(|alias| alias.canonical_id.as_str())
    }
}

impl Metadata for JvmMetadata {
    const FAMILY: &'static str = "JVM";

    const REPORT_KEYS: &'static [RecordKind] = &[
        RecordKind::JvmClass,
        RecordKind::JvmField,
        RecordKind::JvmMethod,
        RecordKind::JvmVariable,
        RecordKind::JvmHeapAllocation,
        RecordKind::JvmMethodInvocation,
        RecordKind::JvmStringConstant,
        RecordKind::Usage,
        RecordKind::SymbolAlias,
        RecordKind::SourceFile,
        RecordKind::Artifact,
    ];

    fn insert(&mut self, record: AnyRecord) -> MetadataResult<bool> {
        let inserted = match record {
            AnyRecord::JvmClass(class) => self.jvm_classes.insert(class),
            AnyRecord::JvmField(field) => self.jvm_fields.insert(field),
            AnyRecord::JvmMethod(method) => self.jvm_methods.insert(method),
            AnyRecord::JvmVariable(variable) => self.jvm_variables.insert(variable),
            AnyRecord::JvmMethodInvocation(call) => self.jvm_invocations.insert(call),
            AnyRecord::JvmHeapAllocation(alloc) => self.jvm_heap_allocations.insert(alloc),
            AnyRecord::JvmStringConstant(constant) => self.jvm_string_constants.insert(constant),
            AnyRecord::Usage(usage) => self.usages.insert(usage),
            AnyRecord::SymbolAlias(alias) => self.aliases.insert(alias),
            AnyRecord::SourceFile(file) => self.shared.source_files.insert(file),
            AnyRecord::Artifact(artifact) => self.shared.artifacts.insert(artifact),
            other => {
                return Err(MetadataError::UnsupportedKind {
                    kind: other.kind(),
                    family: Self::FAMILY,
                })
            }
        };
        Ok(inserted)
    }

    fn len(&self) -> usize {
        self.jvm_classes.len()
            + self.jvm_fields.len()
            + self.jvm_methods.len()
            + self.jvm_variables.len()
            + self.jvm_invocations.len()
            + self.jvm_heap_allocations.len()
            + self.usages.len()
            + self.aliases.len()
            + self.jvm_string_constants.len()
            + self.shared.len()
    }

    fn merge(&mut self, other: Self) -> usize {
        extend_counting(&mut self.jvm_classes, other.jvm_classes)
            + extend_counting(&mut self.jvm_fields, other.jvm_fields)
            + extend_counting(&mut self.jvm_methods, other.jvm_methods)
            + extend_counting(&mut self.jvm_variables, other.jvm_variables)
            + extend_counting(&mut self.jvm_invocations, other.jvm_invocations)
            + extend_counting(&mut self.jvm_heap_allocations, other.jvm_heap_allocations)
            + extend_counting(&mut self.usages, other.usages)
            + extend_counting(&mut self.aliases, other.aliases)
            + extend_counting(&mut self.jvm_string_constants, other.jvm_string_constants)
            + self.shared.merge(other.shared)
    }

    fn populate_json_report(&self, report: &mut JsonMap) {
        let family = Self::FAMILY;
        put_records(family, report, sorted_by_symbol_id(&self.jvm_classes));
        put_records(family, report, sorted_by_symbol_id(&self.jvm_fields));
        put_records(family, report, sorted_by_symbol_id(&self.jvm_methods));
        put_records(family, report, sorted_by_symbol_id(&self.jvm_variables));
        put_records(family, report, sorted_by_symbol_id(&self.jvm_heap_allocations));
        put_records(family, report, sorted_by_symbol_id(&self.jvm_invocations));
        put_records(family, report, &self.jvm_string_constants);
        put_records(family, report, sorted_by_symbol_id(&self.usages));
        put_records(family, report, sorted_by_symbol_id(&self.aliases));
        self.shared.populate_json_report(family, report);
    }

    fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()> {
        print_count(printer, "Classes", self.jvm_classes.len())?;
        print_count(printer, "Fields", self.jvm_fields.len())?;
        print_count(printer, "Methods", self.jvm_methods.len())?;
        print_count(printer, "Variables", self.jvm_variables.len())?;
        print_count(printer, "HeapAllocations", self.jvm_heap_allocations.len())?;
        print_count(printer, "MethodInvocations", self.jvm_invocations.len())?;
        print_count(printer, "Usages", self.usages.len())?;
        print_count(printer, "Aliases", self.aliases.len())?;
        print_count(printer, "StringConstants", self.jvm_string_constants.len())?;
        self.shared.print_report_stats(printer)
    }

    fn from_map(document: &JsonMap) -> MetadataResult<Self> {
        Ok(JvmMetadata {
            jvm_classes: read_records::<JvmClass>(document)?.into_iter().collect(),
            jvm_fields: read_records::<JvmField>(document)?.into_iter().collect(),
            jvm_methods: read_records::<JvmMethod>(document)?.into_iter().collect(),
            jvm_variables: read_records::<JvmVariable>(document)?.into_iter().collect(),
            jvm_invocations: read_records::<JvmMethodInvocation>(document)?
                .into_iter()
                .collect(),
            jvm_heap_allocations: read_records::<JvmHeapAllocation>(document)?
                .into_iter()
                .collect(),
            usages: read_records::<Usage>(document)?.into_iter().collect(),
            aliases: read_records::<SymbolAlias>(document)?.into_iter().collect(),
            jvm_string_constants: read_records::<JvmStringConstant>(document)?
                .into_iter()
                .collect(),
            shared: SharedMetadata::from_map(document)?,
        })
    }
}
