//! Metadata containers: one deduplicating set per record kind.
//!
//! Two families exist:
//! - [`SourceMetadata`]: language-agnostic types, functions and fields
//! - [`JvmMetadata`]: JVM classes, members, sites, usages and aliases
//!
//! Both carry the [`SharedMetadata`] sets (source files and artifacts) and
//! convert to and from a JSON report object whose top-level keys are the
//! record kind names.
//!
//! # Determinism
//!
//! Sets iterate in insertion order. Reports sort records by symbol id (ties
//! broken by canonical JSON text) so two containers holding the same records
//! produce byte-identical reports regardless of insertion order.

use std::io::{self, Write};

use serde_json::Value;
use tracing::debug;

use crate::config::Printer;
use crate::error::{json_shape, MetadataError, MetadataResult};
use crate::model::{AnyRecord, Artifact, Identified, JsonMap, Record, RecordKind, SourceFile};

mod jvm;
mod record_set;
mod source;

pub use jvm::JvmMetadata;
pub use record_set::RecordSet;
pub use source::SourceMetadata;

// ============================================================================
// Metadata Trait
// ============================================================================

/// Behavior shared by both metadata families.
pub trait Metadata: Default {
    /// Family name used in errors and logs.
    const FAMILY: &'static str;

    /// Reserved top-level report keys, in summary order.
    const REPORT_KEYS: &'static [RecordKind];

    /// Insert one record. Returns whether it was new.
    ///
    /// Fails with [`MetadataError::UnsupportedKind`] when the record's kind
    /// does not belong to this family.
    fn insert(&mut self, record: AnyRecord) -> MetadataResult<bool>;

    /// Total number of records across all sets.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert every record of `other`. Returns how many were new.
    fn merge(&mut self, other: Self) -> usize;

    /// Write every reserved key, each holding its canonically ordered array.
    fn populate_json_report(&self, report: &mut JsonMap);

    /// Print one `"<Label>: <count>"` line per kind.
    fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()>;

    /// Rebuild a container from a report object.
    ///
    /// Missing reserved keys yield empty sets; unknown keys are ignored. Any
    /// malformed element fails the whole reconstruction.
    fn from_map(document: &JsonMap) -> MetadataResult<Self>;

    /// Rebuild a container from a report value, which must be an object.
    fn from_value(value: &Value) -> MetadataResult<Self> {
        match value {
            Value::Object(document) => Self::from_map(document),
            other => Err(MetadataError::NotAnObject {
                found: json_shape(other),
            }),
        }
    }

    /// Parse report text and rebuild a container from it.
    fn from_json_str(text: &str) -> MetadataResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// A fresh report object for this container.
    fn to_json_report(&self) -> JsonMap {
        let mut report = JsonMap::new();
        self.populate_json_report(&mut report);
        report
    }
}

// ============================================================================
// Shared Sets
// ============================================================================

/// Source files and artifacts, carried by both families.
#[derive(Debug, Clone, Default)]
pub struct SharedMetadata {
    pub source_files: RecordSet<SourceFile>,
    pub artifacts: RecordSet<Artifact>,
}

impl SharedMetadata {
    pub fn len(&self) -> usize {
        self.source_files.len() + self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn merge(&mut self, other: SharedMetadata) -> usize {
        extend_counting(&mut self.source_files, other.source_files)
            + extend_counting(&mut self.artifacts, other.artifacts)
    }

    pub fn populate_json_report(&self, family: &'static str, report: &mut JsonMap) {
        let mut files: Vec<&SourceFile> = self.source_files.iter().collect();
        files.sort();
        put_records(family, report, files);

        let artifacts = sorted_by_canonical_text(&self.artifacts, |a| a.id.as_str());
        put_records(family, report, artifacts);
    }

    pub fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()> {
        print_count(printer, "SourceFiles", self.source_files.len())?;
        print_count(printer, "Artifacts", self.artifacts.len())
    }

    pub fn from_map(document: &JsonMap) -> MetadataResult<Self> {
        Ok(SharedMetadata {
            source_files: read_records::<SourceFile>(document)?.into_iter().collect(),
            artifacts: read_records::<Artifact>(document)?.into_iter().collect(),
        })
    }
}

// ============================================================================
// Ordering and Report Helpers
// ============================================================================

/// Records of `set` ordered by symbol id, ties broken by canonical JSON text.
pub fn sorted_by_symbol_id<T: Identified>(set: &RecordSet<T>) -> Vec<&T> {
    sorted_by_canonical_text(set, |record| record.symbol_id())
}

/// Records ordered by a string key, ties broken by canonical JSON text.
fn sorted_by_canonical_text<'a, T: Record>(
    set: &'a RecordSet<T>,
    key: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let mut records: Vec<&T> = set.iter().collect();
    records.sort_by_cached_key(|record| (key(*record).to_string(), record.to_value().to_string()));
    records
}

/// Write `records` as an array under their kind's report key.
pub(crate) fn put_records<'a, T: Record + 'a>(
    family: &'static str,
    report: &mut JsonMap,
    records: impl IntoIterator<Item = &'a T>,
) {
    let array: Vec<Value> = records.into_iter().map(|record| record.to_value()).collect();
    debug!(
        family,
        key = T::KIND.name(),
        count = array.len(),
        "populated report key"
    );
    report.insert(T::KIND.name().to_string(), Value::Array(array));
}

/// Read the array under `T`'s report key, converting every element.
pub(crate) fn read_records<T: Record>(document: &JsonMap) -> MetadataResult<Vec<T>> {
    let key = T::KIND.name();
    let items = match document.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(MetadataError::NotAnArray {
                key,
                found: json_shape(other),
            })
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::from_value(item).map_err(|source| MetadataError::InvalidRecord { key, index, source })
        })
        .collect()
}

pub(crate) fn print_count<W: Write>(
    printer: &mut Printer<W>,
    label: &str,
    count: usize,
) -> io::Result<()> {
    printer.println(format_args!("{label}: {count}"))
}

/// Insert every record of `other` into `set`, counting the new ones.
pub(crate) fn extend_counting<T: std::hash::Hash + Eq>(
    set: &mut RecordSet<T>,
    other: RecordSet<T>,
) -> usize {
    other.into_iter().map(|record| set.insert(record)).filter(|&new| new).count()
}
