//! Canonical JSON reports: building, writing atomically and reading back.
//!
//! A report is one JSON object mapping each reserved key of a metadata family
//! to its canonically ordered array. Files are written to a temporary file in
//! the destination directory, flushed, synced and then renamed over the
//! destination, so a reader never observes a partial report and a failed
//! write leaves the destination untouched.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::{Configuration, Printer};
use crate::error::{json_shape, MetadataError, ReportError, ReportResult};
use crate::metadata::{JvmMetadata, Metadata, SourceMetadata};
use crate::model::JsonMap;

// ============================================================================
// Reporter Trait
// ============================================================================

/// Something that can summarize itself and persist a JSON report.
pub trait FileReporter {
    fn configuration(&self) -> &Configuration;

    /// Print one summary line per record kind.
    fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()>;

    /// Build the report object.
    fn create_json_report(&self) -> JsonMap;

    /// Serialize the report and write it atomically to `path`.
    fn create_report_file(&self, path: &Path) -> ReportResult<()> {
        let report = Value::Object(self.create_json_report());
        let bytes = if self.configuration().pretty() {
            serde_json::to_vec_pretty(&report)?
        } else {
            serde_json::to_vec(&report)?
        };
        write_atomic(path, &bytes)
    }
}

/// Reporter over a borrowed metadata container.
#[derive(Debug)]
pub struct MetadataReporter<'a, M> {
    configuration: Configuration,
    metadata: &'a M,
}

/// Reporter for the language-agnostic family.
pub type SourceFileReporter<'a> = MetadataReporter<'a, SourceMetadata>;

/// Reporter for the JVM family.
pub type JvmFileReporter<'a> = MetadataReporter<'a, JvmMetadata>;

impl<'a, M: Metadata> MetadataReporter<'a, M> {
    pub fn new(configuration: Configuration, metadata: &'a M) -> Self {
        MetadataReporter {
            configuration,
            metadata,
        }
    }

    pub fn metadata(&self) -> &'a M {
        self.metadata
    }
}

impl<M: Metadata> FileReporter for MetadataReporter<'_, M> {
    fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    fn print_report_stats<W: Write>(&self, printer: &mut Printer<W>) -> io::Result<()> {
        printer.debug_println(format_args!(
            "{} metadata: {} records",
            M::FAMILY,
            self.metadata.len()
        ))?;
        self.metadata.print_report_stats(printer)
    }

    fn create_json_report(&self) -> JsonMap {
        let report = self.metadata.to_json_report();
        debug!(
            family = M::FAMILY,
            records = self.metadata.len(),
            keys = report.len(),
            "built report"
        );
        report
    }
}

// ============================================================================
// Atomic Writes
// ============================================================================

/// Write `bytes` to `path` through a synced temporary file and a rename.
///
/// The temporary file lives next to `path` so the rename never crosses
/// filesystems. It is removed on every failure path.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    if let Err(err) = write_synced(&mut temp, bytes) {
        warn!(path = %path.display(), error = %err, "report write failed, removing temporary file");
        return Err(err.into());
    }

    if let Err(err) = temp.persist(path) {
        warn!(path = %path.display(), error = %err.error, "report rename failed, removing temporary file");
        return Err(ReportError::Persist {
            path: path.to_path_buf(),
            source: err.error,
        });
    }

    info!(path = %path.display(), bytes = bytes.len(), "report persisted");
    Ok(())
}

fn write_synced(temp: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()
}

// ============================================================================
// Reading Reports
// ============================================================================

/// Read a report file into its JSON object.
pub fn read_report_file(path: &Path) -> ReportResult<JsonMap> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(document) => Ok(document),
        other => Err(MetadataError::NotAnObject {
            found: json_shape(&other),
        }
        .into()),
    }
}

/// Read a report file and rebuild a container of family `M` from it.
pub fn load_report_file<M: Metadata>(path: &Path) -> ReportResult<M> {
    let document = read_report_file(path)?;
    M::from_map(&document).map_err(ReportError::from)
}

// ============================================================================
// Tests
// ============================================================================
