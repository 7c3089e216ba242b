//! Core infrastructure for metapersist.
//!
//! This crate provides the metadata interchange model shared by analysis
//! front-ends and report consumers:
//! - Position spans and the closed record hierarchy (`model`)
//! - Map-based (de)serialization of every record kind
//! - Metadata containers with set semantics (`metadata`)
//! - Token-location index over declarations (`token`)
//! - Canonical JSON report writers and count summaries (`report`)
//! - Report configuration and the summary printer (`config`)
//! - Error types for records, containers and reports (`error`)

pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod report;
pub mod token;
pub mod types;
