//! Metapersist: program-element metadata records and canonical JSON reports
//!
//! Analysis front-ends (source parsers, bytecode analyzers) insert records
//! describing types, methods, fields, variables, call sites, allocations,
//! usages and aliases into a metadata container. The container writes a
//! deterministic JSON report, prints per-kind counts, and can be rebuilt
//! from a report written earlier.

// Core infrastructure - re-exported from metapersist-core
pub use metapersist_core::config;
pub use metapersist_core::error;
pub use metapersist_core::metadata;
pub use metapersist_core::model;
pub use metapersist_core::report;
pub use metapersist_core::token;
pub use metapersist_core::types;

// Process-level setup
pub mod logging;
