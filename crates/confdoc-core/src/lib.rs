//! Confdoc Core - engine for the confdoc configuration reference generator
//!
//! This crate provides the core functionality:
//! - Schema: validated metadata model for configuration structs and fields
//! - Refs: cross-reference extraction and resolution
//! - Render: deterministic Markdown output, one document per struct
//! - Report: unresolved-reference and anomaly diagnostics with a verdict
//! - Pipeline: the pure document-to-documentation transform tying it together

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata model - document shape, validation, schema errors
pub mod schema;

/// Cross-reference extraction and resolution
pub mod refs;

/// Markdown rendering
pub mod render;

/// Diagnostics reporting
pub mod report;

/// The full generation pipeline
pub mod pipeline;

/// Convenience re-export of the pipeline entry points
pub use pipeline::{generate, generate_from_json, generate_lenient, GeneratedDocs};

/// Convenience re-export of the model types
pub use schema::{ConfigDocument, SchemaError, SchemaModel};

/// Convenience re-export of the report types
pub use report::{DiagnosticsReport, Verdict};
