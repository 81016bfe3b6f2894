//! Error and anomaly types for metadata document loading

use thiserror::Error;

/// A fatal problem with the metadata document
///
/// Construction of a [`SchemaModel`](super::SchemaModel) fails with one of
/// these; no partial model is produced.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("failed to parse metadata document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate struct name: {0}")]
    DuplicateStruct(String),

    #[error("duplicate field name: {struct_name}::{field_name}")]
    DuplicateField {
        struct_name: String,
        field_name: String,
    },

    #[error(
        "field {struct_name}::{field_name} is marked required but has default value {default:?}"
    )]
    RequiredWithDefault {
        struct_name: String,
        field_name: String,
        default: String,
    },
}

/// A non-fatal structural contradiction in the metadata document
///
/// Collected by the lenient constructor and surfaced through the diagnostics
/// report instead of aborting generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaAnomaly {
    /// Struct the anomaly was found in
    pub struct_name: String,
    /// Field the anomaly was found in, if field-level
    pub field_name: Option<String>,
    /// What kind of contradiction this is
    pub kind: AnomalyKind,
    /// Human-readable explanation
    pub message: String,
}

impl std::fmt::Display for SchemaAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field_name {
            Some(field) => write!(f, "{}::{}: {}", self.struct_name, field, self.message),
            None => write!(f, "{}: {}", self.struct_name, self.message),
        }
    }
}

/// The kind of schema anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// `required: true` together with a concrete default value
    RequiredWithDefault,
    /// A `toml_example` snippet that is not well-formed TOML
    InvalidTomlExample,
}

impl AnomalyKind {
    /// Short display name used in diagnostics output
    pub fn display_name(self) -> &'static str {
        match self {
            AnomalyKind::RequiredWithDefault => "required-with-default",
            AnomalyKind::InvalidTomlExample => "invalid-toml-example",
        }
    }
}
