//! Metadata model for the configuration schema
//!
//! This module defines the canonical metadata document shape (structs, fields
//! and the referenced-constants hint map) and [`SchemaModel`], the validated
//! in-memory model the rest of the pipeline runs on. The model is immutable
//! after construction and owned by a single generation run.

mod error;

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

pub use error::{AnomalyKind, SchemaAnomaly, SchemaError};

/// The canonical metadata document, as produced by the external
/// source-extraction step
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigDocument {
    /// All documented configuration structs, in declaration order
    pub structs: Vec<StructDoc>,
    /// Externally supplied hints: fully qualified identifier to resolved
    /// value, or null when the extraction step could not bind it
    #[serde(default)]
    pub referenced_constants: BTreeMap<String, Option<String>>,
}

/// One documented configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct StructDoc {
    /// Struct name, unique within the document
    pub name: String,
    /// Free-text description, may embed cross-references
    pub description: String,
    /// Fields in declaration order (may be empty)
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
}

/// One documented field within a struct
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDoc {
    /// Field name, unique within its owning struct
    pub name: String,
    /// Free-text description, may embed cross-references
    pub description: String,
    /// Default value as display text (often itself a reference)
    #[serde(default)]
    pub default_value: Option<String>,
    /// Additional notes, each possibly containing references
    #[serde(default)]
    pub notes: Option<Vec<String>>,
    /// Deprecation text; presence marks the field deprecated
    #[serde(default)]
    pub deprecated: Option<String>,
    /// Literal TOML example snippet
    #[serde(default)]
    pub toml_example: Option<String>,
    /// Tri-state requiredness: true, false, or unspecified
    #[serde(default)]
    pub required: Option<bool>,
    /// Unit annotation, e.g. "milliseconds"
    #[serde(default)]
    pub units: Option<String>,
}

impl FieldDoc {
    /// Whether this field asserts contradictory requiredness: marked
    /// required while also carrying a concrete default
    fn has_contradictory_default(&self) -> bool {
        self.required == Some(true) && self.default_value.is_some()
    }
}

/// The validated, immutable metadata model
///
/// Built from a [`ConfigDocument`] via [`SchemaModel::from_document`]
/// (strict) or [`SchemaModel::from_document_lenient`]. Duplicate struct or
/// field names always fail construction since the identifier index would be
/// ambiguous.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    document: ConfigDocument,
}

impl SchemaModel {
    /// Build a model, treating contradictions as fatal
    ///
    /// Fails on duplicate struct names, duplicate field names within a
    /// struct, or a field that is both `required: true` and carries a
    /// concrete default value.
    pub fn from_document(document: ConfigDocument) -> Result<Self, SchemaError> {
        let anomalies = Self::validate(&document)?;
        if let Some(anomaly) = anomalies
            .iter()
            .find(|a| a.kind == AnomalyKind::RequiredWithDefault)
        {
            let field_name = anomaly.field_name.clone().unwrap_or_default();
            let default = document
                .structs
                .iter()
                .find(|s| s.name == anomaly.struct_name)
                .and_then(|s| s.fields.iter().find(|f| f.name == field_name))
                .and_then(|f| f.default_value.clone())
                .unwrap_or_default();
            return Err(SchemaError::RequiredWithDefault {
                struct_name: anomaly.struct_name.clone(),
                field_name,
                default,
            });
        }
        Ok(Self { document })
    }

    /// Build a model, collecting non-fatal anomalies instead of failing
    ///
    /// Duplicates remain fatal. Contradictory requiredness is returned as
    /// anomalies so generation can proceed best-effort and the reporter can
    /// surface them.
    pub fn from_document_lenient(
        document: ConfigDocument,
    ) -> Result<(Self, Vec<SchemaAnomaly>), SchemaError> {
        let anomalies = Self::validate(&document)?;
        Ok((Self { document }, anomalies))
    }

    /// Parse a JSON metadata document and build a strict model
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: ConfigDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Check document-level invariants
    ///
    /// Returns the non-fatal anomalies; duplicate names are returned as an
    /// error because no unambiguous identifier index can be built from them.
    fn validate(document: &ConfigDocument) -> Result<Vec<SchemaAnomaly>, SchemaError> {
        let mut anomalies = Vec::new();
        let mut struct_names = HashSet::new();

        for strukt in &document.structs {
            if !struct_names.insert(strukt.name.as_str()) {
                return Err(SchemaError::DuplicateStruct(strukt.name.clone()));
            }

            let mut field_names = HashSet::new();
            for field in &strukt.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        struct_name: strukt.name.clone(),
                        field_name: field.name.clone(),
                    });
                }

                if field.has_contradictory_default() {
                    anomalies.push(SchemaAnomaly {
                        struct_name: strukt.name.clone(),
                        field_name: Some(field.name.clone()),
                        kind: AnomalyKind::RequiredWithDefault,
                        message: format!(
                            "marked required but has default value {:?}",
                            field.default_value.as_deref().unwrap_or_default()
                        ),
                    });
                }
            }
        }

        Ok(anomalies)
    }

    /// Well-formedness anomalies for `toml_example` snippets
    ///
    /// Always non-fatal: a bad example never blocks generation, it only
    /// shows up in the diagnostics report.
    pub fn example_anomalies(&self) -> Vec<SchemaAnomaly> {
        let mut anomalies = Vec::new();
        for strukt in self.structs() {
            for field in &strukt.fields {
                if let Some(example) = &field.toml_example {
                    if let Err(err) = example.parse::<toml::Table>() {
                        anomalies.push(SchemaAnomaly {
                            struct_name: strukt.name.clone(),
                            field_name: Some(field.name.clone()),
                            kind: AnomalyKind::InvalidTomlExample,
                            message: format!("toml_example is not well-formed TOML: {err}"),
                        });
                    }
                }
            }
        }
        anomalies
    }

    /// All structs in declaration order
    pub fn structs(&self) -> &[StructDoc] {
        &self.document.structs
    }

    /// The externally supplied referenced-constants hint map
    pub fn referenced_constants(&self) -> &BTreeMap<String, Option<String>> {
        &self.document.referenced_constants
    }
}
