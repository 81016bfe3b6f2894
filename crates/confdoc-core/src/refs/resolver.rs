//! Reference resolution against the identifier index
//!
//! The index is derived from the metadata model on every run and reconciled
//! with the externally supplied referenced-constants hint map. The hint map
//! takes precedence on conflict: a bound entry resolves an identifier the
//! struct index does not know, and a null entry forces an identifier
//! unresolved even when the struct index knows it.

use std::collections::{BTreeMap, BTreeSet};

use crate::schema::SchemaModel;

use super::{RefTarget, RefToken, ReferenceOccurrence, Resolution};

/// Index of all identifiers a reference can bind to
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    structs: BTreeSet<String>,
    /// Fully qualified `Struct::field` identifiers
    fields: BTreeSet<String>,
    constants: BTreeMap<String, Option<String>>,
}

impl ReferenceIndex {
    /// Derive the index from the model
    ///
    /// Struct and field identifiers are re-derived from the model itself so
    /// they can be cross-checked against the hint map rather than trusting
    /// either source alone.
    pub fn build(model: &SchemaModel) -> Self {
        let mut structs = BTreeSet::new();
        let mut fields = BTreeSet::new();

        for strukt in model.structs() {
            structs.insert(strukt.name.clone());
            for field in &strukt.fields {
                fields.insert(format!("{}::{}", strukt.name, field.name));
            }
        }

        Self {
            structs,
            fields,
            constants: model.referenced_constants().clone(),
        }
    }

    /// Whether a struct with this name is documented
    pub fn has_struct(&self, name: &str) -> bool {
        self.structs.contains(name)
    }

    /// Whether `Struct::field` names a documented field
    pub fn has_field(&self, struct_name: &str, field_name: &str) -> bool {
        self.fields.contains(&format!("{struct_name}::{field_name}"))
    }

    /// The hint-map entry for an identifier, if any
    pub fn constant_hint(&self, identifier: &str) -> Option<&Option<String>> {
        self.constants.get(identifier)
    }

    /// Whether a bare identifier is worth extracting as a reference
    /// candidate (it names a documented struct or appears in the hint map)
    pub fn is_bare_candidate(&self, name: &str) -> bool {
        self.has_struct(name) || self.constants.contains_key(name)
    }
}

/// Resolves extracted occurrences to definitive outcomes
pub struct ReferenceResolver<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    /// Resolve every occurrence, preserving order and duplicates
    ///
    /// Each physical mention is resolved and reported independently, even
    /// when the same identifier appears several times.
    pub fn resolve_all(&self, occurrences: Vec<ReferenceOccurrence>) -> Vec<ReferenceOccurrence> {
        occurrences
            .into_iter()
            .map(|mut occurrence| {
                occurrence.outcome = self.resolve_token(&occurrence.token);
                occurrence
            })
            .collect()
    }

    /// Resolve a single token
    ///
    /// Precedence: a bound hint entry resolves, a null hint entry forces
    /// unresolved, and only then is the struct/field index consulted.
    pub fn resolve_token(&self, token: &RefToken) -> Resolution {
        let identifier = token.identifier();
        if let Some(hint) = self.index.constant_hint(&identifier) {
            return match hint {
                Some(value) => Resolution::Resolved(RefTarget::Constant {
                    name: identifier,
                    value: value.clone(),
                }),
                None => Resolution::Unresolved,
            };
        }

        match token {
            RefToken::Field {
                struct_name,
                field_name,
            } => {
                if self.index.has_struct(struct_name)
                    && self.index.has_field(struct_name, field_name)
                {
                    Resolution::Resolved(RefTarget::Field {
                        struct_name: struct_name.clone(),
                        field_name: field_name.clone(),
                    })
                } else {
                    Resolution::Unresolved
                }
            }
            RefToken::Struct { struct_name } => {
                if self.index.has_struct(struct_name) {
                    Resolution::Resolved(RefTarget::Struct(struct_name.clone()))
                } else {
                    Resolution::Unresolved
                }
            }
        }
    }
}
