//! Cross-reference extraction and resolution
//!
//! Free text in the metadata model may embed references to other structs and
//! fields, written as a backticked identifier in square brackets:
//! `` [`NodeConfig::miner`] `` or `` [`BurnchainConfig`] ``. This module
//! finds every such occurrence, records where it came from, and resolves it
//! against the identifiers the model actually defines.

mod extractor;
mod resolver;

use std::fmt;

pub use extractor::ReferenceExtractor;
pub(crate) use extractor::reference_pattern;
pub use resolver::{ReferenceIndex, ReferenceResolver};

/// Which free-text slot of a field a reference was found in
///
/// Slot order (description, notes, deprecated, default value) is the order
/// occurrences are emitted in, which makes diagnostics output deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Description,
    /// The n-th entry of the field's `notes` sequence
    Note(usize),
    Deprecated,
    DefaultValue,
}

impl fmt::Display for TextSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSlot::Description => write!(f, "description"),
            TextSlot::Note(i) => write!(f, "notes[{i}]"),
            TextSlot::Deprecated => write!(f, "deprecated"),
            TextSlot::DefaultValue => write!(f, "default_value"),
        }
    }
}

/// The parsed reference token itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefToken {
    /// A struct-qualified field reference, `Struct::field`
    Field {
        struct_name: String,
        field_name: String,
    },
    /// A bare struct-level reference, `Struct`
    Struct { struct_name: String },
}

impl RefToken {
    /// The identifier as written, e.g. `"NodeConfig::miner"`
    pub fn identifier(&self) -> String {
        match self {
            RefToken::Field {
                struct_name,
                field_name,
            } => format!("{struct_name}::{field_name}"),
            RefToken::Struct { struct_name } => struct_name.clone(),
        }
    }
}

impl fmt::Display for RefToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Where an occurrence was found: owning struct, field, slot, and the
/// occurrence ordinal within that slot
///
/// `field_name` is `None` for a mention in the struct-level description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefOrigin {
    pub struct_name: String,
    pub field_name: Option<String>,
    pub slot: TextSlot,
    /// Zero-based, left-to-right within the slot
    pub index: usize,
}

impl RefOrigin {
    /// The owning identifier, `Struct::field` or just `Struct`
    pub fn owner(&self) -> String {
        match &self.field_name {
            Some(field) => format!("{}::{}", self.struct_name, field),
            None => self.struct_name.clone(),
        }
    }
}

impl fmt::Display for RefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, occurrence {})",
            self.owner(),
            self.slot,
            self.index
        )
    }
}

/// What a resolved reference points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// A documented struct
    Struct(String),
    /// A documented field within a struct
    Field {
        struct_name: String,
        field_name: String,
    },
    /// An external constant bound through the referenced-constants hint map
    Constant { name: String, value: String },
}

/// Resolution outcome for one occurrence
///
/// Modeled as a tagged outcome rather than a nullable target so every
/// occurrence keeps its provenance for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(RefTarget),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// One concrete textual mention of an identifier
///
/// Produced fresh on every generation run; never persisted. The extractor
/// emits occurrences with an `Unresolved` placeholder outcome; the resolver
/// fills in the definitive outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOccurrence {
    pub token: RefToken,
    pub origin: RefOrigin,
    pub outcome: Resolution,
}
