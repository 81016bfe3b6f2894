//! Reference extraction from free-text slots
//!
//! Tokens must be visually marked as identifiers (`` [`A::b`] `` or
//! `` [`A`] ``); ordinary prose words are never treated as references. Bare
//! tokens are only emitted when the identifier names a documented struct or
//! appears in the referenced-constants hint map, so plain code spans like
//! `` [`true`] `` do not turn into phantom unresolved references.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::{FieldDoc, SchemaModel, StructDoc};

use super::resolver::ReferenceIndex;
use super::{RefOrigin, RefToken, ReferenceOccurrence, Resolution, TextSlot};

/// The compiled token pattern, shared across runs
///
/// Also used by the renderer to rewrite the same tokens it extracts.
pub(crate) fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[`([A-Za-z_][A-Za-z0-9_]*)(?:::([A-Za-z_][A-Za-z0-9_]*))?`\]")
            .expect("reference pattern is valid")
    })
}

/// Extracts reference occurrences from the model's free-text slots
pub struct ReferenceExtractor<'a> {
    index: &'a ReferenceIndex,
}

impl<'a> ReferenceExtractor<'a> {
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index }
    }

    /// Occurrences for one field, lazily, in slot order
    ///
    /// Slots are scanned as the iterator advances: description first, then
    /// notes in sequence, then deprecated, then default value; left-to-right
    /// within each slot. Outcomes are `Unresolved` placeholders until the
    /// resolver runs.
    pub fn field_occurrences<'b>(
        &'b self,
        struct_name: &'b str,
        field: &'b FieldDoc,
    ) -> impl Iterator<Item = ReferenceOccurrence> + 'b {
        let mut slots: Vec<(TextSlot, &'b str)> =
            vec![(TextSlot::Description, field.description.as_str())];
        if let Some(notes) = &field.notes {
            for (i, note) in notes.iter().enumerate() {
                slots.push((TextSlot::Note(i), note.as_str()));
            }
        }
        if let Some(deprecated) = &field.deprecated {
            slots.push((TextSlot::Deprecated, deprecated.as_str()));
        }
        if let Some(default_value) = &field.default_value {
            slots.push((TextSlot::DefaultValue, default_value.as_str()));
        }

        slots.into_iter().flat_map(move |(slot, text)| {
            self.slot_occurrences(struct_name, Some(&field.name), slot, text)
        })
    }

    /// Occurrences in a struct's own description, lazily
    pub fn struct_occurrences<'b>(
        &'b self,
        strukt: &'b StructDoc,
    ) -> impl Iterator<Item = ReferenceOccurrence> + 'b {
        self.slot_occurrences(
            &strukt.name,
            None,
            TextSlot::Description,
            &strukt.description,
        )
        .into_iter()
    }

    /// Occurrences for every struct and field, in document order
    ///
    /// Per struct: the struct-level description first, then each field's
    /// slots in declaration order.
    pub fn extract_all(&self, model: &SchemaModel) -> Vec<ReferenceOccurrence> {
        let mut occurrences = Vec::new();
        for strukt in model.structs() {
            occurrences.extend(self.struct_occurrences(strukt));
            for field in &strukt.fields {
                occurrences.extend(self.field_occurrences(&strukt.name, field));
            }
        }
        occurrences
    }

    /// Scan one text slot left-to-right
    fn slot_occurrences(
        &self,
        struct_name: &str,
        field_name: Option<&str>,
        slot: TextSlot,
        text: &str,
    ) -> Vec<ReferenceOccurrence> {
        let mut found = Vec::new();
        for captures in reference_pattern().captures_iter(text) {
            let head = &captures[1];
            let token = match captures.get(2) {
                Some(tail) => RefToken::Field {
                    struct_name: head.to_string(),
                    field_name: tail.as_str().to_string(),
                },
                None => {
                    // Bare identifiers only qualify when something could
                    // plausibly bind them.
                    if !self.index.is_bare_candidate(head) {
                        continue;
                    }
                    RefToken::Struct {
                        struct_name: head.to_string(),
                    }
                }
            };

            found.push(ReferenceOccurrence {
                token,
                origin: RefOrigin {
                    struct_name: struct_name.to_string(),
                    field_name: field_name.map(ToString::to_string),
                    slot,
                    index: found.len(),
                },
                outcome: Resolution::Unresolved,
            });
        }
        found
    }
}
