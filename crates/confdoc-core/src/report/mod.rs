//! Diagnostics reporting
//!
//! The reporter consumes the resolver's output and the schema anomalies
//! collected at load time, and turns them into a structured report with a
//! Success/Failure verdict. It is decoupled from the renderer: a failed run
//! still has its best-effort rendered documents, and the caller decides what
//! to do with them.

use std::fmt::Write;

use crate::refs::{ReferenceOccurrence, Resolution, TextSlot};
use crate::schema::SchemaAnomaly;

/// One unresolved cross-reference, with full provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// The identifier as written, e.g. `NodeConfig::mine_microblocks`
    pub identifier: String,
    /// Struct the mention was found in
    pub struct_name: String,
    /// Field the mention was found in; `None` for the struct-level
    /// description
    pub field_name: Option<String>,
    /// Text slot the mention was found in
    pub slot: TextSlot,
    /// Occurrence ordinal within the slot
    pub occurrence_index: usize,
}

/// Overall verdict for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// All references resolved, no schema anomalies
    Success,
    /// At least one unresolved reference or anomaly
    Failure,
}

/// Aggregated diagnostics for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsReport {
    /// Unresolved references in extraction order, which groups them by
    /// owning field
    pub unresolved: Vec<UnresolvedReference>,
    /// Schema anomalies found at load time
    pub anomalies: Vec<SchemaAnomaly>,
}

impl DiagnosticsReport {
    /// Build a report from the resolver's output and load-time anomalies
    ///
    /// Every unresolved occurrence becomes an entry; duplicates are kept so
    /// the count of physical mentions is preserved.
    pub fn build(occurrences: &[ReferenceOccurrence], anomalies: Vec<SchemaAnomaly>) -> Self {
        let unresolved = occurrences
            .iter()
            .filter(|occurrence| occurrence.outcome == Resolution::Unresolved)
            .map(|occurrence| UnresolvedReference {
                identifier: occurrence.token.identifier(),
                struct_name: occurrence.origin.struct_name.clone(),
                field_name: occurrence.origin.field_name.clone(),
                slot: occurrence.origin.slot,
                occurrence_index: occurrence.origin.index,
            })
            .collect();

        Self {
            unresolved,
            anomalies,
        }
    }

    /// The overall verdict
    pub fn verdict(&self) -> Verdict {
        if self.unresolved.is_empty() && self.anomalies.is_empty() {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        self.verdict() == Verdict::Success
    }

    /// Render the report as human-readable text, grouped by owning field
    pub fn render(&self) -> String {
        let mut output = String::new();

        if self.is_success() {
            writeln!(output, "all references resolved, no schema anomalies").unwrap();
            return output;
        }

        if !self.unresolved.is_empty() {
            writeln!(output, "unresolved references ({}):", self.unresolved.len()).unwrap();
            let mut current_owner = None;
            for entry in &self.unresolved {
                let owner = match &entry.field_name {
                    Some(field) => format!("{}::{}", entry.struct_name, field),
                    None => entry.struct_name.clone(),
                };
                if current_owner.as_deref() != Some(owner.as_str()) {
                    writeln!(output, "  in {owner}:").unwrap();
                    current_owner = Some(owner);
                }
                writeln!(
                    output,
                    "    {} ({}, occurrence {})",
                    entry.identifier, entry.slot, entry.occurrence_index
                )
                .unwrap();
            }
        }

        if !self.anomalies.is_empty() {
            writeln!(output, "schema anomalies ({}):", self.anomalies.len()).unwrap();
            for anomaly in &self.anomalies {
                writeln!(output, "  [{}] {anomaly}", anomaly.kind.display_name()).unwrap();
            }
        }

        output
    }
}
