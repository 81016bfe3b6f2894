//! Markdown documentation generator
//!
//! Output is byte-deterministic: struct order follows the document, field
//! order follows each struct's declaration order, and reference rewriting is
//! a pure function of the resolver's output. Unresolved references degrade to
//! plain text; rendering never fails because of them.

use std::collections::BTreeMap;
use std::fmt::Write;

use rayon::prelude::*;

use crate::refs::{reference_pattern, RefTarget, ReferenceOccurrence, Resolution};
use crate::schema::{FieldDoc, SchemaModel, StructDoc};

use super::StructDocument;

/// Generates Markdown documentation from the model and resolved references
pub struct MarkdownRenderer<'a> {
    model: &'a SchemaModel,
    /// Identifier -> outcome, derived from the resolved occurrences.
    /// Resolution is a pure function of the token, so one entry per
    /// identifier covers every mention of it.
    resolutions: BTreeMap<String, Resolution>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Create a renderer over the model and the resolver's output
    pub fn new(model: &'a SchemaModel, occurrences: &[ReferenceOccurrence]) -> Self {
        let mut resolutions = BTreeMap::new();
        for occurrence in occurrences {
            resolutions.insert(occurrence.token.identifier(), occurrence.outcome.clone());
        }
        Self { model, resolutions }
    }

    /// Render every struct, one document each, in declaration order
    ///
    /// Structs are independent, so rendering runs in parallel; collection
    /// preserves declaration order regardless of execution order.
    pub fn render_all(&self) -> Vec<StructDocument> {
        self.model
            .structs()
            .par_iter()
            .map(|strukt| StructDocument {
                struct_name: strukt.name.clone(),
                file_name: document_file_name(&strukt.name),
                markdown: self.render_struct(strukt),
            })
            .collect()
    }

    /// Render one struct's document
    pub fn render_struct(&self, strukt: &StructDoc) -> String {
        let mut output = String::new();

        writeln!(output, "# {}", strukt.name).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "{}", self.rewrite(&strukt.description, &strukt.name)).unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Fields").unwrap();
        writeln!(output).unwrap();

        if strukt.fields.is_empty() {
            writeln!(output, "*No fields defined.*").unwrap();
            return output;
        }

        for field in &strukt.fields {
            self.write_field(&mut output, &strukt.name, field);
        }

        output
    }

    fn write_field(&self, output: &mut String, struct_name: &str, field: &FieldDoc) {
        writeln!(output, "### {}", field.name).unwrap();
        writeln!(output).unwrap();

        // Deprecation call-out first, visually distinct from the description
        if let Some(deprecated) = &field.deprecated {
            writeln!(
                output,
                "> ⚠️ **Deprecated:** {}",
                self.rewrite(deprecated, struct_name)
            )
            .unwrap();
            writeln!(output).unwrap();
        }

        writeln!(output, "{}", self.rewrite(&field.description, struct_name)).unwrap();
        writeln!(output).unwrap();

        let mut properties = Vec::new();
        if let Some(default_value) = &field.default_value {
            properties.push(format!(
                "- **Default:** {}",
                self.rewrite(default_value, struct_name)
            ));
        }
        if let Some(units) = &field.units {
            properties.push(format!("- **Units:** {units}"));
        }
        // Tri-state: an unspecified requiredness renders nothing at all
        match field.required {
            Some(true) => properties.push("- **Required:** yes".to_string()),
            Some(false) => properties.push("- **Required:** no".to_string()),
            None => {}
        }
        if !properties.is_empty() {
            for property in properties {
                writeln!(output, "{property}").unwrap();
            }
            writeln!(output).unwrap();
        }

        if let Some(notes) = &field.notes {
            if !notes.is_empty() {
                writeln!(output, "**Notes:**").unwrap();
                writeln!(output).unwrap();
                for note in notes {
                    writeln!(output, "- {}", self.rewrite(note, struct_name)).unwrap();
                }
                writeln!(output).unwrap();
            }
        }

        if let Some(example) = &field.toml_example {
            writeln!(output, "**Example:**").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "```toml").unwrap();
            // Verbatim, no reference rewriting inside code
            writeln!(output, "{}", example.trim_end_matches('\n')).unwrap();
            writeln!(output, "```").unwrap();
            writeln!(output).unwrap();
        }

        writeln!(output, "---").unwrap();
        writeln!(output).unwrap();
    }

    /// Rewrite reference tokens in a text slot
    ///
    /// Resolved field/struct references become links, resolved constants
    /// become inline code, unresolved references are stripped to the plain
    /// identifier. Tokens the resolver never saw (e.g. bracketed code spans
    /// that qualified as neither) are left untouched.
    fn rewrite(&self, text: &str, current_struct: &str) -> String {
        reference_pattern()
            .replace_all(text, |captures: &regex::Captures<'_>| {
                let identifier = match captures.get(2) {
                    Some(tail) => format!("{}::{}", &captures[1], tail.as_str()),
                    None => captures[1].to_string(),
                };
                match self.resolutions.get(&identifier) {
                    Some(Resolution::Resolved(target)) => {
                        Self::render_target(&identifier, target, current_struct)
                    }
                    Some(Resolution::Unresolved) => identifier,
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }

    fn render_target(identifier: &str, target: &RefTarget, current_struct: &str) -> String {
        match target {
            RefTarget::Field {
                struct_name,
                field_name,
            } => {
                let anchor = make_anchor(field_name);
                if struct_name == current_struct {
                    format!("[`{identifier}`](#{anchor})")
                } else {
                    format!(
                        "[`{identifier}`]({}#{anchor})",
                        document_file_name(struct_name)
                    )
                }
            }
            RefTarget::Struct(struct_name) => {
                if struct_name == current_struct {
                    format!("[`{identifier}`](#{})", make_anchor(struct_name))
                } else {
                    format!("[`{identifier}`]({})", document_file_name(struct_name))
                }
            }
            // Constants have no rendered location of their own
            RefTarget::Constant { .. } => format!("`{identifier}`"),
        }
    }
}

/// Output file name for a struct's document
pub fn document_file_name(struct_name: &str) -> String {
    format!("{}.md", make_anchor(struct_name))
}

/// Create an anchor ID from a name
///
/// Underscores are kept: Markdown renderers derive `#snake_case` fragments
/// from the `### snake_case` headings emitted here, so mangling them would
/// break every link to a snake_case field.
fn make_anchor(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::{ReferenceExtractor, ReferenceIndex, ReferenceResolver};
    use crate::schema::ConfigDocument;
    use std::collections::BTreeMap;

    fn render(document: ConfigDocument) -> Vec<StructDocument> {
        let model = SchemaModel::from_document(document).unwrap();
        let index = ReferenceIndex::build(&model);
        let extractor = ReferenceExtractor::new(&index);
        let resolver = ReferenceResolver::new(&index);
        let occurrences = resolver.resolve_all(extractor.extract_all(&model));
        let renderer = MarkdownRenderer::new(&model, &occurrences);
        renderer.render_all()
    }

    fn plain_field(name: &str, description: &str) -> FieldDoc {
        FieldDoc {
            name: name.to_string(),
            description: description.to_string(),
            default_value: None,
            notes: None,
            deprecated: None,
            toml_example: None,
            required: None,
            units: None,
        }
    }

    #[test]
    fn test_resolved_reference_same_struct_links_to_anchor() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "NodeConfig".to_string(),
                description: "Node settings.".to_string(),
                fields: vec![
                    plain_field("seed", "Only used when [`NodeConfig::miner`] is set."),
                    plain_field("miner", "See [`NodeConfig::mine_microblocks`]."),
                    plain_field("mine_microblocks", "Whether to produce microblocks."),
                ],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let docs = render(document);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_name, "nodeconfig.md");
        assert!(docs[0]
            .markdown
            .contains("[`NodeConfig::miner`](#miner)"));
        // Snake_case headings keep their underscores in the fragment
        assert!(docs[0]
            .markdown
            .contains("[`NodeConfig::mine_microblocks`](#mine_microblocks)"));
    }

    #[test]
    fn test_resolved_reference_other_struct_links_to_file() {
        let document = ConfigDocument {
            structs: vec![
                StructDoc {
                    name: "NodeConfig".to_string(),
                    description: "See [`MinerConfig::threads`] and [`MinerConfig`].".to_string(),
                    fields: vec![],
                },
                StructDoc {
                    name: "MinerConfig".to_string(),
                    description: "Miner settings.".to_string(),
                    fields: vec![plain_field("threads", "Worker threads.")],
                },
            ],
            referenced_constants: BTreeMap::new(),
        };

        let docs = render(document);
        assert!(docs[0]
            .markdown
            .contains("[`MinerConfig::threads`](minerconfig.md#threads)"));
        assert!(docs[0].markdown.contains("[`MinerConfig`](minerconfig.md)"));
    }

    #[test]
    fn test_unresolved_reference_degrades_to_plain_text() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "NodeConfig".to_string(),
                description: "Node settings.".to_string(),
                fields: vec![plain_field(
                    "microblock_frequency",
                    "See [`NodeConfig::mine_microblocks`] for details.",
                )],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let docs = render(document);
        assert!(docs[0]
            .markdown
            .contains("See NodeConfig::mine_microblocks for details."));
        assert!(!docs[0].markdown.contains("[`NodeConfig::mine_microblocks`]"));
    }

    #[test]
    fn test_constant_renders_as_inline_code() {
        let mut constants = BTreeMap::new();
        constants.insert(
            "DEFAULT_SATS_PER_VB".to_string(),
            Some("50".to_string()),
        );
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "FeeConfig".to_string(),
                description: "Fees.".to_string(),
                fields: vec![FieldDoc {
                    default_value: Some("[`DEFAULT_SATS_PER_VB`]".to_string()),
                    ..plain_field("sats_per_vb", "Fee rate.")
                }],
            }],
            referenced_constants: constants,
        };

        let docs = render(document);
        assert!(docs[0].markdown.contains("- **Default:** `DEFAULT_SATS_PER_VB`"));
    }

    #[test]
    fn test_field_annotations() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "NodeConfig".to_string(),
                description: "Node settings.".to_string(),
                fields: vec![FieldDoc {
                    name: "timeout".to_string(),
                    description: "Connection timeout.".to_string(),
                    default_value: Some("`15000`".to_string()),
                    notes: Some(vec!["Applies to outbound peers only.".to_string()]),
                    deprecated: None,
                    toml_example: Some("[node]\ntimeout = 15000".to_string()),
                    required: Some(false),
                    units: Some("milliseconds".to_string()),
                }],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let markdown = &render(document)[0].markdown;
        assert!(markdown.contains("### timeout"));
        assert!(markdown.contains("- **Default:** `15000`"));
        assert!(markdown.contains("- **Units:** milliseconds"));
        assert!(markdown.contains("- **Required:** no"));
        assert!(markdown.contains("**Notes:**"));
        assert!(markdown.contains("- Applies to outbound peers only."));
        assert!(markdown.contains("```toml\n[node]\ntimeout = 15000\n```"));
    }

    #[test]
    fn test_required_tristate_unspecified_renders_nothing() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "NodeConfig".to_string(),
                description: "Node settings.".to_string(),
                fields: vec![plain_field("seed", "Seed value.")],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let markdown = &render(document)[0].markdown;
        assert!(!markdown.contains("**Required:**"));
    }

    #[test]
    fn test_deprecation_callout() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "NodeConfig".to_string(),
                description: "Node settings.".to_string(),
                fields: vec![FieldDoc {
                    deprecated: Some("Use [`NodeConfig::seed`] instead.".to_string()),
                    ..plain_field("old_seed", "Old seed value.")
                }, plain_field("seed", "Seed value.")],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let markdown = &render(document)[0].markdown;
        assert!(markdown
            .contains("> ⚠️ **Deprecated:** Use [`NodeConfig::seed`](#seed) instead."));
    }

    #[test]
    fn test_empty_struct_renders_without_error() {
        let document = ConfigDocument {
            structs: vec![StructDoc {
                name: "EventObserverConfig".to_string(),
                description: "Observer endpoints.".to_string(),
                fields: vec![],
            }],
            referenced_constants: BTreeMap::new(),
        };

        let markdown = &render(document)[0].markdown;
        assert!(markdown.contains("# EventObserverConfig"));
        assert!(markdown.contains("Observer endpoints."));
        assert!(markdown.contains("*No fields defined.*"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let document = ConfigDocument {
            structs: vec![
                StructDoc {
                    name: "A".to_string(),
                    description: "See [`B::y`].".to_string(),
                    fields: vec![plain_field("x", "X field.")],
                },
                StructDoc {
                    name: "B".to_string(),
                    description: "B struct.".to_string(),
                    fields: vec![plain_field("y", "Y field.")],
                },
            ],
            referenced_constants: BTreeMap::new(),
        };

        let first = render(document.clone());
        let second = render(document);
        assert_eq!(first, second);
    }
}
