//! The full generation pipeline
//!
//! A pure function from a metadata document to rendered documents plus a
//! diagnostics report. No I/O, no global state; reading the document and
//! writing the output belong to the caller.

use crate::refs::{ReferenceExtractor, ReferenceIndex, ReferenceResolver};
use crate::render::{self, MarkdownRenderer, StructDocument};
use crate::report::DiagnosticsReport;
use crate::schema::{ConfigDocument, SchemaAnomaly, SchemaError, SchemaModel};

/// Everything a generation run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocs {
    /// One rendered document per struct, in declaration order
    pub documents: Vec<StructDocument>,
    /// Unresolved references and schema anomalies, with verdict
    pub report: DiagnosticsReport,
}

impl GeneratedDocs {
    /// All per-struct documents joined into one logical document
    pub fn combined(&self) -> String {
        render::combine(&self.documents)
    }
}

/// Run the pipeline with strict model construction
///
/// A contradictory `required`/`default_value` pair fails construction with
/// a [`SchemaError`] before extraction begins.
pub fn generate(document: ConfigDocument) -> Result<GeneratedDocs, SchemaError> {
    let model = SchemaModel::from_document(document)?;
    Ok(run(&model, Vec::new()))
}

/// Run the pipeline leniently
///
/// Contradictory requiredness becomes an anomaly in the report instead of
/// aborting; the rendered documents are still produced best-effort.
/// Duplicate struct/field names remain fatal.
pub fn generate_lenient(document: ConfigDocument) -> Result<GeneratedDocs, SchemaError> {
    let (model, anomalies) = SchemaModel::from_document_lenient(document)?;
    Ok(run(&model, anomalies))
}

/// Parse a JSON metadata document and run the strict pipeline
pub fn generate_from_json(json: &str) -> Result<GeneratedDocs, SchemaError> {
    let document: ConfigDocument = serde_json::from_str(json)?;
    generate(document)
}

fn run(model: &SchemaModel, mut anomalies: Vec<SchemaAnomaly>) -> GeneratedDocs {
    // Example well-formedness is never fatal, so it is checked on both the
    // strict and the lenient path.
    anomalies.extend(model.example_anomalies());

    let index = ReferenceIndex::build(model);
    let extractor = ReferenceExtractor::new(&index);
    let resolver = ReferenceResolver::new(&index);

    let occurrences = resolver.resolve_all(extractor.extract_all(model));

    let renderer = MarkdownRenderer::new(model, &occurrences);
    let documents = renderer.render_all();
    let report = DiagnosticsReport::build(&occurrences, anomalies);

    GeneratedDocs { documents, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Verdict;

    #[test]
    fn test_no_references_is_success() {
        let json = r#"{
            "structs": [
                {
                    "name": "NodeConfig",
                    "description": "Node settings.",
                    "fields": [
                        {"name": "seed", "description": "Random seed."}
                    ]
                }
            ]
        }"#;

        let docs = generate_from_json(json).unwrap();
        assert_eq!(docs.report.verdict(), Verdict::Success);
        assert!(docs.report.unresolved.is_empty());
        assert_eq!(docs.documents.len(), 1);
    }

    #[test]
    fn test_removing_target_flips_outcome() {
        let with_target = r#"{
            "structs": [
                {
                    "name": "NodeConfig",
                    "description": "Node settings.",
                    "fields": [
                        {"name": "seed", "description": "See [`NodeConfig::miner`]."},
                        {"name": "miner", "description": "Whether to mine."}
                    ]
                }
            ]
        }"#;
        let without_target = r#"{
            "structs": [
                {
                    "name": "NodeConfig",
                    "description": "Node settings.",
                    "fields": [
                        {"name": "seed", "description": "See [`NodeConfig::miner`]."}
                    ]
                }
            ]
        }"#;

        let resolved = generate_from_json(with_target).unwrap();
        assert_eq!(resolved.report.verdict(), Verdict::Success);

        let unresolved = generate_from_json(without_target).unwrap();
        assert_eq!(unresolved.report.verdict(), Verdict::Failure);
        assert_eq!(unresolved.report.unresolved.len(), 1);
        assert_eq!(unresolved.report.unresolved[0].identifier, "NodeConfig::miner");
    }

    #[test]
    fn test_lenient_keeps_rendering_on_anomaly() {
        let document: ConfigDocument = serde_json::from_str(
            r#"{
                "structs": [
                    {
                        "name": "NodeConfig",
                        "description": "Node settings.",
                        "fields": [
                            {
                                "name": "rpc_bind",
                                "description": "RPC bind address.",
                                "required": true,
                                "default_value": "\"127.0.0.1:20443\""
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert!(generate(document.clone()).is_err());

        let docs = generate_lenient(document).unwrap();
        assert_eq!(docs.report.verdict(), Verdict::Failure);
        assert_eq!(docs.report.anomalies.len(), 1);
        assert!(docs.documents[0].markdown.contains("### rpc_bind"));
    }

    #[test]
    fn test_bad_toml_example_is_diagnostic_even_in_strict_mode() {
        let json = r#"{
            "structs": [
                {
                    "name": "NodeConfig",
                    "description": "Node settings.",
                    "fields": [
                        {
                            "name": "seed",
                            "description": "Random seed.",
                            "toml_example": "seed = [unclosed"
                        }
                    ]
                }
            ]
        }"#;

        let docs = generate_from_json(json).unwrap();
        assert_eq!(docs.report.verdict(), Verdict::Failure);
        assert_eq!(docs.report.anomalies.len(), 1);
        assert!(docs.documents[0].markdown.contains("### seed"));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let json = r#"{
            "structs": [
                {
                    "name": "NodeConfig",
                    "description": "See [`MinerConfig`].",
                    "fields": [
                        {"name": "seed", "description": "See [`NodeConfig::missing`]."}
                    ]
                },
                {
                    "name": "MinerConfig",
                    "description": "Miner settings.",
                    "fields": []
                }
            ],
            "referenced_constants": {"BOUND": "1", "FREE": null}
        }"#;

        let first = generate_from_json(json).unwrap();
        let second = generate_from_json(json).unwrap();
        assert_eq!(first.combined(), second.combined());
        assert_eq!(first.report, second.report);
    }
}
