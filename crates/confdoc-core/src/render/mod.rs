//! Rendering of the validated model into reference documentation

mod markdown;

pub use markdown::{document_file_name, MarkdownRenderer};

/// A rendered per-struct document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDocument {
    /// The struct this document describes
    pub struct_name: String,
    /// Suggested output file name, e.g. `nodeconfig.md`
    pub file_name: String,
    /// The rendered Markdown
    pub markdown: String,
}

/// Join per-struct documents into one logical document, in struct order
pub fn combine(documents: &[StructDocument]) -> String {
    documents
        .iter()
        .map(|doc| doc.markdown.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
