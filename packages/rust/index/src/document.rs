//! Catalog record → indexable document.

use serde::{Deserialize, Serialize};

use toolkit_shared::ToolRecord;

/// Metadata stored next to each document and returned with query hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    /// Stars, or 0 when unknown.
    #[serde(default)]
    pub github_stars: u32,
}

/// A document ready to submit to the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub text: String,
    pub metadata: DocMetadata,
}

impl IndexDocument {
    /// Build the document for the tool at catalog position `position`.
    pub fn from_tool(position: usize, tool: &ToolRecord) -> Self {
        Self {
            id: document_id(position),
            text: build_document(tool),
            metadata: DocMetadata {
                name: tool.name.clone(),
                category: tool.category.clone(),
                url: tool.url.clone(),
                github_stars: tool.github_stars.unwrap_or(0),
            },
        }
    }
}

/// Stable synthetic id for the tool at catalog position `position`.
pub fn document_id(position: usize) -> String {
    format!("tool_{position}")
}

/// Concatenate the structured fields of a tool into one searchable text.
pub fn build_document(tool: &ToolRecord) -> String {
    format!(
        "Tool: {}\nCategory: {}\nDescription: {}\nUse Cases: {}\nPros: {}\nCons: {}",
        tool.name,
        tool.category,
        tool.description,
        tool.use_cases.join(", "),
        tool.pros.join(", "),
        tool.cons.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chroma() -> ToolRecord {
        ToolRecord {
            name: "Chroma".into(),
            description: "Open-source embedding database for building AI applications".into(),
            category: "Vector Database".into(),
            url: "https://github.com/chroma-core/chroma".into(),
            github_stars: Some(12000),
            use_cases: vec!["RAG systems".into(), "Semantic search".into()],
            pros: vec!["Easy to use".into()],
            cons: vec![],
        }
    }

    #[test]
    fn document_text_lists_fields() {
        let text = build_document(&chroma());
        assert!(text.starts_with("Tool: Chroma\nCategory: Vector Database\n"));
        assert!(text.contains("Use Cases: RAG systems, Semantic search"));
        assert!(text.contains("Pros: Easy to use"));
        assert!(text.ends_with("Cons: "));
    }

    #[test]
    fn from_tool_fills_metadata() {
        let doc = IndexDocument::from_tool(4, &chroma());
        assert_eq!(doc.id, "tool_4");
        assert_eq!(doc.metadata.name, "Chroma");
        assert_eq!(doc.metadata.github_stars, 12000);
    }

    #[test]
    fn missing_stars_default_to_zero() {
        let mut tool = chroma();
        tool.github_stars = None;
        assert_eq!(IndexDocument::from_tool(0, &tool).metadata.github_stars, 0);
    }
}
