//! The built-in catalog of AI engineering tools.

use toolkit_shared::ToolRecord;

/// Static, in-memory tool catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCatalog {
    tools: Vec<ToolRecord>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolRecord>) -> Self {
        Self { tools }
    }

    /// The documented catalog: LLM tools, vector databases, then MLOps.
    pub fn builtin() -> Self {
        let mut tools = llm_tools();
        tools.extend(vector_databases());
        tools.extend(mlops_tools());
        Self::new(tools)
    }

    /// All records in catalog order.
    pub fn tools(&self) -> &[ToolRecord] {
        &self.tools
    }

    /// Tools whose category equals `category`, ignoring case.
    pub fn by_category(&self, category: &str) -> Vec<&ToolRecord> {
        let wanted = category.to_lowercase();
        self.tools
            .iter()
            .filter(|t| t.category.to_lowercase() == wanted)
            .collect()
    }

    /// Tools whose name, description or category contains `query`,
    /// ignoring case.
    pub fn search(&self, query: &str) -> Vec<&ToolRecord> {
        let needle = query.to_lowercase();
        self.tools
            .iter()
            .filter(|t| {
                [&t.name, &t.description, &t.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tool in &self.tools {
            if !seen.contains(&tool.category.as_str()) {
                seen.push(&tool.category);
            }
        }
        seen
    }

    /// Category lookup when given, else use-case search, else everything.
    pub fn recommend(&self, category: Option<&str>, use_case: Option<&str>) -> Vec<&ToolRecord> {
        match (category, use_case) {
            (Some(category), _) => self.by_category(category),
            (None, Some(use_case)) => self.search(use_case),
            (None, None) => self.tools.iter().collect(),
        }
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Built-in records
// ---------------------------------------------------------------------------

struct Entry<'a> {
    name: &'a str,
    description: &'a str,
    category: &'a str,
    url: &'a str,
    github_stars: Option<u32>,
    use_cases: &'a [&'a str],
    pros: &'a [&'a str],
    cons: &'a [&'a str],
}

impl From<Entry<'_>> for ToolRecord {
    fn from(e: Entry<'_>) -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            name: e.name.into(),
            description: e.description.into(),
            category: e.category.into(),
            url: e.url.into(),
            github_stars: e.github_stars,
            use_cases: owned(e.use_cases),
            pros: owned(e.pros),
            cons: owned(e.cons),
        }
    }
}

fn llm_tools() -> Vec<ToolRecord> {
    vec![
        Entry {
            name: "vLLM",
            description: "High-throughput and memory-efficient inference and serving engine for LLMs",
            category: "LLM Inference",
            url: "https://github.com/vllm-project/vllm",
            github_stars: Some(15000),
            use_cases: &["High-throughput inference", "Model serving", "Batch processing"],
            pros: &["Excellent performance", "Memory efficient", "Easy to use"],
            cons: &["GPU memory requirements", "Limited model support"],
        }
        .into(),
        Entry {
            name: "LangChain",
            description: "Framework for developing applications powered by large language models",
            category: "LLM Framework",
            url: "https://github.com/langchain-ai/langchain",
            github_stars: Some(75000),
            use_cases: &["LLM applications", "RAG systems", "AI agents"],
            pros: &["Comprehensive framework", "Great documentation", "Active community"],
            cons: &["Can be complex", "Frequent API changes"],
        }
        .into(),
        Entry {
            name: "Ollama",
            description: "Run large language models locally",
            category: "Local Inference",
            url: "https://ollama.ai",
            github_stars: None,
            use_cases: &["Local deployment", "Privacy-focused applications", "Development"],
            pros: &["Easy local deployment", "Privacy", "No API costs"],
            cons: &["Hardware requirements", "Limited performance"],
        }
        .into(),
        Entry {
            name: "Unsloth",
            description: "2x faster LLM fine-tuning with less memory",
            category: "Fine-tuning",
            url: "https://github.com/unslothai/unsloth",
            github_stars: Some(8000),
            use_cases: &["Model fine-tuning", "Custom model training", "Memory optimization"],
            pros: &["Memory efficient", "Fast training", "Easy to use"],
            cons: &["Limited model support", "Beta software"],
        }
        .into(),
    ]
}

fn vector_databases() -> Vec<ToolRecord> {
    vec![
        Entry {
            name: "Chroma",
            description: "Open-source embedding database for building AI applications",
            category: "Vector Database",
            url: "https://github.com/chroma-core/chroma",
            github_stars: Some(12000),
            use_cases: &["RAG systems", "Semantic search", "Embeddings storage"],
            pros: &["Easy to use", "Open source", "Good documentation"],
            cons: &["Performance limitations", "Limited enterprise features"],
        }
        .into(),
        Entry {
            name: "Pinecone",
            description: "Vector database for ML applications",
            category: "Vector Database",
            url: "https://www.pinecone.io",
            github_stars: None,
            use_cases: &["Production RAG", "Semantic search", "Recommendation systems"],
            pros: &["Excellent performance", "Managed service", "Scalable"],
            cons: &["Cost", "Vendor lock-in"],
        }
        .into(),
    ]
}

fn mlops_tools() -> Vec<ToolRecord> {
    vec![
        Entry {
            name: "MLflow",
            description: "ML lifecycle management platform",
            category: "MLOps",
            url: "https://github.com/mlflow/mlflow",
            github_stars: Some(16000),
            use_cases: &["Experiment tracking", "Model registry", "Model deployment"],
            pros: &["Comprehensive platform", "Open source", "Language agnostic"],
            cons: &["Setup complexity", "UI limitations"],
        }
        .into(),
        Entry {
            name: "Weights & Biases",
            description: "ML experiment tracking and visualization",
            category: "MLOps",
            url: "https://wandb.ai",
            github_stars: None,
            use_cases: &["Experiment tracking", "Model monitoring", "Collaboration"],
            pros: &["Excellent UI", "Great collaboration features", "Comprehensive tracking"],
            cons: &["Cost for teams", "Cloud dependency"],
        }
        .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[&ToolRecord]) -> Vec<String> {
        tools.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn builtin_catalog_order() {
        let catalog = ToolCatalog::builtin();
        let all: Vec<&str> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            all,
            vec![
                "vLLM",
                "LangChain",
                "Ollama",
                "Unsloth",
                "Chroma",
                "Pinecone",
                "MLflow",
                "Weights & Biases"
            ]
        );
        assert_eq!(catalog.tools()[0].github_stars, Some(15000));
        assert_eq!(catalog.tools()[2].github_stars, None);
    }

    #[test]
    fn category_lookup_ignores_case() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(
            names(&catalog.by_category("vector database")),
            vec!["Chroma", "Pinecone"]
        );
        assert_eq!(names(&catalog.by_category("MLOPS")), vec!["MLflow", "Weights & Biases"]);
    }

    #[test]
    fn unknown_category_is_empty() {
        let catalog = ToolCatalog::builtin();
        assert!(catalog.by_category("Quantum Computing").is_empty());
        assert!(catalog.by_category("").is_empty());
    }

    #[test]
    fn search_matches_name_description_or_category() {
        let catalog = ToolCatalog::builtin();

        let hits = names(&catalog.search("vector"));
        assert_eq!(hits, vec!["Chroma", "Pinecone"]);
        assert!(!hits.contains(&"Ollama".to_string()));

        // "embedding database" appears only in Chroma's description
        assert_eq!(names(&catalog.search("EMBEDDING")), vec!["Chroma"]);
        assert_eq!(names(&catalog.search("ollama")), vec!["Ollama"]);
        assert!(catalog.search("blockchain").is_empty());
    }

    #[test]
    fn categories_in_first_seen_order() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(
            catalog.categories(),
            vec![
                "LLM Inference",
                "LLM Framework",
                "Local Inference",
                "Fine-tuning",
                "Vector Database",
                "MLOps"
            ]
        );
    }

    #[test]
    fn recommend_prefers_category_then_use_case() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(
            names(&catalog.recommend(Some("Fine-tuning"), Some("vector"))),
            vec!["Unsloth"]
        );
        assert_eq!(
            names(&catalog.recommend(None, Some("tracking"))),
            vec!["Weights & Biases"]
        );
        assert_eq!(catalog.recommend(None, None).len(), 8);
    }
}
