//! Application configuration for the AI toolkit.
//!
//! User config lives at `~/.ai-toolkit/ai-toolkit.toml`.
//! CLI flags override config file values, which override defaults.
//! The API key itself is never stored here: the config names the env var
//! that holds it, and [`resolve_api_key`] reads it once at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ToolkitError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ai-toolkit.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ai-toolkit";

// ---------------------------------------------------------------------------
// Config structs (matching ai-toolkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI-compatible API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Vector index service.
    #[serde(default)]
    pub chroma: ChromaConfig,

    /// Retrieval + generation settings.
    #[serde(default)]
    pub rag: RagConfig,

    /// Newsletter feed settings.
    #[serde(default)]
    pub news: NewsConfig,
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API base URL, without the `/v1` suffix.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Chat completion model.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Embedding model used to vectorize catalog documents and queries.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_openai_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com".into()
}
fn default_chat_model() -> String {
    "gpt-4".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

/// `[chroma]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromaConfig {
    /// Chroma server URL.
    #[serde(default = "default_chroma_url")]
    pub url: String,

    /// Collection holding the tool catalog.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            url: default_chroma_url(),
            collection: default_collection(),
        }
    }
}

impl ChromaConfig {
    /// Parse the configured server URL, with a trailing slash so relative
    /// API paths join under any prefix.
    pub fn endpoint(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| ToolkitError::config(format!("invalid chroma url '{}': {e}", self.url)))?;
        if !url.path().ends_with('/') {
            let with_slash = format!("{}/", url.path());
            url.set_path(&with_slash);
        }
        Ok(url)
    }
}

fn default_chroma_url() -> String {
    "http://localhost:8000".into()
}
fn default_collection() -> String {
    "ai_toolkit".into()
}

/// `[rag]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Number of catalog documents retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum conversation turns kept between questions.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_rag_temperature")]
    pub temperature: f32,

    #[serde(default = "default_rag_max_tokens")]
    pub max_tokens: u32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            history_limit: default_history_limit(),
            temperature: default_rag_temperature(),
            max_tokens: default_rag_max_tokens(),
        }
    }
}

fn default_top_k() -> usize {
    5
}
fn default_history_limit() -> usize {
    10
}
fn default_rag_temperature() -> f32 {
    0.3
}
fn default_rag_max_tokens() -> u32 {
    1000
}

/// How to date feed entries that carry no publication timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDatePolicy {
    /// Treat the entry as published at fetch time (always passes the recency window).
    #[default]
    FetchTime,
    /// Exclude undated entries.
    Drop,
}

/// `[news]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Default recency window in days.
    #[serde(default = "default_days_back")]
    pub days_back: u32,

    /// Entries taken from the head of each feed.
    #[serde(default = "default_max_entries_per_feed")]
    pub max_entries_per_feed: usize,

    /// Items passed to the summary prompt.
    #[serde(default = "default_max_summary_items")]
    pub max_summary_items: usize,

    #[serde(default)]
    pub missing_date: MissingDatePolicy,

    /// Feed sources, polled in order.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSourceConfig>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            days_back: default_days_back(),
            max_entries_per_feed: default_max_entries_per_feed(),
            max_summary_items: default_max_summary_items(),
            missing_date: MissingDatePolicy::default(),
            feeds: default_feeds(),
        }
    }
}

fn default_days_back() -> u32 {
    7
}
fn default_max_entries_per_feed() -> usize {
    10
}
fn default_max_summary_items() -> usize {
    20
}

/// `[[news.feeds]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    /// Source tag attached to every item from this feed.
    pub name: String,
    /// RSS or Atom URL.
    pub url: String,
}

fn default_feeds() -> Vec<FeedSourceConfig> {
    [
        ("arxiv_ai", "http://export.arxiv.org/rss/cs.AI"),
        ("arxiv_ml", "http://export.arxiv.org/rss/cs.LG"),
        ("towards_data_science", "https://towardsdatascience.com/feed"),
        ("ai_news", "https://artificialintelligence-news.com/feed/"),
        ("machine_learning_mastery", "https://machinelearningmastery.com/feed/"),
    ]
    .into_iter()
    .map(|(name, url)| FeedSourceConfig {
        name: name.into(),
        url: url.into(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Resolved API settings (runtime, passed explicitly to clients)
// ---------------------------------------------------------------------------

/// Everything an API client needs, resolved once at startup.
#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: Url,
    pub chat_model: String,
    pub embedding_model: String,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

/// Read the API key from the environment and build [`OpenAiSettings`].
pub fn resolve_api_key(config: &AppConfig) -> Result<OpenAiSettings> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

/// Same as [`resolve_api_key`] with an explicit variable lookup.
pub fn resolve_api_key_with(
    config: &AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<OpenAiSettings> {
    let var_name = &config.openai.api_key_env;
    let api_key = match lookup(var_name) {
        Some(val) if !val.trim().is_empty() => val,
        _ => {
            return Err(ToolkitError::config(format!(
                "{var_name} environment variable is required"
            )));
        }
    };

    let base_url = Url::parse(&config.openai.base_url).map_err(|e| {
        ToolkitError::config(format!(
            "invalid openai base_url '{}': {e}",
            config.openai.base_url
        ))
    })?;

    Ok(OpenAiSettings {
        api_key,
        base_url,
        chat_model: config.openai.chat_model.clone(),
        embedding_model: config.openai.embedding_model.clone(),
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ai-toolkit/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| ToolkitError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ai-toolkit/ai-toolkit.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ToolkitError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ToolkitError::config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("OPENAI_API_KEY"));
        assert!(toml_str.contains("ai_toolkit"));
        assert!(toml_str.contains("arxiv_ai"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.rag.top_k, 5);
        assert_eq!(parsed.rag.history_limit, 10);
        assert_eq!(parsed.news.days_back, 7);
        assert_eq!(parsed.news.feeds.len(), 5);
        assert_eq!(parsed.news.missing_date, MissingDatePolicy::FetchTime);
    }

    #[test]
    fn config_with_custom_feeds() {
        let toml_str = r#"
[news]
days_back = 3
missing_date = "drop"

[[news.feeds]]
name = "blog"
url = "https://example.com/feed.xml"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.news.days_back, 3);
        assert_eq!(config.news.missing_date, MissingDatePolicy::Drop);
        assert_eq!(config.news.feeds.len(), 1);
        assert_eq!(config.news.feeds[0].name, "blog");
        // Untouched sections keep their defaults
        assert_eq!(config.openai.chat_model, "gpt-4");
        assert_eq!(config.news.max_entries_per_feed, 10);
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/ai-toolkit.toml")).unwrap_err();
        assert!(matches!(err, ToolkitError::Io { .. }));
    }

    #[test]
    fn api_key_missing() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openai.api_key_env = "TOOLKIT_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("TOOLKIT_TEST_NONEXISTENT_KEY_12345 environment variable is required")
        );
    }

    #[test]
    fn api_key_blank_is_rejected() {
        let config = AppConfig::default();
        let result = resolve_api_key_with(&config, |_| Some("   ".into()));
        assert!(result.is_err());
    }

    #[test]
    fn api_key_resolves_settings() {
        let config = AppConfig::default();
        let settings = resolve_api_key_with(&config, |name| {
            (name == "OPENAI_API_KEY").then(|| "sk-test".into())
        })
        .expect("resolve");
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url.as_str(), "https://api.openai.com/");
        assert_eq!(settings.chat_model, "gpt-4");
        assert!(!format!("{settings:?}").contains("sk-test"));
    }

    #[test]
    fn chroma_endpoint_validates() {
        let mut chroma = ChromaConfig::default();
        assert!(chroma.endpoint().is_ok());
        chroma.url = "not a url".into();
        assert!(chroma.endpoint().is_err());
    }
}
