//! Shared types, error model, and configuration for the AI toolkit.
//!
//! This crate is the foundation depended on by all other toolkit crates.
//! It provides:
//! - [`ToolkitError`]: the unified error type
//! - Domain types ([`ToolRecord`], [`NewsItem`], [`ConversationTurn`], [`Role`])
//! - [`Outcome`]: success vs. degraded-with-fallback results of external calls
//! - Configuration ([`AppConfig`], [`OpenAiSettings`], config loading)

pub mod config;
pub mod error;
pub mod outcome;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ChromaConfig, FeedSourceConfig, MissingDatePolicy, NewsConfig, OpenAiConfig,
    OpenAiSettings, RagConfig, config_dir, config_file_path, load_config, load_config_from,
    resolve_api_key, resolve_api_key_with,
};
pub use error::{Result, ToolkitError};
pub use outcome::Outcome;
pub use types::{ConversationTurn, NewsItem, Role, ToolRecord};
