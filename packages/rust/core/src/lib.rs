//! Retrieval-augmented assistant for the AI tool catalog.
//!
//! [`RagSession`] indexes the built-in [`ToolCatalog`] into a vector index,
//! retrieves the closest documents for each question and asks the hosted
//! chat model for a grounded answer, keeping a bounded conversation history.

pub mod catalog;
pub mod generator;
pub mod history;
pub mod session;

pub use catalog::ToolCatalog;
pub use generator::{APOLOGY, ResponseGenerator, build_messages, format_context};
pub use history::{ConversationBuffer, DEFAULT_HISTORY_LIMIT};
pub use session::{DEFAULT_TOP_K, RagSession, SessionOptions};
