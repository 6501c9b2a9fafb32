//! Retrieval index for the tool catalog.
//!
//! The similarity search itself belongs to an external vector database.
//! This crate only shapes catalog records into documents, submits them under
//! stable ids, and turns query hits into [`RetrievedDoc`]s (best match first,
//! in the order the service returns them).

mod chroma;
mod document;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use toolkit_shared::{Outcome, Result, ToolRecord};

pub use chroma::ChromaIndex;
pub use document::{DocMetadata, IndexDocument, build_document, document_id};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// One query hit.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedDoc {
    /// The stored document text.
    pub document: String,
    pub metadata: DocMetadata,
    /// Distance reported by the service, when it reports one.
    pub distance: Option<f32>,
}

/// An external vector-search collection.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the (empty) collection.
    async fn create_collection(&self) -> Result<()>;

    /// Delete the collection.
    async fn delete_collection(&self) -> Result<()>;

    /// Add documents to the collection.
    async fn add_documents(&self, docs: &[IndexDocument]) -> Result<()>;

    /// Return up to `n_results` hits for `text`, best match first.
    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<RetrievedDoc>>;

    /// Drop any previous collection and create a fresh one.
    async fn reset_collection(&self) -> Result<()> {
        if let Err(e) = self.delete_collection().await {
            debug!(error = %e, "no previous collection to delete");
        }
        self.create_collection().await
    }
}

// ---------------------------------------------------------------------------
// Catalog operations
// ---------------------------------------------------------------------------

/// Replace the collection contents with the full catalog.
///
/// Returns the number of documents indexed. Failures propagate: a session
/// must not start answering questions against a half-built index.
#[instrument(skip_all, fields(tools = tools.len()))]
pub async fn index_catalog<I>(index: &I, tools: &[ToolRecord]) -> Result<usize>
where
    I: VectorIndex + ?Sized,
{
    index.reset_collection().await.inspect_err(|e| {
        error!(error = %e, "error creating collection");
    })?;

    let docs: Vec<IndexDocument> = tools
        .iter()
        .enumerate()
        .map(|(i, tool)| IndexDocument::from_tool(i, tool))
        .collect();

    index.add_documents(&docs).await.inspect_err(|e| {
        error!(error = %e, "error adding catalog documents");
    })?;

    info!(count = docs.len(), "created collection with catalog tools");
    Ok(docs.len())
}

/// Query the index, degrading to an empty hit list on failure.
#[instrument(skip(index))]
pub async fn search<I>(index: &I, query: &str, n_results: usize) -> Outcome<Vec<RetrievedDoc>>
where
    I: VectorIndex + ?Sized,
{
    match index.query(query, n_results).await {
        Ok(hits) => {
            debug!(hits = hits.len(), "index query complete");
            Outcome::Success(hits)
        }
        Err(e) => {
            error!(error = %e, "error searching collection");
            Outcome::degraded(Vec::new(), e)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
