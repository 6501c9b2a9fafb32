//! Chroma REST client (`/api/v1`).
//!
//! Chroma's HTTP server stores vectors but does not compute them, so
//! document and query text is embedded through an [`Embedder`] first.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use toolkit_llm::Embedder;
use toolkit_shared::{ChromaConfig, Result, ToolkitError};

use crate::{DocMetadata, IndexDocument, RetrievedDoc, VectorIndex};

/// Timeout for a single Chroma request.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// User-Agent string for index requests.
const USER_AGENT: &str = concat!("ai-toolkit/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    ids: Vec<&'a str>,
    embeddings: Vec<Vec<f32>>,
    documents: Vec<&'a str>,
    metadatas: Vec<&'a DocMetadata>,
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    query_embeddings: Vec<Vec<f32>>,
    n_results: usize,
    include: [&'static str; 3],
}

/// Query results are nested one list per query embedding.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<DocMetadata>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A single Chroma collection, addressed by name.
pub struct ChromaIndex<E> {
    client: Client,
    base_url: Url,
    collection: String,
    embedder: E,
    /// Server-side collection id, resolved on create or first query.
    collection_id: Mutex<Option<String>>,
}

impl<E: Embedder> ChromaIndex<E> {
    /// Connect to the Chroma server named in `config`.
    pub fn new(config: &ChromaConfig, embedder: E) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ToolkitError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.endpoint()?,
            collection: config.collection.clone(),
            embedder,
            collection_id: Mutex::new(None),
        })
    }

    /// Collection name this index writes to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ToolkitError::config(format!("invalid chroma path '{path}': {e}")))
    }

    /// Send a request and return the body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ToolkitError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(ToolkitError::Index(format!(
                "{method} {path}: HTTP {status}: {}",
                text.chars().take(300).collect::<String>()
            )));
        }

        Ok(text)
    }

    fn cached_id(&self) -> Option<String> {
        self.collection_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store_id(&self, id: Option<String>) {
        *self
            .collection_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = id;
    }

    /// Resolve the collection id, looking it up by name if not yet known.
    async fn resolve_id(&self) -> Result<String> {
        if let Some(id) = self.cached_id() {
            return Ok(id);
        }

        let path = format!("api/v1/collections/{}", self.collection);
        let body = self.send::<()>(Method::GET, &path, None).await?;
        let collection: CollectionResponse = parse_body(&path, &body)?;

        debug!(collection = %self.collection, id = %collection.id, "resolved collection id");
        self.store_id(Some(collection.id.clone()));
        Ok(collection.id)
    }
}

#[async_trait]
impl<E: Embedder> VectorIndex for ChromaIndex<E> {
    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn create_collection(&self) -> Result<()> {
        let request = CreateCollectionRequest {
            name: &self.collection,
            get_or_create: false,
        };
        let body = self
            .send(Method::POST, "api/v1/collections", Some(&request))
            .await?;
        let collection: CollectionResponse = parse_body("api/v1/collections", &body)?;

        info!(id = %collection.id, "collection created");
        self.store_id(Some(collection.id));
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn delete_collection(&self) -> Result<()> {
        self.store_id(None);
        let path = format!("api/v1/collections/{}", self.collection);
        self.send::<()>(Method::DELETE, &path, None).await?;
        debug!("collection deleted");
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %self.collection, docs = docs.len()))]
    async fn add_documents(&self, docs: &[IndexDocument]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;

        let request = AddRequest {
            ids: docs.iter().map(|d| d.id.as_str()).collect(),
            embeddings,
            documents: docs.iter().map(|d| d.text.as_str()).collect(),
            metadatas: docs.iter().map(|d| &d.metadata).collect(),
        };

        let id = self.resolve_id().await?;
        self.send(
            Method::POST,
            &format!("api/v1/collections/{id}/add"),
            Some(&request),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<RetrievedDoc>> {
        let mut embeddings = self.embedder.embed(&[text.to_string()]).await?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| ToolkitError::Index("embedder returned no vector".into()))?;

        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results,
            include: ["documents", "metadatas", "distances"],
        };

        let id = self.resolve_id().await?;
        let path = format!("api/v1/collections/{id}/query");
        let body = self.send(Method::POST, &path, Some(&request)).await?;
        let response: QueryResponse = parse_body(&path, &body)?;

        Ok(flatten_hits(response))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_body<T: for<'de> Deserialize<'de>>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| ToolkitError::parse(format!("{path}: invalid response body: {e}")))
}

/// Zip the first (only) query's parallel result lists into hits.
fn flatten_hits(response: QueryResponse) -> Vec<RetrievedDoc> {
    let documents = response
        .documents
        .and_then(|mut d| (!d.is_empty()).then(|| d.swap_remove(0)))
        .unwrap_or_default();
    let metadatas = response
        .metadatas
        .and_then(|mut m| (!m.is_empty()).then(|| m.swap_remove(0)))
        .unwrap_or_default();
    let distances = response
        .distances
        .and_then(|mut d| (!d.is_empty()).then(|| d.swap_remove(0)))
        .unwrap_or_default();

    documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| RetrievedDoc {
            document: document.unwrap_or_default(),
            metadata: metadatas.get(i).cloned().flatten().unwrap_or_default(),
            distance: distances.get(i).copied().flatten(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Embeds every text as `[len]`.
    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(inputs.iter().map(|s| vec![s.len() as f32]).collect())
        }
    }

    fn index_for(server: &MockServer) -> ChromaIndex<LengthEmbedder> {
        let config = ChromaConfig {
            url: server.uri(),
            collection: "ai_toolkit".into(),
        };
        ChromaIndex::new(&config, LengthEmbedder).unwrap()
    }

    fn doc(id: &str, text: &str) -> IndexDocument {
        IndexDocument {
            id: id.into(),
            text: text.into(),
            metadata: DocMetadata {
                name: id.into(),
                category: "Test".into(),
                url: "https://example.com".into(),
                github_stars: 0,
            },
        }
    }

    #[test]
    fn flatten_hits_zips_lists() {
        let response: QueryResponse = serde_json::from_value(serde_json::json!({
            "ids": [["tool_4", "tool_5"]],
            "documents": [["Tool: Chroma", null]],
            "metadatas": [[{"name": "Chroma", "category": "Vector Database", "url": "u", "github_stars": 12000}, null]],
            "distances": [[0.12, 0.56]]
        }))
        .unwrap();

        let hits = flatten_hits(response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].metadata.name, "Chroma");
        assert_eq!(hits[0].distance, Some(0.12));
        assert_eq!(hits[1].document, "");
        assert_eq!(hits[1].metadata, DocMetadata::default());
    }

    #[test]
    fn flatten_hits_without_distances() {
        let response: QueryResponse = serde_json::from_value(serde_json::json!({
            "documents": [["a"]],
            "metadatas": [[{"name": "A"}]],
            "distances": null
        }))
        .unwrap();

        let hits = flatten_hits(response);
        assert_eq!(hits[0].distance, None);
    }

    #[tokio::test]
    async fn reset_and_add_flow() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/collections/ai_toolkit"))
            .respond_with(ResponseTemplate::new(500).set_body_string("does not exist"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections"))
            .and(body_partial_json(serde_json::json!({"name": "ai_toolkit"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c0ffee", "name": "ai_toolkit"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections/c0ffee/add"))
            .and(body_partial_json(serde_json::json!({
                "ids": ["tool_0", "tool_1"],
                "embeddings": [[3.0], [5.0]],
                "documents": ["abc", "abcde"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string("true"))
            .expect(1)
            .mount(&server)
            .await;

        let index = index_for(&server);
        index.reset_collection().await.unwrap();
        index
            .add_documents(&[doc("tool_0", "abc"), doc("tool_1", "abcde")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn query_resolves_collection_by_name() {
        let server = MockServer::start().await;
        assert_eq!(index_for(&server).collection(), "ai_toolkit");

        Mock::given(method("GET"))
            .and(path("/api/v1/collections/ai_toolkit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123", "name": "ai_toolkit"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/v1/collections/abc123/query"))
            .and(body_partial_json(serde_json::json!({
                "query_embeddings": [[6.0]],
                "n_results": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ids": [["tool_4"]],
                "documents": [["Tool: Chroma"]],
                "metadatas": [[{"name": "Chroma", "category": "Vector Database", "url": "u", "github_stars": 12000}]],
                "distances": [[0.2]]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let index = index_for(&server);
        let hits = index.query("vector", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.name, "Chroma");

        // Second query reuses the cached id (GET expected once).
        index.query("vector", 5).await.unwrap();
    }

    #[tokio::test]
    async fn query_error_status_is_index_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/collections/ai_toolkit"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let index = index_for(&server);
        let err = index.query("vector", 5).await.unwrap_err();
        assert!(matches!(err, ToolkitError::Index(_)));
        assert!(err.to_string().contains("404"));
    }
}
