//! Provider trait definitions

use crate::graph::{Block, Page};
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur talking to the graph store
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Where `insert_block` places new content relative to the target block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    /// Insert before the target instead of after it
    pub before: bool,
    /// Insert as a sibling instead of as a child
    pub sibling: bool,
}

/// Access to an externally owned knowledge graph.
///
/// Every call is a suspension point; callers await each one before issuing
/// the next, so implementations never see concurrent calls from one analysis.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// All pages, journals included. Transport and status failures are errors,
    /// never an empty list.
    async fn fetch_all_pages(&self) -> ProviderResult<Vec<Page>>;

    /// A page's block tree. `Ok(None)` when the page is missing or empty.
    async fn fetch_page_blocks(&self, page: &str) -> ProviderResult<Option<Vec<Block>>>;

    /// Run a datalog query. Responses that are not row sequences come back empty.
    async fn run_query(&self, query: &str) -> ProviderResult<Vec<Value>>;

    async fn create_page(
        &self,
        name: &str,
        properties: &Map<String, Value>,
    ) -> ProviderResult<Option<Page>>;

    async fn append_block(&self, page: &str, content: &str) -> ProviderResult<Option<Block>>;

    async fn insert_block(
        &self,
        target: &str,
        content: &str,
        placement: Placement,
    ) -> ProviderResult<Option<Block>>;

    async fn remove_block(&self, id: &str) -> ProviderResult<()>;
}
