//! Logseq HTTP API client
//!
//! Every call is a `POST` to the API endpoint with `{"method", "args"}` and a
//! bearer token. No retries: a failed call surfaces to the caller once.

use super::traits::{GraphProvider, Placement, ProviderError, ProviderResult};
use crate::config::Config;
use crate::graph::{Block, Page};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    method: &'a str,
    args: Vec<Value>,
}

/// `GraphProvider` backed by a running Logseq instance
#[derive(Debug, Clone)]
pub struct LogseqClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl LogseqClient {
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: config.api_url.clone(),
            token: config.token.clone().unwrap_or_default(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke one API method and return its raw JSON result.
    async fn call(&self, method: &str, args: Vec<Value>) -> ProviderResult<Value> {
        debug!(method, "logseq api call");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&ApiRequest { method, args })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body)?;
        if let Some(message) = api_error(&value) {
            return Err(ProviderError::Api(message));
        }
        Ok(value)
    }
}

/// Logseq reports method failures as `{"error": "..."}` with a 200 status.
fn api_error(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get("error").map(|e| match e {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn optional<T: serde::de::DeserializeOwned>(value: Value) -> ProviderResult<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

#[async_trait]
impl GraphProvider for LogseqClient {
    async fn fetch_all_pages(&self) -> ProviderResult<Vec<Page>> {
        let value = self.call("logseq.Editor.getAllPages", vec![]).await?;
        match value {
            Value::Null => Ok(Vec::new()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    async fn fetch_page_blocks(&self, page: &str) -> ProviderResult<Option<Vec<Block>>> {
        let value = self
            .call("logseq.Editor.getPageBlocksTree", vec![json!(page)])
            .await?;
        let blocks: Option<Vec<Block>> = optional(value)?;
        Ok(blocks.filter(|b| !b.is_empty()))
    }

    async fn run_query(&self, query: &str) -> ProviderResult<Vec<Value>> {
        let value = self
            .call("logseq.DB.datascriptQuery", vec![json!(query)])
            .await?;
        match value {
            Value::Array(rows) => Ok(rows),
            _ => Ok(Vec::new()),
        }
    }

    async fn create_page(
        &self,
        name: &str,
        properties: &Map<String, Value>,
    ) -> ProviderResult<Option<Page>> {
        let value = self
            .call(
                "logseq.Editor.createPage",
                vec![
                    json!(name),
                    Value::Object(properties.clone()),
                    json!({ "createFirstBlock": true }),
                ],
            )
            .await?;
        optional(value)
    }

    async fn append_block(&self, page: &str, content: &str) -> ProviderResult<Option<Block>> {
        let value = self
            .call(
                "logseq.Editor.appendBlockInPage",
                vec![json!(page), json!(content)],
            )
            .await?;
        optional(value)
    }

    async fn insert_block(
        &self,
        target: &str,
        content: &str,
        placement: Placement,
    ) -> ProviderResult<Option<Block>> {
        let value = self
            .call(
                "logseq.Editor.insertBlock",
                vec![
                    json!(target),
                    json!(content),
                    json!({ "before": placement.before, "sibling": placement.sibling }),
                ],
            )
            .await?;
        optional(value)
    }

    async fn remove_block(&self, id: &str) -> ProviderResult<()> {
        self.call("logseq.Editor.removeBlock", vec![json!(id)])
            .await
            .map(|_| ())
    }
}
