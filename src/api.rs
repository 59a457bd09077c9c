//! Transport-independent API layer.
//!
//! `GraphApi` is the single entry point for every consumer-facing operation.
//! Transports (the MCP server, the one-shot CLI) call `GraphApi` methods and
//! never reach into the analyses or the provider directly.
//!
//! Every operation returns a markdown report. Failures come back as an
//! [`ApiError`] whose text reads `Error <doing X>: <message>`, which
//! transports hand to the caller as the report.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{
    find_backlinks, ConnectionSuggester, GapAnalysis, GraphAnalysis, JournalAnalysis,
    JournalSummary, PageListing, PageView,
};
use crate::graph::format_journal_title;
use crate::provider::{GraphProvider, Placement, ProviderError};
use crate::query::smart_query;
use crate::report::page_ref;

/// Error from an API operation, carrying what was being attempted
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error {action}: {source}")]
    Provider {
        action: &'static str,
        source: ProviderError,
    },

    #[error("Error {action}: invalid block id \"{id}\"")]
    InvalidBlockId { action: &'static str, id: String },

    #[error("Error {action}: {reason}")]
    Rejected { action: &'static str, reason: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

fn failed(action: &'static str) -> impl FnOnce(ProviderError) -> ApiError {
    move |source| ApiError::Provider { action, source }
}

fn rejected(action: &'static str, reason: impl Into<String>) -> ApiError {
    ApiError::Rejected {
        action,
        reason: reason.into(),
    }
}

fn require_content(action: &'static str, content: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(rejected(action, "content must not be empty"));
    }
    Ok(())
}

fn block_id(action: &'static str, id: &str) -> ApiResult<String> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| ApiError::InvalidBlockId {
            action,
            id: id.to_string(),
        })
}

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct GraphApi {
    provider: Arc<dyn GraphProvider>,
    clock: fn() -> DateTime<Local>,
}

impl GraphApi {
    pub fn new(provider: Arc<dyn GraphProvider>) -> Self {
        Self {
            provider,
            clock: Local::now,
        }
    }

    /// Replace the wall clock used for date ranges and today's journal.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    fn provider(&self) -> &dyn GraphProvider {
        self.provider.as_ref()
    }

    // --- Lookup ---

    pub async fn list_pages(&self, include_journals: bool) -> ApiResult<String> {
        let listing = PageListing::list(self.provider(), include_journals)
            .await
            .map_err(failed("listing pages"))?;
        info!(pages = listing.pages.len(), "listed pages");
        Ok(listing.to_markdown())
    }

    pub async fn get_page(&self, name: &str) -> ApiResult<String> {
        let view = PageView::fetch(self.provider(), name)
            .await
            .map_err(failed("fetching page"))?;
        Ok(view.to_markdown())
    }

    pub async fn search_pages(&self, query: &str) -> ApiResult<String> {
        let listing = PageListing::search(self.provider(), query)
            .await
            .map_err(failed("searching pages"))?;
        Ok(listing.to_markdown())
    }

    pub async fn get_backlinks(&self, page: &str) -> ApiResult<String> {
        let report = find_backlinks(self.provider(), page)
            .await
            .map_err(failed("finding backlinks"))?;
        Ok(report.to_markdown())
    }

    pub async fn get_journal_summary(&self, range: &str) -> ApiResult<String> {
        let summary = JournalSummary::build(self.provider(), range, self.now())
            .await
            .map_err(failed("summarizing journal"))?;
        Ok(summary.to_markdown())
    }

    // --- Write ---

    pub async fn create_page(
        &self,
        name: &str,
        content: Option<&str>,
        properties: Option<Map<String, Value>>,
    ) -> ApiResult<String> {
        const ACTION: &str = "creating page";
        let name = name.trim();
        if name.is_empty() {
            return Err(rejected(ACTION, "page name must not be empty"));
        }

        let properties = properties.unwrap_or_default();
        let page = self
            .provider()
            .create_page(name, &properties)
            .await
            .map_err(failed(ACTION))?
            .ok_or_else(|| rejected(ACTION, format!("page \"{name}\" was not created")))?;

        let content = content.map(str::trim).filter(|c| !c.is_empty());
        if let Some(content) = content {
            self.provider()
                .append_block(&page.name, content)
                .await
                .map_err(failed(ACTION))?;
        }
        info!(page = name, with_content = content.is_some(), "created page");

        let mut message = format!("Created page {}", page_ref(page.display_name()));
        if content.is_some() {
            message.push_str(" with initial content");
        }
        Ok(message + "\n")
    }

    /// Append to today's journal page, creating it if needed.
    pub async fn add_journal_entry(&self, content: &str) -> ApiResult<String> {
        const ACTION: &str = "adding journal entry";
        require_content(ACTION, content)?;

        let title = format_journal_title(self.now().date_naive());
        self.provider()
            .create_page(&title, &Map::new())
            .await
            .map_err(failed(ACTION))?;
        let block = self
            .provider()
            .append_block(&title, content.trim())
            .await
            .map_err(failed(ACTION))?
            .ok_or_else(|| rejected(ACTION, format!("journal page \"{title}\" not available")))?;
        info!(page = %title, block = ?block.uuid, "added journal entry");
        Ok(format!("Added entry to {}\n", page_ref(&title)))
    }

    pub async fn add_block(&self, page: &str, content: &str) -> ApiResult<String> {
        const ACTION: &str = "adding block";
        require_content(ACTION, content)?;

        let block = self
            .provider()
            .append_block(page.trim(), content.trim())
            .await
            .map_err(failed(ACTION))?
            .ok_or_else(|| rejected(ACTION, format!("page \"{}\" not found", page.trim())))?;
        Ok(format!(
            "Added block to {}{}\n",
            page_ref(page.trim()),
            block.uuid.map(|id| format!(" ({id})")).unwrap_or_default()
        ))
    }

    pub async fn insert_block(
        &self,
        parent: &str,
        content: &str,
        before: bool,
        sibling: bool,
    ) -> ApiResult<String> {
        const ACTION: &str = "inserting block";
        let parent = block_id(ACTION, parent)?;
        require_content(ACTION, content)?;

        let block = self
            .provider()
            .insert_block(&parent, content.trim(), Placement { before, sibling })
            .await
            .map_err(failed(ACTION))?
            .ok_or_else(|| rejected(ACTION, format!("block {parent} not found")))?;
        let position = match (sibling, before) {
            (true, true) => "before",
            (true, false) => "after",
            (false, true) => "as first child of",
            (false, false) => "as last child of",
        };
        Ok(format!(
            "Inserted block{} {position} {parent}{}\n",
            block.uuid.map(|id| format!(" {id}")).unwrap_or_default(),
            block.page.identifier().map(|page| format!(" (page {page})")).unwrap_or_default()
        ))
    }

    pub async fn delete_block(&self, id: &str) -> ApiResult<String> {
        const ACTION: &str = "deleting block";
        let id = block_id(ACTION, id)?;
        self.provider()
            .remove_block(&id)
            .await
            .map_err(failed(ACTION))?;
        info!(block = %id, "deleted block");
        Ok(format!("Deleted block {id}\n"))
    }

    // --- Analysis ---

    pub async fn analyze_graph(&self, days_threshold: i64) -> ApiResult<String> {
        let overview = GraphAnalysis::new()
            .days_threshold(days_threshold)
            .run(self.provider(), self.now())
            .await
            .map_err(failed("analyzing graph"))?;
        Ok(overview.to_markdown())
    }

    pub async fn find_knowledge_gaps(
        &self,
        min_reference_count: usize,
        include_orphans: bool,
    ) -> ApiResult<String> {
        let gaps = GapAnalysis::new()
            .min_reference_count(min_reference_count)
            .include_orphans(include_orphans)
            .run(self.provider())
            .await
            .map_err(failed("finding knowledge gaps"))?;
        Ok(gaps.to_markdown())
    }

    pub async fn analyze_journal_patterns(
        &self,
        timeframe: &str,
        include_mood: bool,
        include_topics: bool,
    ) -> ApiResult<String> {
        let patterns = JournalAnalysis::new()
            .timeframe(timeframe)
            .include_mood(include_mood)
            .include_topics(include_topics)
            .run(self.provider(), self.now())
            .await
            .map_err(failed("analyzing journal patterns"))?;
        Ok(patterns.to_markdown())
    }

    pub async fn suggest_connections(
        &self,
        min_confidence: f64,
        max_suggestions: usize,
        focus_area: Option<String>,
    ) -> ApiResult<String> {
        let report = ConnectionSuggester::new()
            .min_confidence(min_confidence)
            .max_suggestions(max_suggestions)
            .focus_area(focus_area)
            .run(self.provider())
            .await
            .map_err(failed("suggesting connections"))?;
        Ok(report.to_markdown())
    }

    pub async fn smart_query(&self, request: &str) -> ApiResult<String> {
        let report = smart_query(self.provider(), request, self.now())
            .await
            .map_err(failed("running query"))?;
        Ok(report.to_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Block, Page};
    use crate::provider::MemoryProvider;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn api(provider: MemoryProvider) -> (GraphApi, Arc<MemoryProvider>) {
        let provider = Arc::new(provider);
        let api = GraphApi::new(provider.clone()).with_clock(fixed_now);
        (api, provider)
    }

    #[tokio::test]
    async fn provider_failures_name_the_action() {
        let (api, _) = api(MemoryProvider::unavailable());
        let err = api.find_knowledge_gaps(3, true).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error finding knowledge gaps: API error: graph store unavailable"
        );
    }

    #[tokio::test]
    async fn block_ids_are_validated_before_any_call() {
        let (api, _) = api(MemoryProvider::unavailable());
        let err = api.delete_block("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBlockId { .. }));
        assert!(err.to_string().starts_with("Error deleting block: invalid block id"));

        let err = api.insert_block("123", "x", false, false).await.unwrap_err();
        assert!(err.to_string().contains("invalid block id"));
    }

    #[tokio::test]
    async fn journal_entries_go_to_todays_page() {
        let (api, provider) = api(MemoryProvider::new());
        let message = api.add_journal_entry("walked the dog").await.unwrap();
        assert_eq!(message, "Added entry to [[Oct 18th, 2026]]\n");
        let blocks = provider.blocks("Oct 18th, 2026").unwrap();
        assert_eq!(blocks[0].text(), Some("walked the dog"));

        api.add_journal_entry("second").await.unwrap();
        assert_eq!(provider.blocks("oct 18th, 2026").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_page_with_content() {
        let (api, provider) = api(MemoryProvider::new());
        let message = api.create_page("Reading List", Some("first book"), None).await.unwrap();
        assert_eq!(message, "Created page [[Reading List]] with initial content\n");
        assert_eq!(provider.blocks("reading list").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_and_delete_by_uuid() {
        let id = Uuid::new_v4().to_string();
        let (api, provider) = api(
            MemoryProvider::new().with_page(Page::new("Notes"), vec![Block::new("root").with_uuid(&id)]),
        );
        let message = api.insert_block(&id, "child", false, false).await.unwrap();
        assert!(message.starts_with("Inserted block "));
        assert!(message.ends_with(&format!("as last child of {id} (page Notes)\n")));
        assert_eq!(provider.blocks("Notes").unwrap()[0].children.len(), 1);

        api.delete_block(&id).await.unwrap();
        assert!(provider.blocks("Notes").unwrap().is_empty());

        let err = api.delete_block(&id).await.unwrap_err();
        assert!(err.to_string().starts_with("Error deleting block: not found"));
    }

    #[tokio::test]
    async fn appending_to_a_missing_page_is_rejected() {
        let (api, _) = api(MemoryProvider::new());
        let err = api.add_block("Nowhere", "text").await.unwrap_err();
        assert_eq!(err.to_string(), "Error adding block: page \"Nowhere\" not found");
        let err = api.add_block("Nowhere", "   ").await.unwrap_err();
        assert!(err.to_string().contains("content must not be empty"));
    }
}
