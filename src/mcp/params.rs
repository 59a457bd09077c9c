//! MCP tool parameter structs with schemars-derived JSON schemas.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

fn default_days_threshold() -> i64 {
    30
}

fn default_min_reference_count() -> usize {
    3
}

fn default_timeframe() -> String {
    "last 30 days".to_string()
}

fn default_min_confidence() -> f64 {
    0.6
}

fn default_max_suggestions() -> usize {
    10
}

fn default_range() -> String {
    "this week".to_string()
}

// ── Lookup params ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListPagesParams {
    #[schemars(description = "Include journal pages (default false)")]
    #[serde(default)]
    pub include_journals: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PageNameParams {
    #[schemars(description = "Name of the page")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Text to look for in page names (case-insensitive)")]
    pub query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BacklinksParams {
    #[schemars(description = "Page whose incoming references to find")]
    pub page: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct JournalSummaryParams {
    #[schemars(
        description = "Date range: today, yesterday, this week, last week, this month, last month, this year, last year, year to date"
    )]
    #[serde(default = "default_range")]
    pub range: String,
}

// ── Content params ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePageParams {
    #[schemars(description = "Name of the new page")]
    pub name: String,
    #[schemars(description = "Initial block content")]
    pub content: Option<String>,
    #[schemars(description = "Page properties as key/value pairs")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct JournalEntryParams {
    #[schemars(description = "Content to append to today's journal page")]
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBlockParams {
    #[schemars(description = "Page to append to")]
    pub page: String,
    #[schemars(description = "Block content")]
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsertBlockParams {
    #[schemars(description = "UUID of the block to insert relative to")]
    pub parent: String,
    #[schemars(description = "Block content")]
    pub content: String,
    #[schemars(description = "Insert before the target instead of after (default false)")]
    #[serde(default)]
    pub before: bool,
    #[schemars(description = "Insert as a sibling instead of a child (default false)")]
    #[serde(default)]
    pub sibling: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BlockIdParams {
    #[schemars(description = "UUID of the block")]
    pub id: String,
}

// ── Analysis params ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeGraphParams {
    #[schemars(description = "Recency window in days (default 30)")]
    #[serde(default = "default_days_threshold")]
    pub days_threshold: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct KnowledgeGapsParams {
    #[schemars(description = "References needed before a page counts as a gap (default 3)")]
    #[serde(default = "default_min_reference_count")]
    pub min_reference_count: usize,
    #[schemars(description = "Report pages nothing references (default true)")]
    #[serde(default = "default_true")]
    pub include_orphans: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct JournalPatternsParams {
    #[schemars(
        description = "Timeframe: 'last N days|weeks|months|years' or 'this year' (default 'last 30 days')"
    )]
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[schemars(description = "Include mood analysis (default true)")]
    #[serde(default = "default_true")]
    pub include_mood: bool,
    #[schemars(description = "Include topic analysis (default true)")]
    #[serde(default = "default_true")]
    pub include_topics: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SuggestConnectionsParams {
    #[schemars(description = "Minimum confidence to report (default 0.6)")]
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[schemars(description = "Maximum suggestions to return (default 10)")]
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[schemars(description = "Topic or page name to prioritize")]
    pub focus_area: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SmartQueryParams {
    #[schemars(
        description = "What to look for, e.g. 'most connected pages', 'open tasks', 'how has [[Topic]] evolved', 'what did I finish last week'"
    )]
    pub request: String,
}
