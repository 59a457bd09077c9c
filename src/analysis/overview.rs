//! Whole-graph structure analysis
//!
//! Counts references, ranks frequently referenced and recently updated
//! pages, collects outstanding tasks, and groups pages into clusters of
//! mutually reachable references.

use super::clusters::{connected_components, MIN_CLUSTER_SIZE};
use super::{fetch_contents, PageContent};
use crate::graph::{canonical, links, walk, Page};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, Markdown};
use chrono::{DateTime, Duration, Local, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

/// A page is frequently referenced above this many references.
pub const FREQUENT_REFERENCE_THRESHOLD: usize = 2;

const RECENT_LIMIT: usize = 10;
const TASK_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RecentPage {
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub page: String,
    pub text: String,
}

/// A frequently referenced page that has not been touched in a while
#[derive(Debug, Clone, PartialEq)]
pub struct StaleHub {
    pub name: String,
    pub references: usize,
    pub updated_at: DateTime<Utc>,
}

/// Result of a graph analysis
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOverview {
    pub days_threshold: i64,
    pub total_pages: usize,
    pub journal_pages: usize,
    pub pages_with_content: usize,
    pub total_references: usize,
    /// Pages with no valid update timestamp
    pub unknown_update_dates: usize,
    /// `(reference, count)` with count above the threshold, most referenced first
    pub frequent: Vec<(String, usize)>,
    /// Updated within the threshold, most recent first
    pub recent: Vec<RecentPage>,
    pub clusters: Vec<Vec<String>>,
    pub tasks: Vec<TaskItem>,
    pub stale_hubs: Vec<StaleHub>,
}

/// Graph analysis parameters
#[derive(Debug, Clone)]
pub struct GraphAnalysis {
    /// Recency window in days
    pub days_threshold: i64,
}

impl Default for GraphAnalysis {
    fn default() -> Self {
        Self { days_threshold: 30 }
    }
}

impl GraphAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn days_threshold(mut self, days: i64) -> Self {
        self.days_threshold = days;
        self
    }

    /// Fetch every page and analyze the snapshot.
    pub async fn run(
        &self,
        provider: &dyn GraphProvider,
        now: DateTime<Local>,
    ) -> ProviderResult<GraphOverview> {
        let pages = provider.fetch_all_pages().await?;
        let contents = fetch_contents(provider, &pages).await;
        let overview = self.analyze(&pages, &contents, now.with_timezone(&Utc));
        info!(
            pages = overview.total_pages,
            references = overview.total_references,
            clusters = overview.clusters.len(),
            "graph analysis complete"
        );
        Ok(overview)
    }

    /// Analyze an already-fetched snapshot.
    pub fn analyze(&self, pages: &[Page], contents: &[PageContent], now: DateTime<Utc>) -> GraphOverview {
        let threshold = recency_window(self.days_threshold);

        // Display names for canonical keys; existing pages win over reference text
        let mut display: HashMap<String, String> = pages
            .iter()
            .map(|p| (p.canonical_name(), p.display_name().to_string()))
            .collect();
        let updated: HashMap<String, DateTime<Utc>> = pages
            .iter()
            .filter_map(|p| p.updated_at.map(|t| (p.canonical_name(), t)))
            .collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut tasks = Vec::new();
        let mut total_references = 0;

        for content in contents {
            let source = content.page.canonical_name();
            let outgoing = adjacency.entry(source).or_default();
            for text in walk::contents(&content.blocks) {
                if links::is_task(text) {
                    tasks.push(TaskItem {
                        page: content.page.display_name().to_string(),
                        text: text.trim().to_string(),
                    });
                }
                for reference in links::extract_references(text) {
                    total_references += 1;
                    let key = canonical(&reference);
                    display.entry(key.clone()).or_insert_with(|| reference.clone());
                    outgoing.insert(key);
                    *counts.entry(reference).or_insert(0) += 1;
                }
            }
        }

        let mut frequent: Vec<(String, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count > FREQUENT_REFERENCE_THRESHOLD)
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut recent: Vec<RecentPage> = pages
            .iter()
            .filter_map(|p| {
                let updated_at = p.updated_at?;
                (now - updated_at <= threshold).then(|| RecentPage {
                    name: p.display_name().to_string(),
                    updated_at,
                })
            })
            .collect();
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));

        let stale_hubs = frequent
            .iter()
            .filter_map(|(name, references)| {
                let updated_at = *updated.get(&canonical(name))?;
                (now - updated_at > threshold).then(|| StaleHub {
                    name: name.clone(),
                    references: *references,
                    updated_at,
                })
            })
            .collect();

        let clusters = connected_components(&adjacency, MIN_CLUSTER_SIZE)
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .map(|key| display.get(&key).cloned().unwrap_or(key))
                    .collect()
            })
            .collect();

        GraphOverview {
            days_threshold: self.days_threshold,
            total_pages: pages.len(),
            journal_pages: pages.iter().filter(|p| p.is_journal).count(),
            pages_with_content: contents.len(),
            total_references,
            unknown_update_dates: pages.iter().filter(|p| p.updated_at.is_none()).count(),
            frequent,
            recent,
            clusters,
            tasks,
            stale_hubs,
        }
    }
}

/// Thresholds past chrono's range saturate instead of overflowing.
fn recency_window(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(if days < 0 { Duration::MIN } else { Duration::MAX })
}

impl GraphOverview {
    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1("Graph Analysis");

        md.h2("Overview");
        md.bullet(format!("Total pages: {}", self.total_pages));
        md.bullet(format!("Journal pages: {}", self.journal_pages));
        md.bullet(format!("Pages with content: {}", self.pages_with_content));
        md.bullet(format!("Total references: {}", self.total_references));
        md.bullet(format!("Outstanding tasks: {}", self.tasks.len()));
        if self.unknown_update_dates > 0 {
            md.bullet(format!(
                "Pages with unknown update date: {}",
                self.unknown_update_dates
            ));
        }

        md.h2("Frequently Referenced Pages");
        if self.frequent.is_empty() {
            md.para("No pages are referenced more than twice.");
        }
        for (name, count) in &self.frequent {
            md.bullet(format!("{} ({} references)", page_ref(name), count));
        }

        md.h2(format!("Recently Updated (last {} days)", self.days_threshold));
        if self.recent.is_empty() {
            md.para("No pages updated in this period.");
        }
        for page in self.recent.iter().take(RECENT_LIMIT) {
            md.bullet(format!(
                "{} ({})",
                page_ref(&page.name),
                page.updated_at.with_timezone(&Local).format("%Y-%m-%d")
            ));
        }

        md.h2("Page Clusters");
        if self.clusters.is_empty() {
            md.para("No clusters of three or more connected pages.");
        }
        for (i, cluster) in self.clusters.iter().enumerate() {
            md.h3(format!("Cluster {} ({} pages)", i + 1, cluster.len()));
            for name in cluster {
                md.bullet(page_ref(name));
            }
        }

        md.h2("Outstanding Tasks");
        if self.tasks.is_empty() {
            md.para("No outstanding tasks.");
        }
        for task in self.tasks.iter().take(TASK_LIMIT) {
            md.bullet(format!("{}: {}", page_ref(&task.page), task.text));
        }
        if self.tasks.len() > TASK_LIMIT {
            md.para(format!("...and {} more", self.tasks.len() - TASK_LIMIT));
        }

        if !self.stale_hubs.is_empty() {
            md.h2("Needs Attention");
            for hub in &self.stale_hubs {
                md.bullet(format!(
                    "{}: referenced {} times, last updated {}",
                    page_ref(&hub.name),
                    hub.references,
                    hub.updated_at.with_timezone(&Local).format("%Y-%m-%d")
                ));
            }
        }

        md.finish()
    }
}
