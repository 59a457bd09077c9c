//! Page lookups and journal summaries

use super::dates::{parse_date_range, DateRange};
use super::fetch_contents;
use super::journal::journal_pages_in;
use crate::graph::{canonical, flatten, links, walk, JournalDay};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, Markdown};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use tracing::info;

const TOP_MENTIONS: usize = 10;

/// A single page rendered as an indented outline
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub name: String,
    /// Flattened content; `None` when the page is missing or empty
    pub text: Option<String>,
}

impl PageView {
    pub async fn fetch(provider: &dyn GraphProvider, name: &str) -> ProviderResult<Self> {
        let blocks = provider.fetch_page_blocks(name).await?;
        let text = blocks.map(|b| flatten(&b)).filter(|t| !t.is_empty());
        Ok(Self {
            name: name.trim().to_string(),
            text,
        })
    }

    pub fn to_markdown(&self) -> String {
        match &self.text {
            Some(text) => {
                let mut md = Markdown::new();
                md.h1(&self.name).raw(text);
                md.finish()
            }
            None => format!("Page \"{}\" not found or has no content.\n", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ListingKind {
    All,
    Search(String),
}

/// Page names, alphabetical
#[derive(Debug, Clone, PartialEq)]
pub struct PageListing {
    kind: ListingKind,
    pub pages: Vec<String>,
}

impl PageListing {
    /// Every page, journals only when asked for.
    pub async fn list(provider: &dyn GraphProvider, include_journals: bool) -> ProviderResult<Self> {
        let pages = provider.fetch_all_pages().await?;
        let names = pages
            .iter()
            .filter(|p| include_journals || !p.is_journal)
            .map(|p| p.display_name().to_string())
            .collect();
        Ok(Self {
            kind: ListingKind::All,
            pages: sorted(names),
        })
    }

    /// Pages whose name contains `query`, ignoring case.
    pub async fn search(provider: &dyn GraphProvider, query: &str) -> ProviderResult<Self> {
        let needle = canonical(query);
        let pages = provider.fetch_all_pages().await?;
        let names = pages
            .iter()
            .filter(|p| canonical(p.display_name()).contains(&needle) || p.name.contains(&needle))
            .map(|p| p.display_name().to_string())
            .collect();
        Ok(Self {
            kind: ListingKind::Search(query.trim().to_string()),
            pages: sorted(names),
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        match &self.kind {
            ListingKind::All => {
                md.h1("Pages");
                if self.pages.is_empty() {
                    md.para("No pages found.");
                }
            }
            ListingKind::Search(query) => {
                md.h1(format!("Search results for \"{query}\""));
                if self.pages.is_empty() {
                    md.para(format!("No pages match \"{query}\"."));
                }
            }
        }
        for name in &self.pages {
            md.bullet(page_ref(name));
        }
        md.finish()
    }
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_key(|n| canonical(n));
    names
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub day: JournalDay,
    pub title: String,
    pub text: String,
}

/// Journal entries in a date range with their most frequent references
#[derive(Debug, Clone, PartialEq)]
pub struct JournalSummary {
    /// The range as the caller phrased it
    pub requested: String,
    pub range: DateRange,
    pub entries: Vec<JournalEntry>,
    pub mentions: Vec<(String, usize)>,
}

impl JournalSummary {
    pub async fn build(
        provider: &dyn GraphProvider,
        range: &str,
        now: DateTime<Local>,
    ) -> ProviderResult<Self> {
        let resolved = parse_date_range(range, now);
        let pages = provider.fetch_all_pages().await?;
        let journals = journal_pages_in(&pages, &resolved);
        let contents = fetch_contents(provider, journals).await;

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut entries = Vec::new();
        for content in contents {
            let Some(day) = content.page.journal_day else {
                continue;
            };
            for text in walk::contents(&content.blocks) {
                for reference in links::extract_references(text) {
                    *counts.entry(reference).or_insert(0) += 1;
                }
            }
            if content.text.is_empty() {
                continue;
            }
            entries.push(JournalEntry {
                day,
                title: content.page.display_name().to_string(),
                text: content.text,
            });
        }

        let mut mentions: Vec<(String, usize)> = counts.into_iter().collect();
        mentions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        mentions.truncate(TOP_MENTIONS);

        info!(range = %resolved.title, entries = entries.len(), "journal summary built");
        Ok(Self {
            requested: range.trim().to_string(),
            range: resolved,
            entries,
            mentions,
        })
    }

    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1(format!("Journal Summary: {}", self.range.title));
        if self.entries.is_empty() {
            md.para(format!("No journal entries found for {}.", self.requested));
            return md.finish();
        }

        for entry in &self.entries {
            md.h2(entry.day.to_string());
            md.raw(&entry.text);
        }

        if !self.mentions.is_empty() {
            md.h2("Frequently Mentioned");
            for (name, count) in &self.mentions {
                md.bullet(format!("{} ({})", page_ref(name), count));
            }
        }
        md.finish()
    }
}
