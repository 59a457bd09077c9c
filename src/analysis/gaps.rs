//! Knowledge-gap detection
//!
//! Every existing page gets a tracking entry up front. References then add
//! to their target's entry, creating one for targets with no page. Entries
//! are classified as missing, underdeveloped or orphaned.

use super::{fetch_contents, PageContent};
use crate::graph::{canonical, links, walk, Page};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, Markdown};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Pages with less content than this many characters are underdeveloped.
pub const UNDERDEVELOPED_CONTENT_LENGTH: usize = 100;

const SOURCES_SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
struct ReferenceEntry {
    name: String,
    has_page: bool,
    count: usize,
    referenced_by: BTreeSet<String>,
    content_length: usize,
}

impl ReferenceEntry {
    fn new(name: &str, has_page: bool) -> Self {
        Self {
            name: name.to_string(),
            has_page,
            count: 0,
            referenced_by: BTreeSet::new(),
            content_length: 0,
        }
    }
}

/// A classified page or referenced name
#[derive(Debug, Clone, PartialEq)]
pub struct GapEntry {
    pub name: String,
    pub references: usize,
    /// Distinct referencing pages, alphabetical
    pub referenced_by: Vec<String>,
    pub content_length: usize,
}

impl From<&ReferenceEntry> for GapEntry {
    fn from(entry: &ReferenceEntry) -> Self {
        Self {
            name: entry.name.clone(),
            references: entry.count,
            referenced_by: entry.referenced_by.iter().cloned().collect(),
            content_length: entry.content_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeGaps {
    pub min_reference_count: usize,
    pub total_pages: usize,
    /// Referenced but nonexistent, most referenced first
    pub missing: Vec<GapEntry>,
    /// Existing, well referenced, little content; most referenced first
    pub underdeveloped: Vec<GapEntry>,
    /// Existing and never referenced, alphabetical. `None` when not computed.
    pub orphaned: Option<Vec<GapEntry>>,
}

/// Knowledge-gap parameters
#[derive(Debug, Clone)]
pub struct GapAnalysis {
    pub min_reference_count: usize,
    pub include_orphans: bool,
}

impl Default for GapAnalysis {
    fn default() -> Self {
        Self {
            min_reference_count: 3,
            include_orphans: true,
        }
    }
}

impl GapAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_reference_count(mut self, count: usize) -> Self {
        self.min_reference_count = count;
        self
    }

    pub fn include_orphans(mut self, include: bool) -> Self {
        self.include_orphans = include;
        self
    }

    pub async fn run(&self, provider: &dyn GraphProvider) -> ProviderResult<KnowledgeGaps> {
        let pages = provider.fetch_all_pages().await?;
        let contents = fetch_contents(provider, &pages).await;
        let gaps = self.analyze(&pages, &contents);
        info!(
            missing = gaps.missing.len(),
            underdeveloped = gaps.underdeveloped.len(),
            orphaned = gaps.orphaned.as_ref().map_or(0, Vec::len),
            "knowledge gap analysis complete"
        );
        Ok(gaps)
    }

    pub fn analyze(&self, pages: &[Page], contents: &[PageContent]) -> KnowledgeGaps {
        let mut entries: HashMap<String, ReferenceEntry> = pages
            .iter()
            .map(|p| (p.canonical_name(), ReferenceEntry::new(p.display_name(), true)))
            .collect();

        for content in contents {
            if let Some(entry) = entries.get_mut(&content.page.canonical_name()) {
                entry.content_length = walk::content_length(&content.blocks);
            }
        }

        for content in contents {
            let source = content.page.display_name();
            for text in walk::contents(&content.blocks) {
                for reference in links::extract_references(text) {
                    let entry = entries
                        .entry(canonical(&reference))
                        .or_insert_with(|| ReferenceEntry::new(&reference, false));
                    entry.count += 1;
                    entry.referenced_by.insert(source.to_string());
                }
            }
        }

        let min = self.min_reference_count;
        let mut missing: Vec<&ReferenceEntry> = entries
            .values()
            .filter(|e| !e.has_page && e.count >= min)
            .collect();
        let mut underdeveloped: Vec<&ReferenceEntry> = entries
            .values()
            .filter(|e| {
                e.has_page && e.count >= min && e.content_length < UNDERDEVELOPED_CONTENT_LENGTH
            })
            .collect();
        by_count(&mut missing);
        by_count(&mut underdeveloped);

        let orphaned = self.include_orphans.then(|| {
            let mut orphans: Vec<&ReferenceEntry> =
                entries.values().filter(|e| e.has_page && e.count == 0).collect();
            orphans.sort_by(|a, b| canonical(&a.name).cmp(&canonical(&b.name)));
            orphans.into_iter().map(GapEntry::from).collect()
        });

        KnowledgeGaps {
            min_reference_count: min,
            total_pages: pages.len(),
            missing: missing.into_iter().map(GapEntry::from).collect(),
            underdeveloped: underdeveloped.into_iter().map(GapEntry::from).collect(),
            orphaned,
        }
    }
}

fn by_count(entries: &mut [&ReferenceEntry]) {
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

impl KnowledgeGaps {
    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1("Knowledge Gaps");

        md.h2("Summary");
        md.bullet(format!("Total pages: {}", self.total_pages));
        md.bullet(format!("Missing pages: {}", self.missing.len()));
        md.bullet(format!("Underdeveloped pages: {}", self.underdeveloped.len()));
        if let Some(orphaned) = &self.orphaned {
            md.bullet(format!("Orphaned pages: {}", orphaned.len()));
        }

        md.h2("Missing Pages");
        if self.missing.is_empty() {
            md.para(format!(
                "No missing pages referenced at least {} times.",
                self.min_reference_count
            ));
        }
        for entry in &self.missing {
            md.bullet(format!(
                "{} ({} references, from {})",
                page_ref(&entry.name),
                entry.references,
                sources(entry)
            ));
        }

        md.h2("Underdeveloped Pages");
        if self.underdeveloped.is_empty() {
            md.para("No underdeveloped pages.");
        }
        for entry in &self.underdeveloped {
            md.bullet(format!(
                "{} ({} references, {} characters)",
                page_ref(&entry.name),
                entry.references,
                entry.content_length
            ));
        }

        if let Some(orphaned) = &self.orphaned {
            md.h2("Orphaned Pages");
            if orphaned.is_empty() {
                md.para("No orphaned pages.");
            }
            for entry in orphaned {
                md.bullet(page_ref(&entry.name));
            }
        }

        md.finish()
    }
}

fn sources(entry: &GapEntry) -> String {
    let mut shown: Vec<String> = entry
        .referenced_by
        .iter()
        .take(SOURCES_SHOWN)
        .map(|s| page_ref(s))
        .collect();
    if entry.referenced_by.len() > SOURCES_SHOWN {
        shown.push(format!("{} more", entry.referenced_by.len() - SOURCES_SHOWN));
    }
    shown.join(", ")
}
