//! Graph analyses over a fresh snapshot of the knowledge graph
//!
//! Each analysis fetches what it needs from a [`GraphProvider`] on every
//! call, one page at a time, and discards its tables when it returns. Nothing
//! is cached between analyses.
//!
//! Only the initial page listing can fail an analysis. A page whose content
//! cannot be fetched is logged and treated as having no content.

pub mod backlinks;
pub mod clusters;
pub mod dates;
pub mod gaps;
pub mod journal;
pub mod overview;
pub mod suggest;
pub mod summary;

pub use backlinks::{find_backlinks, BacklinkReport};
pub use clusters::connected_components;
pub use dates::{parse_date_range, parse_timeframe, DateRange};
pub use gaps::{GapAnalysis, KnowledgeGaps};
pub use journal::{JournalAnalysis, JournalPatterns};
pub use overview::{GraphAnalysis, GraphOverview};
pub use suggest::{ConnectionSuggester, Suggestion, SuggestionKind, SuggestionReport};
pub use summary::{JournalSummary, PageListing, PageView};

use crate::graph::{flatten, Block, Page};
use crate::provider::GraphProvider;
use tracing::{debug, warn};

/// A page together with its fetched block tree and flattened text
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page: Page,
    pub blocks: Vec<Block>,
    pub text: String,
}

impl PageContent {
    pub fn new(page: Page, blocks: Vec<Block>) -> Self {
        let text = flatten(&blocks);
        Self { page, blocks, text }
    }
}

/// Fetch block trees for `pages` sequentially, in order.
///
/// Pages with no content are omitted. Fetch failures are logged and the page
/// is omitted; they never abort the loop.
pub async fn fetch_contents<'a, I>(provider: &dyn GraphProvider, pages: I) -> Vec<PageContent>
where
    I: IntoIterator<Item = &'a Page>,
{
    let mut contents = Vec::new();
    for page in pages {
        match provider.fetch_page_blocks(&page.name).await {
            Ok(Some(blocks)) => contents.push(PageContent::new(page.clone(), blocks)),
            Ok(None) => debug!(page = %page.name, "page has no content"),
            Err(e) => warn!(page = %page.name, error = %e, "skipping page: content fetch failed"),
        }
    }
    contents
}
