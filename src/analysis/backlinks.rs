//! Backlink discovery by full content scan
//!
//! There is no reference index: every call fetches every other page's
//! content and looks for a `[[target]]` reference, ignoring case.

use crate::graph::{canonical, flatten, links};
use crate::provider::{GraphProvider, ProviderResult};
use crate::report::{page_ref, Markdown};
use tracing::{debug, warn};

/// Pages referencing a target, in provider order
#[derive(Debug, Clone, PartialEq)]
pub struct BacklinkReport {
    pub target: String,
    pub sources: Vec<String>,
}

impl BacklinkReport {
    pub fn to_markdown(&self) -> String {
        let mut md = Markdown::new();
        md.h1(format!("Backlinks to {}", page_ref(&self.target)));
        if self.sources.is_empty() {
            md.para(format!("No pages reference {}.", page_ref(&self.target)));
        } else {
            md.para(format!("Found {} referencing pages:", self.sources.len()));
            for source in &self.sources {
                md.bullet(page_ref(source));
            }
        }
        md.finish()
    }
}

/// Scan all other pages for references to `target`.
pub async fn find_backlinks(
    provider: &dyn GraphProvider,
    target: &str,
) -> ProviderResult<BacklinkReport> {
    let pages = provider.fetch_all_pages().await?;
    let target_key = canonical(target);
    let mut sources = Vec::new();

    for page in pages.iter().filter(|p| p.canonical_name() != target_key) {
        let blocks = match provider.fetch_page_blocks(&page.name).await {
            Ok(Some(blocks)) => blocks,
            Ok(None) => continue,
            Err(e) => {
                warn!(page = %page.name, error = %e, "skipping page in backlink scan");
                continue;
            }
        };
        if links::references_page(&flatten(&blocks), target) {
            sources.push(page.display_name().to_string());
        }
    }

    debug!(page = target, found = sources.len(), "backlink scan complete");
    Ok(BacklinkReport {
        target: target.trim().to_string(),
        sources,
    })
}
