//! pagegraph: graph analysis over a Logseq knowledge graph
//!
//! Reads pages and block trees through a [`GraphProvider`], computes derived
//! structure (reference counts, backlinks, clusters, knowledge gaps, journal
//! patterns, connection suggestions) and renders each result as a markdown
//! report. Every analysis works on a fresh snapshot; nothing is cached or
//! persisted.
//!
//! # Core Concepts
//!
//! - **Pages** and their **block trees**, owned by Logseq and read through a provider
//! - **References**: `[[Page]]` markup inside block text, with `#tags` as a secondary form
//! - **Reports**: markdown with fixed `#` headers, `- ` bullets and `[[name]]` references
//!
//! # Example
//!
//! ```
//! use pagegraph::{GapAnalysis, MemoryProvider, Page, Block};
//!
//! # tokio_test::block_on(async {
//! let provider = MemoryProvider::new()
//!     .with_page(Page::new("Notes"), vec![Block::new("see [[Ideas]]")]);
//! let gaps = GapAnalysis::new().min_reference_count(1).run(&provider).await.unwrap();
//! assert_eq!(gaps.missing[0].name, "Ideas");
//! # });
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod graph;
pub mod mcp;
pub mod provider;
pub mod query;
pub mod report;

pub use analysis::{
    find_backlinks, parse_date_range, parse_timeframe, ConnectionSuggester, DateRange,
    GapAnalysis, GraphAnalysis, JournalAnalysis, JournalSummary, KnowledgeGaps, PageListing,
    PageView, Suggestion, SuggestionKind,
};
pub use api::{ApiError, ApiResult, GraphApi};
pub use config::{Config, ConfigError, ConnectionArgs};
pub use graph::{Block, BlockLink, JournalDay, Page, PageHandle};
pub use mcp::{run_mcp_server, PagegraphMcpServer};
pub use provider::{GraphProvider, LogseqClient, MemoryProvider, ProviderError, ProviderResult};
pub use query::{smart_query, QueryReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
