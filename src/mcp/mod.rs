//! MCP server for pagegraph: exposes a Logseq graph's pages, journals and
//! structure analyses via the Model Context Protocol.
//!
//! Tools: 5 lookup + 5 content + 5 analysis = 15 total.

pub mod params;

use crate::api::{ApiResult, GraphApi};
use crate::config::Config;
use crate::provider::LogseqClient;
use params::*;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use std::sync::Arc;
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ok_text(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn err_text(msg: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg)]))
}

/// Tool failures are reports, never protocol errors.
fn respond(result: ApiResult<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(text) => ok_text(text),
        Err(e) => {
            warn!(error = %e, "tool failed");
            err_text(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// PagegraphMcpServer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PagegraphMcpServer {
    api: GraphApi,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PagegraphMcpServer {
    pub fn new(api: GraphApi) -> Self {
        Self {
            api,
            tool_router: Self::tool_router(),
        }
    }

    // ── Lookup tools ────────────────────────────────────────────────────

    #[tool(description = "List all pages in the graph, alphabetically")]
    async fn list_pages(
        &self,
        Parameters(p): Parameters<ListPagesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.list_pages(p.include_journals).await)
    }

    #[tool(description = "Get a page's content as an indented outline")]
    async fn get_page(
        &self,
        Parameters(p): Parameters<PageNameParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.get_page(&p.name).await)
    }

    #[tool(description = "Search page names (case-insensitive)")]
    async fn search_pages(
        &self,
        Parameters(p): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.search_pages(&p.query).await)
    }

    #[tool(description = "Find every page that references the given page")]
    async fn get_backlinks(
        &self,
        Parameters(p): Parameters<BacklinksParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.get_backlinks(&p.page).await)
    }

    #[tool(description = "Summarize journal entries in a date range with frequently mentioned pages")]
    async fn get_journal_summary(
        &self,
        Parameters(p): Parameters<JournalSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.get_journal_summary(&p.range).await)
    }

    // ── Content tools ───────────────────────────────────────────────────

    #[tool(description = "Create a page, optionally with initial content and properties")]
    async fn create_page(
        &self,
        Parameters(p): Parameters<CreatePageParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.api
                .create_page(&p.name, p.content.as_deref(), p.properties)
                .await,
        )
    }

    #[tool(description = "Append an entry to today's journal page")]
    async fn add_journal_entry(
        &self,
        Parameters(p): Parameters<JournalEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.add_journal_entry(&p.content).await)
    }

    #[tool(description = "Append a block to the end of a page")]
    async fn add_block(
        &self,
        Parameters(p): Parameters<AddBlockParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.add_block(&p.page, &p.content).await)
    }

    #[tool(description = "Insert a block next to or under an existing block")]
    async fn insert_block(
        &self,
        Parameters(p): Parameters<InsertBlockParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.api
                .insert_block(&p.parent, &p.content, p.before, p.sibling)
                .await,
        )
    }

    #[tool(description = "Delete a block by UUID")]
    async fn delete_block(
        &self,
        Parameters(p): Parameters<BlockIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.delete_block(&p.id).await)
    }

    // ── Analysis tools ──────────────────────────────────────────────────

    #[tool(
        description = "Analyze graph structure: frequently referenced pages, recent updates, clusters, outstanding tasks"
    )]
    async fn analyze_graph(
        &self,
        Parameters(p): Parameters<AnalyzeGraphParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.analyze_graph(p.days_threshold).await)
    }

    #[tool(description = "Find missing, underdeveloped and orphaned pages")]
    async fn find_knowledge_gaps(
        &self,
        Parameters(p): Parameters<KnowledgeGapsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.api
                .find_knowledge_gaps(p.min_reference_count, p.include_orphans)
                .await,
        )
    }

    #[tool(description = "Analyze journal topics, moods, habits and project status over a timeframe")]
    async fn analyze_journal_patterns(
        &self,
        Parameters(p): Parameters<JournalPatternsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.api
                .analyze_journal_patterns(&p.timeframe, p.include_mood, p.include_topics)
                .await,
        )
    }

    #[tool(description = "Suggest new links, synthesis pages and exploration paths")]
    async fn suggest_connections(
        &self,
        Parameters(p): Parameters<SuggestConnectionsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.api
                .suggest_connections(p.min_confidence, p.max_suggestions, p.focus_area)
                .await,
        )
    }

    #[tool(description = "Answer a free-text question with a structured graph query")]
    async fn smart_query(
        &self,
        Parameters(p): Parameters<SmartQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.smart_query(&p.request).await)
    }
}

#[tool_handler]
impl ServerHandler for PagegraphMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "pagegraph MCP server: Logseq pages, journals, backlinks and graph analysis".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run_mcp_server(config: Config) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to create tokio runtime");
            return 1;
        }
    };

    rt.block_on(async {
        let client = match LogseqClient::new(&config) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "failed to build Logseq client");
                return 1;
            }
        };

        info!(endpoint = %client.endpoint(), "pagegraph mcp server starting on stdio");

        let server = PagegraphMcpServer::new(GraphApi::new(Arc::new(client)));

        let service = match server.serve(rmcp::transport::stdio()).await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to start MCP server");
                return 1;
            }
        };

        if let Err(e) = service.waiting().await {
            error!(error = %e, "MCP server error");
            return 1;
        }

        0
    })
}
