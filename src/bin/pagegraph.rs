//! pagegraph CLI: Logseq graph analysis with an MCP server.
//!
//! Usage:
//!   pagegraph mcp [--transport stdio]
//!   pagegraph report <graph|gaps|journal|suggest|backlinks|summary|query> [...]
//!
//! Connection flags (`--api-url`, `--token`, `--timeout`) apply to every
//! subcommand and fall back to `LOGSEQ_API_URL`, `LOGSEQ_TOKEN` and
//! `LOGSEQ_TIMEOUT_SECS`.

use clap::{Parser, Subcommand};
use pagegraph::{run_mcp_server, Config, ConnectionArgs, GraphApi, LogseqClient};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pagegraph",
    version,
    about = "Graph analysis and MCP tools for a Logseq knowledge graph"
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP (Model Context Protocol) server
    Mcp {
        /// Transport type (currently only stdio)
        #[arg(long, default_value = "stdio")]
        transport: String,
    },
    /// Print a single report to stdout
    Report {
        #[command(subcommand)]
        report: ReportKind,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Frequently referenced pages, recent updates, clusters and tasks
    Graph {
        /// Recency window in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
    /// Missing, underdeveloped and orphaned pages
    Gaps {
        /// References needed before a page counts as a gap
        #[arg(long, default_value_t = 3)]
        min_references: usize,
        /// Skip the orphaned pages section
        #[arg(long)]
        no_orphans: bool,
    },
    /// Journal topics, moods, habits and projects
    Journal {
        /// e.g. "last 2 weeks" or "this year"
        #[arg(long, default_value = "last 30 days")]
        timeframe: String,
        #[arg(long)]
        no_mood: bool,
        #[arg(long)]
        no_topics: bool,
    },
    /// Connection, synthesis and exploration suggestions
    Suggest {
        #[arg(long, default_value_t = 0.6)]
        min_confidence: f64,
        #[arg(long, default_value_t = 10)]
        max: usize,
        /// Topic or page name to prioritize
        #[arg(long)]
        focus: Option<String>,
    },
    /// Pages referencing a page
    Backlinks {
        /// Target page name
        page: String,
    },
    /// Journal entries in a date range
    Summary {
        /// e.g. "today", "last week", "year to date"
        #[arg(default_value = "this week")]
        range: String,
    },
    /// Free-text structured query
    Query {
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagegraph=info"));
    // stdout carries the MCP transport and report output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &ConnectionArgs) -> Result<Config, String> {
    let config = Config::from_env()
        .map_err(|e| e.to_string())?
        .merge_args(args);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn cmd_report(config: Config, report: ReportKind) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let client = match LogseqClient::new(&config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        let api = GraphApi::new(Arc::new(client));

        let result = match report {
            ReportKind::Graph { days } => api.analyze_graph(days).await,
            ReportKind::Gaps {
                min_references,
                no_orphans,
            } => api.find_knowledge_gaps(min_references, !no_orphans).await,
            ReportKind::Journal {
                timeframe,
                no_mood,
                no_topics,
            } => {
                api.analyze_journal_patterns(&timeframe, !no_mood, !no_topics)
                    .await
            }
            ReportKind::Suggest {
                min_confidence,
                max,
                focus,
            } => api.suggest_connections(min_confidence, max, focus).await,
            ReportKind::Backlinks { page } => api.get_backlinks(&page).await,
            ReportKind::Summary { range } => api.get_journal_summary(&range).await,
            ReportKind::Query { request } => api.smart_query(&request.join(" ")).await,
        };

        match result {
            Ok(text) => {
                print!("{}", text);
                0
            }
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        }
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let config = match resolve_config(&cli.connection) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let code = match cli.command {
        Commands::Mcp { transport } => {
            if transport != "stdio" {
                error!(%transport, "unsupported transport");
                eprintln!("Error: unsupported transport '{}' (only stdio)", transport);
                1
            } else {
                run_mcp_server(config)
            }
        }
        Commands::Report { report } => cmd_report(config, report),
    };

    std::process::exit(code);
}
