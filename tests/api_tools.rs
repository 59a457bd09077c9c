//! GraphApi operations end to end over the in-memory provider

mod common;

use common::{day, fixed_now, TestGraph};
use pagegraph::{GraphApi, MemoryProvider};
use serde_json::json;
use std::sync::Arc;

fn unavailable() -> GraphApi {
    GraphApi::new(Arc::new(MemoryProvider::unavailable())).with_clock(fixed_now)
}

#[tokio::test]
async fn enumeration_failures_name_the_operation() {
    let api = unavailable();

    let cases = [
        (api.list_pages(false).await, "Error listing pages: "),
        (api.search_pages("x").await, "Error searching pages: "),
        (api.get_backlinks("x").await, "Error finding backlinks: "),
        (api.get_journal_summary("today").await, "Error summarizing journal: "),
        (api.analyze_graph(30).await, "Error analyzing graph: "),
        (api.find_knowledge_gaps(3, true).await, "Error finding knowledge gaps: "),
        (
            api.analyze_journal_patterns("last 30 days", true, true).await,
            "Error analyzing journal patterns: ",
        ),
        (api.suggest_connections(0.6, 10, None).await, "Error suggesting connections: "),
    ];

    for (result, prefix) in cases {
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with(prefix), "{message}");
        assert!(message.ends_with("graph store unavailable"), "{message}");
    }
}

#[tokio::test]
async fn one_failing_page_does_not_abort_the_report() {
    let api = TestGraph::new()
        .page("Alpha", &["links to [[Target]]"])
        .failing_page("Broken")
        .page("Gamma", &["also [[target]]"])
        .page("Target", &["the page itself"])
        .api();

    let backlinks = api.get_backlinks("Target").await.unwrap();
    assert!(backlinks.contains("Found 2 referencing pages:"));
    assert!(backlinks.contains("- [[Alpha]]"));
    assert!(backlinks.contains("- [[Gamma]]"));
    assert!(!backlinks.contains("[[Broken]]"));

    let gaps = api.find_knowledge_gaps(2, true).await.unwrap();
    assert!(gaps.contains("Total pages: 4"));
    assert!(gaps.contains("[[Target]] (2 references"));

    let overview = api.analyze_graph(30).await.unwrap();
    assert!(overview.starts_with("# Graph Analysis"));
}

#[tokio::test]
async fn huge_recency_windows_still_produce_a_report() {
    let api = TestGraph::new()
        .updated_page("Old Notes", 4000, &["archived"])
        .api();

    let report = api.analyze_graph(200_000_000_000).await.unwrap();
    assert!(report.starts_with("# Graph Analysis"));
    assert!(report.contains("[[Old Notes]]"));

    let report = api.analyze_graph(i64::MIN).await.unwrap();
    assert!(report.starts_with("# Graph Analysis"));
}

#[tokio::test]
async fn backlinks_report_when_nothing_references_a_page() {
    let api = TestGraph::new().page("Solo", &["by itself"]).api();

    let report = api.get_backlinks("Solo").await.unwrap();

    assert!(report.starts_with("# Backlinks to [[Solo]]"));
    assert!(report.contains("No pages reference [[Solo]]."));
}

#[tokio::test]
async fn written_content_shows_up_in_later_reports() {
    let provider = Arc::new(TestGraph::new().page("Inbox", &["start"]).build());
    let api = GraphApi::new(provider.clone()).with_clock(fixed_now);

    api.create_page("Reading", Some("queue for [[Inbox]]"), None)
        .await
        .unwrap();
    api.add_block("Inbox", "see [[Reading]]").await.unwrap();
    api.add_journal_entry("finished a chapter of [[Reading]]")
        .await
        .unwrap();

    let backlinks = api.get_backlinks("Reading").await.unwrap();
    assert!(backlinks.contains("- [[Inbox]]"));
    assert!(backlinks.contains("- [[Oct 18th, 2026]]"));

    let page = api.get_page("inbox").await.unwrap();
    assert!(page.contains("- start\n- see [[Reading]]\n"));

    let listing = api.list_pages(true).await.unwrap();
    assert!(listing.contains("- [[Oct 18th, 2026]]"));
    let listing = api.list_pages(false).await.unwrap();
    assert!(listing.contains("- [[Reading]]"));
}

#[tokio::test]
async fn lookups_report_absent_pages_plainly() {
    let api = TestGraph::new()
        .page("Rust Notes", &["ownership"])
        .page("Rusty Nails", &["hardware"])
        .journal(day(2026, 10, 17), &["yesterday"])
        .api();

    let page = api.get_page("Python Notes").await.unwrap();
    assert_eq!(page, "Page \"Python Notes\" not found or has no content.\n");

    let search = api.search_pages("RUST").await.unwrap();
    assert!(search.starts_with("# Search results for \"RUST\""));
    assert!(search.contains("- [[Rust Notes]]"));
    assert!(search.contains("- [[Rusty Nails]]"));

    let search = api.search_pages("haskell").await.unwrap();
    assert!(search.contains("No pages match \"haskell\"."));
}

#[tokio::test]
async fn smart_query_renders_routed_rows() {
    let provider = TestGraph::new()
        .build()
        .with_query_response(
            ":block/marker ?marker",
            json!([
                ["Garden", "TODO turn the compost", "TODO"],
                ["Garden", "LATER order seeds", "LATER"],
                ["Work", "NOW write report", "NOW"],
                "not a row"
            ]),
        );
    let api = GraphApi::new(Arc::new(provider)).with_clock(fixed_now);

    let report = api.smart_query("show my open tasks").await.unwrap();

    assert!(report.starts_with("# Query Results: show my open tasks"));
    assert!(report.contains("## Open Tasks"));
    assert!(report.contains("### [[Garden]]"));
    assert!(report.contains("- NOW write report"));

    let report = api.smart_query("tell me a joke").await.unwrap();
    assert!(report.contains("No results found."));
}
