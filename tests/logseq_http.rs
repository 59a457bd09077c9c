//! GraphApi over the Logseq HTTP client against a mock server

mod common;

use common::fixed_now;
use pagegraph::{Config, GraphApi, LogseqClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> GraphApi {
    let config = Config {
        api_url: format!("{}/api", server.uri()),
        token: Some("secret".to_string()),
        ..Config::default()
    };
    GraphApi::new(Arc::new(LogseqClient::new(&config).unwrap())).with_clock(fixed_now)
}

async fn mount_graph(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "logseq.Editor.getAllPages" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "notes", "originalName": "Notes", "updatedAt": 0 },
            { "name": "rust", "originalName": "Rust", "updatedAt": "yesterday" },
            { "name": "oct 17th, 2026", "originalName": "Oct 17th, 2026",
              "journal?": true, "journalDay": 20261017 }
        ])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "logseq.Editor.getPageBlocksTree",
            "args": ["notes"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "uuid": "6530f2a1-0000-4000-8000-000000000001",
                "content": "reading about [[Rust]]",
                "page": { "id": 12 },
                "children": [
                    { "content": "and [[Ownership]]", "children": [] },
                    ["uuid", "6530f2a1-0000-4000-8000-000000000002"]
                ]
            }
        ])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "logseq.Editor.getPageBlocksTree",
            "args": ["oct 17th, 2026"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "content": "paired on [[Rust]] #async", "children": [] }
        ])))
        .mount(server)
        .await;

    // The rust page has no blocks yet
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "logseq.Editor.getPageBlocksTree",
            "args": ["rust"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reports_read_pages_and_block_trees() {
    let server = MockServer::start().await;
    mount_graph(&server).await;
    let api = api_for(&server);

    let backlinks = api.get_backlinks("rust").await.unwrap();
    assert!(backlinks.contains("- [[Notes]]"));
    assert!(backlinks.contains("- [[Oct 17th, 2026]]"));

    let page = api.get_page("notes").await.unwrap();
    assert_eq!(page, "# notes\n\n- reading about [[Rust]]\n  - and [[Ownership]]\n");

    let gaps = api.find_knowledge_gaps(1, true).await.unwrap();
    assert!(gaps.contains("[[Ownership]] (1 references, from [[Notes]])"));
    assert!(gaps.contains("[[Rust]] (2 references, 0 characters)"));

    let summary = api.get_journal_summary("yesterday").await.unwrap();
    assert!(summary.contains("## 2026-10-17"));
    assert!(summary.contains("- paired on [[Rust]] #async"));
}

#[tokio::test]
async fn unknown_update_dates_are_counted_not_guessed() {
    let server = MockServer::start().await;
    mount_graph(&server).await;

    let overview = api_for(&server).analyze_graph(30).await.unwrap();

    assert!(overview.contains("Pages with unknown update date: 3"));
}

#[tokio::test]
async fn failed_enumeration_is_one_top_level_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api_for(&server).analyze_graph(30).await.unwrap_err();

    assert_eq!(err.to_string(), "Error analyzing graph: API returned 500: boom");
}
