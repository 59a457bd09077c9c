//! Deserialization tests against Logseq API fixtures

use serde_json::{json, Value};

/// `logseq.Editor.getAllPages` entry for a regular page
fn page_fixture() -> Value {
    json!({
        "id": 112,
        "uuid": "6512d3a1-0000-4f00-8000-000000000001",
        "name": "rust",
        "originalName": "Rust",
        "journal?": false,
        "updatedAt": 1760745600000_i64,
        "createdAt": 1700000000000_i64,
        "format": "markdown"
    })
}

/// `logseq.Editor.getAllPages` entry for a journal page
fn journal_fixture() -> Value {
    json!({
        "id": 240,
        "name": "oct 18th, 2026",
        "originalName": "Oct 18th, 2026",
        "journal?": true,
        "journalDay": 20261018,
        "updatedAt": 1760745600000_i64
    })
}

/// `logseq.Editor.getPageBlocksTree` result with a collapsed child stub
fn block_tree_fixture() -> Value {
    json!([
        {
            "uuid": "b-1",
            "content": "Learning [[Tokio]] today",
            "page": { "id": 112 },
            "parent": { "id": 112 },
            "children": [
                {
                    "uuid": "b-2",
                    "content": "TODO read the guide",
                    "parent": { "uuid": "b-1" },
                    "children": []
                },
                ["uuid", "b-3"]
            ]
        },
        {
            "uuid": "b-4",
            "content": "",
            "page": "rust",
            "children": [
                { "uuid": "b-5", "content": "#async notes" }
            ]
        }
    ])
}

#[cfg(test)]
mod deserialization_tests {
    use super::*;
    use crate::graph::{flatten, Block, BlockLink, Page, PageHandle};

    #[test]
    fn page_decodes_logseq_keys() {
        let page: Page = serde_json::from_value(page_fixture()).unwrap();
        assert_eq!(page.name, "rust");
        assert_eq!(page.display_name(), "Rust");
        assert!(!page.is_journal);
        assert!(page.journal_day.is_none());
        assert_eq!(page.updated_at.unwrap().timestamp_millis(), 1760745600000);
        assert_eq!(page.id, Some(112));
    }

    #[test]
    fn journal_page_decodes_day() {
        let page: Page = serde_json::from_value(journal_fixture()).unwrap();
        assert!(page.is_journal);
        assert_eq!(page.journal_day.unwrap().key(), 20261018);
    }

    #[test]
    fn invalid_dates_decode_as_unknown() {
        let page: Page = serde_json::from_value(json!({
            "name": "broken",
            "journalDay": "not-a-day",
            "updatedAt": 0,
            "createdAt": "yesterday-ish"
        }))
        .unwrap();
        assert!(page.journal_day.is_none());
        assert!(page.updated_at.is_none());
        assert!(page.created_at.is_none());
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let page: Page = serde_json::from_value(json!({
            "name": "iso",
            "updatedAt": "2026-10-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(page.updated_at.unwrap().to_rfc3339(), "2026-10-01T12:00:00+00:00");
    }

    #[test]
    fn minimal_page_needs_only_a_name() {
        let page: Page = serde_json::from_value(json!({ "name": "bare" })).unwrap();
        assert_eq!(page.display_name(), "bare");
        assert!(!page.is_journal);
    }

    #[test]
    fn block_tree_drops_collapsed_stubs() {
        let blocks: Vec<Block> = serde_json::from_value(block_tree_fixture()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(blocks[0].children[0].uuid.as_deref(), Some("b-2"));
    }

    #[test]
    fn block_links_are_normalized() {
        let blocks: Vec<Block> = serde_json::from_value(block_tree_fixture()).unwrap();
        assert_eq!(
            blocks[0].page,
            BlockLink::ByReference(PageHandle {
                id: Some(112),
                uuid: None,
                name: None,
            })
        );
        assert_eq!(blocks[1].page, BlockLink::ById("rust".to_string()));
        assert_eq!(blocks[1].parent, BlockLink::None);
    }

    #[test]
    fn decoded_tree_flattens_with_empty_parent_skipped() {
        let blocks: Vec<Block> = serde_json::from_value(block_tree_fixture()).unwrap();
        assert_eq!(
            flatten(&blocks),
            "- Learning [[Tokio]] today\n  - TODO read the guide\n  - #async notes\n"
        );
    }
}
