//! Reference extraction from block text
//!
//! `[[Page Name]]` is the formal reference form and is what backlinks and
//! reference counts are built from. `#tag` is a secondary form that only
//! feeds topic extraction.

use regex::Regex;
use std::sync::LazyLock;

static PAGE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("page reference pattern"));

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(,])#([\w][\w/\-.]*)").expect("tag pattern"));

static TASK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:todo|later)\b").expect("task marker pattern"));

/// Case-insensitive identity for a page name.
pub fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Every `[[...]]` reference, trimmed, left to right, duplicates kept.
pub fn extract_references(text: &str) -> Vec<String> {
    PAGE_REFERENCE
        .captures_iter(text)
        .filter_map(|cap| {
            let name = cap[1].trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Every `#tag`, without the marker. Trailing punctuation is not part of a tag.
pub fn extract_tags(text: &str) -> Vec<String> {
    TAG.captures_iter(text)
        .filter_map(|cap| {
            let tag = cap[1].trim_end_matches(['.', '-', '/']);
            (!tag.is_empty()).then(|| tag.to_string())
        })
        .collect()
}

/// References followed by tags: the topic vocabulary of a piece of text.
pub fn extract_topics(text: &str) -> Vec<String> {
    let mut topics = extract_references(text);
    topics.extend(extract_tags(text));
    topics
}

/// Whether `text` contains a formal reference to `target`, ignoring case.
pub fn references_page(text: &str, target: &str) -> bool {
    let target = canonical(target);
    PAGE_REFERENCE
        .captures_iter(text)
        .any(|cap| canonical(&cap[1]) == target)
}

/// Outstanding-task heuristic: a `todo`/`later` marker or an unchecked box.
pub fn is_task(text: &str) -> bool {
    TASK_MARKER.is_match(text) || text.contains("[ ]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_keep_order_and_duplicates() {
        let refs = extract_references("See [[Rust]] and [[ Tokio ]], then [[Rust]] again.");
        assert_eq!(refs, vec!["Rust", "Tokio", "Rust"]);
    }

    #[test]
    fn empty_and_nested_brackets_are_ignored() {
        assert!(extract_references("[[]] and [[  ]]").is_empty());
        assert_eq!(extract_references("[[[[inner]]]]"), vec!["inner"]);
    }

    #[test]
    fn tags_strip_marker_and_trailing_punctuation() {
        let tags = extract_tags("#rust is great. Also #project/alpha, and #done.");
        assert_eq!(tags, vec!["rust", "project/alpha", "done"]);
    }

    #[test]
    fn heading_hashes_and_anchors_are_not_tags() {
        assert!(extract_tags("## Heading").is_empty());
        assert!(extract_tags("see page#anchor").is_empty());
    }

    #[test]
    fn topics_are_references_then_tags() {
        let topics = extract_topics("#idea about [[Graphs]]");
        assert_eq!(topics, vec!["Graphs", "idea"]);
    }

    #[test]
    fn backlink_matching_ignores_case() {
        assert!(references_page("links to [[rust lang]]", "Rust Lang"));
        assert!(!references_page("mentions Rust Lang in prose", "Rust Lang"));
        assert!(!references_page("#rust", "rust"));
    }

    #[test]
    fn task_markers() {
        assert!(is_task("TODO write tests"));
        assert!(is_task("later: call bob"));
        assert!(is_task("[ ] unchecked"));
        assert!(!is_task("[x] done"));
        assert!(!is_task("translater"));
    }
}
