//! Keyword routing from free-text requests to query templates
//!
//! This is a heuristic, not a parser. Intents are tried in a fixed order and
//! the first whose keywords appear in the request wins, so a request that
//! mentions several intents always resolves to the earliest one.

use super::templates::QueryTemplate;
use crate::analysis::dates::{find_range_keyword, parse_date_range};
use crate::graph::{links, JournalDay};
use chrono::{DateTime, Duration, Local};

/// Window used by the recency intent
pub const RECENT_DAYS: i64 = 7;

type Predicate = fn(&str) -> bool;
type Builder = fn(&str, DateTime<Local>) -> QueryTemplate;

/// One routing rule. Predicates see the lowercased request.
pub struct Intent {
    pub name: &'static str,
    matches: Predicate,
    build: Builder,
}

impl std::fmt::Debug for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intent").field("name", &self.name).finish()
    }
}

/// Ordered intent rules
#[derive(Debug)]
pub struct IntentTable {
    intents: Vec<Intent>,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl IntentTable {
    /// connections, clusters, tasks, evolution, completed in a range, then
    /// the recent and reference fallbacks.
    pub fn standard() -> Self {
        Self {
            intents: vec![
                Intent {
                    name: "connections",
                    matches: |r| contains_any(r, &["connection", "connected", "link", "related"]),
                    build: |_, _| QueryTemplate::Connections,
                },
                Intent {
                    name: "clusters",
                    matches: |r| contains_any(r, &["cluster", "group"]),
                    build: |_, _| QueryTemplate::Clusters,
                },
                Intent {
                    name: "tasks",
                    matches: |r| contains_any(r, &["todo", "task", "outstanding"]),
                    build: |_, _| QueryTemplate::OpenTasks,
                },
                Intent {
                    name: "evolution",
                    matches: |r| contains_any(r, &["evolv", "over time", "history of"]),
                    build: |request, _| QueryTemplate::ConceptEvolution {
                        topic: topic_of(request),
                    },
                },
                Intent {
                    name: "completed",
                    matches: |r| {
                        contains_any(r, &["completed", "finished", "done"])
                            && find_range_keyword(r).is_some()
                    },
                    build: completed_between,
                },
                Intent {
                    name: "recent",
                    matches: |r| contains_any(r, &["recent", "latest", "lately"]),
                    build: |_, now| QueryTemplate::RecentlyUpdated {
                        since_ms: (now - Duration::days(RECENT_DAYS)).timestamp_millis(),
                    },
                },
                Intent {
                    name: "references",
                    matches: |r| contains_any(r, &["reference", "popular", "hub", "mentioned"]),
                    build: |_, _| QueryTemplate::ReferenceCounts,
                },
            ],
        }
    }

    /// The first matching intent and its bound template.
    pub fn route(&self, request: &str, now: DateTime<Local>) -> Option<(&'static str, QueryTemplate)> {
        let lowered = request.to_lowercase();
        self.intents
            .iter()
            .find(|intent| (intent.matches)(&lowered))
            .map(|intent| (intent.name, (intent.build)(request, now)))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.intents.iter().map(|i| i.name)
    }
}

fn completed_between(request: &str, now: DateTime<Local>) -> QueryTemplate {
    let keyword = find_range_keyword(request).unwrap_or("this week");
    let range = parse_date_range(keyword, now);
    QueryTemplate::CompletedBetween {
        start: JournalDay::from_date(range.start_date()).key(),
        end: JournalDay::from_date(range.end_date()).key(),
        title: range.title,
    }
}

/// The first `[[reference]]`, else the words after the last "of" or "about".
fn topic_of(request: &str) -> String {
    if let Some(reference) = links::extract_references(request).into_iter().next() {
        return reference;
    }
    let lowered = request.to_ascii_lowercase();
    let tail = ["about ", "of "]
        .iter()
        .filter_map(|marker| lowered.rfind(marker).map(|i| i + marker.len()))
        .max()
        .map_or(request, |start| &request[start..]);
    tail.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string()
}
