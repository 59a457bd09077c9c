//! Turning tabular query rows into insights
//!
//! Rows that do not have the expected shape are skipped.

use super::templates::QueryTemplate;
use crate::analysis::clusters::{connected_components, MIN_CLUSTER_SIZE};
use crate::graph::{canonical, JournalDay};
use crate::report::{page_ref, Markdown};
use chrono::{DateTime, Local, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

const HUB_LIMIT: usize = 10;
const RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub page: String,
    pub content: String,
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub page: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// Pages ranked by number of connections or references
    Hubs(Vec<(String, usize)>),
    Clusters(Vec<Vec<String>>),
    /// Open tasks grouped by page
    Tasks(BTreeMap<String, Vec<TaskRow>>),
    /// Blocks grouped by journal day
    Timeline(BTreeMap<JournalDay, Vec<TimelineItem>>),
    Recent(Vec<(String, DateTime<Utc>)>),
    Empty,
}

impl Insight {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Hubs(items) => items.is_empty(),
            Self::Clusters(items) => items.is_empty(),
            Self::Tasks(items) => items.is_empty(),
            Self::Timeline(items) => items.is_empty(),
            Self::Recent(items) => items.is_empty(),
            Self::Empty => true,
        }
    }

    pub fn render(&self, md: &mut Markdown) {
        match self {
            Self::Hubs(hubs) => {
                md.h2("Most Connected Pages");
                for (name, count) in hubs {
                    md.bullet(format!("{} ({})", page_ref(name), count));
                }
            }
            Self::Clusters(clusters) => {
                md.h2("Page Clusters");
                for (i, cluster) in clusters.iter().enumerate() {
                    md.h3(format!("Cluster {} ({} pages)", i + 1, cluster.len()));
                    for name in cluster {
                        md.bullet(page_ref(name));
                    }
                }
            }
            Self::Tasks(by_page) => {
                md.h2("Open Tasks");
                for (page, tasks) in by_page {
                    md.h3(page_ref(page));
                    for task in tasks {
                        md.bullet(&task.content);
                    }
                }
            }
            Self::Timeline(days) => {
                md.h2("Timeline");
                for (day, items) in days {
                    md.h3(day.to_string());
                    for item in items {
                        md.bullet(format!("{}: {}", page_ref(&item.page), item.content));
                    }
                }
            }
            Self::Recent(pages) => {
                md.h2("Recently Updated");
                for (name, updated) in pages {
                    md.bullet(format!(
                        "{} ({})",
                        page_ref(name),
                        updated.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ));
                }
            }
            Self::Empty => {}
        }
    }
}

/// Interpret the rows returned for `template`.
pub fn interpret(template: &QueryTemplate, rows: &[Value]) -> Insight {
    let insight = match template {
        QueryTemplate::Connections => Insight::Hubs(connection_hubs(rows)),
        QueryTemplate::Clusters => Insight::Clusters(clusters(rows)),
        QueryTemplate::OpenTasks => Insight::Tasks(tasks(rows)),
        QueryTemplate::ConceptEvolution { .. } | QueryTemplate::CompletedBetween { .. } => {
            Insight::Timeline(timeline(rows))
        }
        QueryTemplate::RecentlyUpdated { .. } => Insight::Recent(recent(rows)),
        QueryTemplate::ReferenceCounts => Insight::Hubs(reference_counts(rows)),
    };
    if insight.is_empty() {
        Insight::Empty
    } else {
        insight
    }
}

fn columns(row: &Value) -> &[Value] {
    row.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn text(row: &[Value], i: usize) -> Option<&str> {
    row.get(i).and_then(Value::as_str)
}

fn number(row: &[Value], i: usize) -> Option<i64> {
    row.get(i).and_then(Value::as_i64)
}

fn pairs(rows: &[Value]) -> impl Iterator<Item = (&str, &str)> + '_ {
    rows.iter().filter_map(|row| {
        let row = columns(row);
        Some((text(row, 0)?, text(row, 1)?))
    })
}

fn ranked(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(HUB_LIMIT);
    ranked
}

/// Distinct neighbors per page, either direction.
fn connection_hubs(rows: &[Value]) -> Vec<(String, usize)> {
    let mut display: HashMap<String, String> = HashMap::new();
    let mut neighbors: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (from, to) in pairs(rows) {
        let (a, b) = (canonical(from), canonical(to));
        if a == b {
            continue;
        }
        display.entry(a.clone()).or_insert_with(|| from.to_string());
        display.entry(b.clone()).or_insert_with(|| to.to_string());
        neighbors.entry(a.clone()).or_default().insert(b.clone());
        neighbors.entry(b).or_default().insert(a);
    }
    ranked(
        neighbors
            .into_iter()
            .map(|(key, set)| (display.get(&key).cloned().unwrap_or(key), set.len()))
            .collect(),
    )
}

fn clusters(rows: &[Value]) -> Vec<Vec<String>> {
    let mut display: HashMap<String, String> = HashMap::new();
    let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (from, to) in pairs(rows) {
        let (a, b) = (canonical(from), canonical(to));
        display.entry(a.clone()).or_insert_with(|| from.to_string());
        display.entry(b.clone()).or_insert_with(|| to.to_string());
        adjacency.entry(a).or_default().insert(b);
    }
    connected_components(&adjacency, MIN_CLUSTER_SIZE)
        .into_iter()
        .map(|c| c.into_iter().map(|k| display.get(&k).cloned().unwrap_or(k)).collect())
        .collect()
}

fn tasks(rows: &[Value]) -> BTreeMap<String, Vec<TaskRow>> {
    let mut by_page: BTreeMap<String, Vec<TaskRow>> = BTreeMap::new();
    for row in rows.iter().map(columns) {
        let (Some(page), Some(content)) = (text(row, 0), text(row, 1)) else {
            continue;
        };
        by_page.entry(page.to_string()).or_default().push(TaskRow {
            page: page.to_string(),
            content: content.trim().to_string(),
            marker: text(row, 2).unwrap_or_default().to_string(),
        });
    }
    by_page
}

fn timeline(rows: &[Value]) -> BTreeMap<JournalDay, Vec<TimelineItem>> {
    let mut days: BTreeMap<JournalDay, Vec<TimelineItem>> = BTreeMap::new();
    for row in rows.iter().map(columns) {
        let (Some(key), Some(page), Some(content)) = (number(row, 0), text(row, 1), text(row, 2))
        else {
            continue;
        };
        let Some(day) = JournalDay::from_key(key) else {
            debug!(key, "skipping row with invalid journal day");
            continue;
        };
        days.entry(day).or_default().push(TimelineItem {
            page: page.to_string(),
            content: content.trim().to_string(),
        });
    }
    days
}

fn recent(rows: &[Value]) -> Vec<(String, DateTime<Utc>)> {
    let mut pages: Vec<(String, DateTime<Utc>)> = rows
        .iter()
        .map(columns)
        .filter_map(|row| {
            let updated = DateTime::<Utc>::from_timestamp_millis(number(row, 1).filter(|ms| *ms > 0)?)?;
            Some((text(row, 0)?.to_string(), updated))
        })
        .collect();
    pages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pages.truncate(RECENT_LIMIT);
    pages
}

fn reference_counts(rows: &[Value]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows.iter().map(columns) {
        let (Some(name), Some(count)) = (text(row, 0), number(row, 1)) else {
            continue;
        };
        *counts.entry(name.to_string()).or_insert(0) += usize::try_from(count).unwrap_or(0);
    }
    ranked(counts)
}
