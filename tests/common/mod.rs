//! Shared fixtures for pagegraph integration tests
//!
//! `TestGraph` builds an in-memory graph page by page; `random_graph`
//! generates seeded graphs with planted connected components.

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use pagegraph::{Block, GraphApi, MemoryProvider, Page};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The wall clock every fixture graph is evaluated against.
pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now().with_timezone(&Utc) - chrono::Duration::days(days)
}

fn blocks(lines: &[&str]) -> Vec<Block> {
    lines.iter().map(|line| Block::new(*line)).collect()
}

/// Builder for an in-memory graph
#[derive(Default)]
pub struct TestGraph {
    provider: MemoryProvider,
}

impl TestGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A regular page with one top-level block per line.
    pub fn page(self, name: &str, lines: &[&str]) -> Self {
        self.page_with(Page::new(name), lines)
    }

    /// A regular page last updated `age` days before [`fixed_now`].
    pub fn updated_page(self, name: &str, age: i64, lines: &[&str]) -> Self {
        self.page_with(Page::new(name).with_updated_at(days_ago(age)), lines)
    }

    pub fn journal(self, date: NaiveDate, lines: &[&str]) -> Self {
        self.page_with(Page::journal(date), lines)
    }

    /// An existing page with no block content.
    pub fn empty_page(self, name: &str) -> Self {
        Self {
            provider: self.provider.with_empty_page(Page::new(name)),
        }
    }

    /// A listed page whose block fetch fails.
    pub fn failing_page(self, name: &str) -> Self {
        Self {
            provider: self
                .provider
                .with_page(Page::new(name), blocks(&["unreachable"]))
                .with_failing_page(name),
        }
    }

    pub fn page_with(self, page: Page, lines: &[&str]) -> Self {
        Self {
            provider: self.provider.with_page(page, blocks(lines)),
        }
    }

    pub fn build(self) -> MemoryProvider {
        self.provider
    }

    /// A `GraphApi` over this graph, pinned to [`fixed_now`].
    pub fn api(self) -> GraphApi {
        GraphApi::new(Arc::new(self.provider)).with_clock(fixed_now)
    }
}

/// A generated graph: page name to the pages it references.
pub struct RandomGraph {
    pub pages: Vec<(String, Vec<String>)>,
    /// Every planted component, singletons included
    pub components: Vec<BTreeSet<String>>,
}

impl RandomGraph {
    pub fn provider(&self) -> MemoryProvider {
        self.pages
            .iter()
            .fold(MemoryProvider::new(), |provider, (name, targets)| {
                let lines: Vec<Block> = if targets.is_empty() {
                    vec![Block::new("standalone note")]
                } else {
                    targets
                        .iter()
                        .map(|t| Block::new(format!("relates to [[{t}]]")))
                        .collect()
                };
                provider.with_page(Page::new(name), lines)
            })
    }
}

/// Plant `components` disjoint components of 1..=`max_size` pages each.
///
/// Each page after the first links to an earlier page of its own component,
/// which keeps the component connected; a few extra intra-component links
/// add cycles. No link ever crosses components.
pub fn random_graph(seed: u64, components: usize, max_size: usize) -> RandomGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pages = Vec::new();
    let mut planted = Vec::new();

    for c in 0..components {
        let size = rng.gen_range(1..=max_size);
        let names: Vec<String> = (0..size).map(|i| format!("c{c}-p{i}")).collect();
        let mut links: Vec<Vec<String>> = vec![Vec::new(); size];

        for i in 1..size {
            let earlier = rng.gen_range(0..i);
            // Either direction keeps the undirected component connected
            if rng.gen_bool(0.5) {
                links[i].push(names[earlier].clone());
            } else {
                links[earlier].push(names[i].clone());
            }
        }
        for _ in 0..rng.gen_range(0..=size) {
            let a = rng.gen_range(0..size);
            let b = rng.gen_range(0..size);
            if a != b && !links[a].contains(&names[b]) {
                links[a].push(names[b].clone());
            }
        }

        planted.push(names.iter().cloned().collect());
        pages.extend(names.into_iter().zip(links));
    }

    RandomGraph {
        pages,
        components: planted,
    }
}
