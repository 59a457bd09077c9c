//! In-memory graph provider
//!
//! Serves a fixed set of pages and block trees. Used by tests and for
//! exercising reports without a running Logseq instance. Mutations update
//! the in-memory state so content tools can be verified end to end.

use super::traits::{GraphProvider, Placement, ProviderError, ProviderResult};
use crate::graph::{canonical, Block, BlockLink, Page, PageHandle};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    pages: Vec<Page>,
    blocks: HashMap<String, Vec<Block>>,
}

/// Provider backed by in-process data
#[derive(Debug, Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
    failing_pages: HashSet<String>,
    query_responses: Vec<(String, Value)>,
    unavailable: bool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose page listing always fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Add a page with its block tree.
    pub fn with_page(self, page: Page, blocks: Vec<Block>) -> Self {
        {
            let mut state = self.lock();
            state.blocks.insert(page.canonical_name(), blocks);
            state.pages.push(page);
        }
        self
    }

    /// Add a page whose block fetch returns no content.
    pub fn with_empty_page(self, page: Page) -> Self {
        self.lock().pages.push(page);
        self
    }

    /// Make block fetches for this page fail with a transport-style error.
    pub fn with_failing_page(mut self, name: &str) -> Self {
        self.failing_pages.insert(canonical(name));
        self
    }

    /// Answer any query containing `fragment` with `response`. First match wins.
    pub fn with_query_response(mut self, fragment: impl Into<String>, response: Value) -> Self {
        self.query_responses.push((fragment.into(), response));
        self
    }

    /// Current pages, in insertion order.
    pub fn pages(&self) -> Vec<Page> {
        self.lock().pages.clone()
    }

    /// Current block tree of a page.
    pub fn blocks(&self, page: &str) -> Option<Vec<Block>> {
        self.lock().blocks.get(&canonical(page)).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-mutation.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn new_block(content: &str, page: &Page) -> Block {
    let mut block = Block::new(content).with_uuid(Uuid::new_v4().to_string());
    block.page = BlockLink::ByReference(PageHandle {
        id: page.id,
        uuid: page.uuid.clone(),
        name: Some(page.display_name().to_string()),
    });
    block
}

/// Locate the sibling list holding `uuid` and the block's index in it.
fn find_slot<'a>(blocks: &'a mut Vec<Block>, uuid: &str) -> Option<(&'a mut Vec<Block>, usize)> {
    if let Some(index) = blocks.iter().position(|b| b.uuid.as_deref() == Some(uuid)) {
        return Some((blocks, index));
    }
    for block in blocks.iter_mut() {
        if let Some(found) = find_slot(&mut block.children, uuid) {
            return Some(found);
        }
    }
    None
}

#[async_trait]
impl GraphProvider for MemoryProvider {
    async fn fetch_all_pages(&self) -> ProviderResult<Vec<Page>> {
        if self.unavailable {
            return Err(ProviderError::Api("graph store unavailable".to_string()));
        }
        Ok(self.pages())
    }

    async fn fetch_page_blocks(&self, page: &str) -> ProviderResult<Option<Vec<Block>>> {
        let key = canonical(page);
        if self.failing_pages.contains(&key) {
            return Err(ProviderError::Api(format!("failed to load blocks for {page}")));
        }
        Ok(self.lock().blocks.get(&key).filter(|b| !b.is_empty()).cloned())
    }

    async fn run_query(&self, query: &str) -> ProviderResult<Vec<Value>> {
        let response = self
            .query_responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, response)| response.clone());
        match response {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Ok(Vec::new()),
        }
    }

    async fn create_page(
        &self,
        name: &str,
        _properties: &Map<String, Value>,
    ) -> ProviderResult<Option<Page>> {
        let mut state = self.lock();
        let key = canonical(name);
        if let Some(existing) = state.pages.iter().find(|p| p.canonical_name() == key) {
            return Ok(Some(existing.clone()));
        }
        let page = Page::new(name)
            .with_updated_at(Utc::now())
            .with_uuid(Uuid::new_v4().to_string());
        state.blocks.insert(key, Vec::new());
        state.pages.push(page.clone());
        Ok(Some(page))
    }

    async fn append_block(&self, page: &str, content: &str) -> ProviderResult<Option<Block>> {
        let mut state = self.lock();
        let key = canonical(page);
        let Some(existing) = state.pages.iter_mut().find(|p| p.canonical_name() == key) else {
            return Ok(None);
        };
        existing.updated_at = Some(Utc::now());
        let block = new_block(content, existing);
        state.blocks.entry(key).or_default().push(block.clone());
        Ok(Some(block))
    }

    async fn insert_block(
        &self,
        target: &str,
        content: &str,
        placement: Placement,
    ) -> ProviderResult<Option<Block>> {
        let mut state = self.lock();
        let State { pages, blocks } = &mut *state;
        for (key, tree) in blocks.iter_mut() {
            let Some((siblings, index)) = find_slot(tree, target) else {
                continue;
            };
            let Some(page) = pages.iter().find(|p| &p.canonical_name() == key) else {
                continue;
            };
            let mut block = new_block(content, page);
            block.parent = if placement.sibling {
                siblings[index].parent.clone()
            } else {
                BlockLink::ById(target.to_string())
            };
            match (placement.sibling, placement.before) {
                (true, true) => siblings.insert(index, block.clone()),
                (true, false) => siblings.insert(index + 1, block.clone()),
                (false, true) => siblings[index].children.insert(0, block.clone()),
                (false, false) => siblings[index].children.push(block.clone()),
            }
            return Ok(Some(block));
        }
        Ok(None)
    }

    async fn remove_block(&self, id: &str) -> ProviderResult<()> {
        let mut state = self.lock();
        for tree in state.blocks.values_mut() {
            if let Some((siblings, index)) = find_slot(tree, id) {
                siblings.remove(index);
                return Ok(());
            }
        }
        Err(ProviderError::NotFound(format!("block {id}")))
    }
}
