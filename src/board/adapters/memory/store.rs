//! In-memory document store for reconciliation tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::Tiddler,
    ports::{StoreOperation, TiddlerStore, TiddlerStoreError, TiddlerStoreResult},
};

/// Thread-safe in-memory document store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTiddlerStore {
    state: Arc<RwLock<InMemoryStoreState>>,
    puts: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    tiddlers: BTreeMap<String, Tiddler>,
    failing_puts: HashSet<String>,
}

impl InMemoryTiddlerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document directly, bypassing write accounting.
    pub fn insert(&self, tiddler: Tiddler) {
        self.write_state()
            .tiddlers
            .insert(tiddler.title.clone(), tiddler);
    }

    /// Returns a stored document.
    #[must_use]
    pub fn snapshot(&self, title: &str) -> Option<Tiddler> {
        self.read_state().tiddlers.get(title).cloned()
    }

    /// Returns whether a document exists.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.read_state().tiddlers.contains_key(title)
    }

    /// Makes every later write of `title` fail with HTTP 500.
    pub fn fail_puts_of(&self, title: impl Into<String>) {
        self.write_state().failing_puts.insert(title.into());
    }

    /// Returns the number of writes accepted or rejected so far.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Returns the number of deletes issued so far.
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, InMemoryStoreState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryStoreState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Reduces a document to the shape list queries return: custom fields
/// flattened to the top level and no body text.
fn skinny(tiddler: &Tiddler) -> Tiddler {
    let mut summary = tiddler.clone();
    summary.text = None;
    for (key, value) in std::mem::take(&mut summary.fields) {
        summary.extra.entry(key).or_insert(value);
    }
    summary
}

#[async_trait]
impl TiddlerStore for InMemoryTiddlerStore {
    async fn get_tiddler(&self, title: &str) -> TiddlerStoreResult<Tiddler> {
        self.read_state()
            .tiddlers
            .get(title)
            .cloned()
            .ok_or_else(|| TiddlerStoreError::NotFound(title.to_owned()))
    }

    async fn put_tiddler(&self, tiddler: &Tiddler) -> TiddlerStoreResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.write_state();
        if state.failing_puts.contains(&tiddler.title) {
            return Err(TiddlerStoreError::Remote {
                operation: StoreOperation::Put,
                target: tiddler.title.clone(),
                status: 500,
            });
        }
        let mut stored = tiddler.clone();
        stored
            .extra
            .insert("bag".to_owned(), Value::String("default".to_owned()));
        state.tiddlers.insert(stored.title.clone(), stored);
        Ok(())
    }

    async fn delete_tiddler(&self, title: &str) -> TiddlerStoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let removed = self.write_state().tiddlers.remove(title);
        match removed {
            Some(_) => Ok(()),
            None => Err(TiddlerStoreError::Remote {
                operation: StoreOperation::Delete,
                target: title.to_owned(),
                status: 404,
            }),
        }
    }

    async fn query_by_tag(&self, tag: &str) -> TiddlerStoreResult<Vec<Tiddler>> {
        let state = self.read_state();
        Ok(state
            .tiddlers
            .values()
            .filter(|tiddler| tiddler.has_tag(tag))
            .map(skinny)
            .collect())
    }

    async fn query_by_list(&self, container: &str) -> TiddlerStoreResult<Vec<Tiddler>> {
        let state = self.read_state();
        let listed = state
            .tiddlers
            .get(container)
            .map(Tiddler::list)
            .unwrap_or_default();
        Ok(listed
            .iter()
            .filter_map(|title| state.tiddlers.get(title))
            .map(skinny)
            .collect())
    }
}
