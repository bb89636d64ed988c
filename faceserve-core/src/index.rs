//! The live font index

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::extract::FontFormat;

/// One indexed font file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontRecord {
    /// Absolute path; primary key of the index.
    pub path: PathBuf,
    pub format: FontFormat,
    pub full_name: String,
    pub family_name: String,
    pub subfamily_name: String,
    pub copyright: String,
    /// Public identifier computed by the identity policy.
    pub unique_id: String,
    /// Hex SHA-256 of the file contents at extraction time; doubles as the
    /// HTTP ETag.
    pub content_hash: String,
}

#[derive(Default)]
struct IndexState {
    by_path: HashMap<PathBuf, Arc<FontRecord>>,
    by_id: HashMap<String, PathBuf>,
    by_full_name: HashMap<String, PathBuf>,
}

/// Concurrent, path-keyed collection of [`FontRecord`]s with derived lookup
/// views by identifier and full name.
///
/// Readers share the lock and proceed in parallel; each mutation holds it
/// exclusively, so the views can never be observed mid-update. Identifier
/// collisions are last-write-wins: the most recently upserted record owns
/// the identifier. The generation counter ticks on every successful
/// mutation and lets downstream caches detect staleness with a single load.
pub struct FontIndex {
    state: RwLock<IndexState>,
    generation: AtomicU64,
}

impl FontIndex {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(IndexState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Insert or replace the record for its path.
    pub fn upsert(&self, record: FontRecord) {
        let record = Arc::new(record);
        let mut state = self.state.write();

        if let Some(old) = state.by_path.remove(&record.path) {
            scrub_views(&mut state, &old);
        }
        state
            .by_id
            .insert(record.unique_id.clone(), record.path.clone());
        state
            .by_full_name
            .insert(record.full_name.clone(), record.path.clone());
        state.by_path.insert(record.path.clone(), record);

        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Remove the record for `path`, returning it; `None` when the path was
    /// never indexed (not an error).
    pub fn remove(&self, path: &Path) -> Option<Arc<FontRecord>> {
        let mut state = self.state.write();
        let old = state.by_path.remove(path)?;
        scrub_views(&mut state, &old);
        self.generation.fetch_add(1, Ordering::Release);
        Some(old)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<FontRecord>> {
        let state = self.state.read();
        state
            .by_id
            .get(id)
            .and_then(|path| state.by_path.get(path))
            .cloned()
    }

    pub fn find_by_full_name(&self, name: &str) -> Option<Arc<FontRecord>> {
        let state = self.state.read();
        state
            .by_full_name
            .get(name)
            .and_then(|path| state.by_path.get(path))
            .cloned()
    }

    /// All records whose full name starts with `prefix`, case-insensitively,
    /// in path order. Empty when nothing matches.
    pub fn find_by_family_prefix(&self, prefix: &str) -> Vec<Arc<FontRecord>> {
        let needle = prefix.to_lowercase();
        let state = self.state.read();
        let mut members: Vec<Arc<FontRecord>> = state
            .by_path
            .values()
            .filter(|record| record.full_name.to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        members.sort_by(|a, b| a.path.cmp(&b.path));
        members
    }

    /// Monotonic mutation counter; equality between two loads means no
    /// mutation happened in between.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.state.read().by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop view entries still pointing at the outgoing record's path. Entries
/// claimed by a newer record under the same identifier are left alone.
fn scrub_views(state: &mut IndexState, old: &FontRecord) {
    if state
        .by_id
        .get(&old.unique_id)
        .is_some_and(|path| path == &old.path)
    {
        state.by_id.remove(&old.unique_id);
    }
    if state
        .by_full_name
        .get(&old.full_name)
        .is_some_and(|path| path == &old.path)
    {
        state.by_full_name.remove(&old.full_name);
    }
}
