//! Change pipeline: bulk loading and filesystem watching

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rayon::prelude::*;

use crate::config::Config;
use crate::discovery::{FontDiscovery, PathDiscovery};
use crate::extract::{self, ExtractError};
use crate::identity;
use crate::index::{FontIndex, FontRecord};

/// A filesystem change under one of the watched roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Added(PathBuf),
    Removed(PathBuf),
    Modified(PathBuf),
}

/// Applies filesystem changes to a shared [`FontIndex`].
///
/// Extraction and hashing always run before the index lock is taken, so a
/// slow parse never stalls readers.
#[derive(Clone)]
pub struct Indexer {
    index: Arc<FontIndex>,
    config: Arc<Config>,
}

impl Indexer {
    pub fn new(index: Arc<FontIndex>, config: Arc<Config>) -> Self {
        Self { index, config }
    }

    /// Build the full record for one candidate file: parse the binary, then
    /// derive the public identifier and content hash.
    pub fn build_record(&self, path: &Path) -> Result<FontRecord, ExtractError> {
        if !extract::is_candidate(path) {
            return Err(ExtractError::NotAFontFile(path.to_path_buf()));
        }

        let data = fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let descriptor = extract::descriptor_from_bytes(path, &data)?;
        let unique_id = identity::compute_unique_id(&self.config, &descriptor);

        Ok(FontRecord {
            path: path.to_path_buf(),
            format: descriptor.format,
            full_name: descriptor.full_name,
            family_name: descriptor.family_name,
            subfamily_name: descriptor.subfamily_name,
            copyright: descriptor.copyright,
            unique_id,
            content_hash: identity::content_hash(&data),
        })
    }

    /// Discover and parse every font under `roots`, in parallel, without
    /// touching the index. Per-file failures are logged and skipped; a
    /// missing root is an error.
    pub fn scan_records(&self, roots: &[PathBuf]) -> Result<Vec<FontRecord>> {
        let discovery = PathDiscovery::new(roots.iter().cloned());
        let candidates = discovery.discover()?;

        let records: Vec<FontRecord> = candidates
            .par_iter()
            .filter_map(|path| match self.build_record(path) {
                Ok(record) => Some(record),
                Err(ExtractError::NotAFontFile(_)) => None,
                Err(err) => {
                    log::warn!("skipping font: {err}");
                    None
                }
            })
            .collect();

        Ok(records)
    }

    /// Initial full scan: index every parseable font under `roots` and
    /// return how many were loaded.
    pub fn bulk_load(&self, roots: &[PathBuf]) -> Result<usize> {
        let records = self.scan_records(roots)?;
        let count = records.len();
        for record in records {
            self.index.upsert(record);
        }
        Ok(count)
    }

    /// Apply one filesystem event. Per-file failures never escape.
    pub fn apply(&self, event: ChangeEvent) {
        match event {
            ChangeEvent::Added(path) => self.add(&path, "added"),
            ChangeEvent::Modified(path) => {
                // Rename-away surfaces as a modify of the old path on some
                // platforms.
                if !path.exists() {
                    self.drop_path(&path);
                    return;
                }
                self.add(&path, "updated");
            }
            ChangeEvent::Removed(path) => self.drop_path(&path),
        }
    }

    /// Extract-then-swap: the replacement record is fully built before the
    /// index is touched, so a failed re-extraction (torn write, corrupted
    /// content) leaves the previous record serving.
    fn add(&self, path: &Path, verb: &str) {
        match self.build_record(path) {
            Ok(record) => {
                self.index.upsert(record);
                log::info!("{verb} font {}", path.display());
            }
            Err(ExtractError::NotAFontFile(_)) => {}
            Err(err) => log::warn!("skipping font: {err}"),
        }
    }

    fn drop_path(&self, path: &Path) {
        if self.index.remove(path).is_some() {
            log::info!("removed font {}", path.display());
        }
    }

    /// Subscribe to filesystem changes under `roots` and apply them on a
    /// background thread until the returned guard is dropped.
    pub fn watch(&self, roots: &[PathBuf]) -> Result<FontWatcher> {
        let (tx, rx) = channel::<ChangeEvent>();

        let mut watcher = notify::recommended_watcher(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) => {
                    for change in translate_event(&event) {
                        // A closed receiver just means we are shutting down.
                        let _ = tx.send(change);
                    }
                }
                Err(err) => log::warn!("watch error: {err}"),
            },
        )
        .context("creating filesystem watcher")?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .with_context(|| format!("watching {}", root.display()))?;
        }

        let indexer = self.clone();
        let thread = thread::spawn(move || {
            for event in rx {
                indexer.apply(event);
            }
        });

        Ok(FontWatcher {
            watcher: Some(watcher),
            thread: Some(thread),
        })
    }
}

fn translate_event(event: &Event) -> Vec<ChangeEvent> {
    let make: fn(PathBuf) -> ChangeEvent = match event.kind {
        EventKind::Create(_) => ChangeEvent::Added,
        EventKind::Modify(_) => ChangeEvent::Modified,
        EventKind::Remove(_) => ChangeEvent::Removed,
        _ => return Vec::new(),
    };
    event.paths.iter().cloned().map(make).collect()
}

/// Keeps the filesystem subscription and its worker thread alive. Dropping
/// the guard unsubscribes and joins the worker, on every exit path.
pub struct FontWatcher {
    watcher: Option<RecommendedWatcher>,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for FontWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontWatcher").finish_non_exhaustive()
    }
}

impl Drop for FontWatcher {
    fn drop(&mut self) {
        // Dropping the notify handle closes the channel; the worker drains
        // what is left and exits.
        self.watcher.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
