//! Filesystem discovery of candidate font files

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

use crate::extract::is_candidate;

/// Trait for enumerating candidate font files from some backing store.
pub trait FontDiscovery {
    fn discover(&self) -> Result<Vec<PathBuf>>;
}

/// Recursive filesystem walker that collects servable font formats.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl PathDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FontDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(anyhow!("root path does not exist: {}", root.display()));
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if entry.file_type().is_file() && is_candidate(entry.path()) {
                    found.push(entry.path().to_path_buf());
                }
            }
        }

        // Deterministic load order regardless of directory iteration order.
        found.sort();
        Ok(found)
    }
}
