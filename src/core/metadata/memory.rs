//! In-memory metadata provider for testing.

use super::{MetadataMap, MetadataProvider};
use crate::error::MetadataError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Provider with fixed answers per path
///
/// Unknown paths yield an empty map. Counts calls so tests can check that
/// records query their provider only once.
#[derive(Default)]
pub struct InMemoryProvider {
    entries: RwLock<HashMap<PathBuf, MetadataMap>>,
    failing: RwLock<HashSet<PathBuf>>,
    calls: AtomicUsize,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a path's metadata
    pub fn with(self, path: impl Into<PathBuf>, metadata: MetadataMap) -> Self {
        self.insert(path, metadata);
        self
    }

    /// Make extraction of `path` fail as if the file were corrupt
    pub fn failing(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(path.into());
        }
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, metadata: MetadataMap) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(path.into(), metadata);
        }
    }

    /// Number of `extract` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn extract(&self, path: &Path) -> Result<MetadataMap, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let is_failing = self
            .failing
            .read()
            .map(|failing| failing.contains(path))
            .unwrap_or(false);
        if is_failing {
            return Err(MetadataError::Parse {
                path: path.to_path_buf(),
                reason: "corrupt file".to_string(),
            });
        }

        let entries = self.entries.read().map_err(|_| MetadataError::Parse {
            path: path.to_path_buf(),
            reason: "provider lock poisoned".to_string(),
        })?;
        Ok(entries.get(path).cloned().unwrap_or_default())
    }
}
