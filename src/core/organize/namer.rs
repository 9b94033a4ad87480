//! Collision-free destination file names.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const BASE_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Picks `YYYY-MM-DD HH-MM-SS[ (N)].ext` names that are neither on disk nor
/// handed out earlier in the same run.
///
/// Remembering earlier names matters for dry runs, where nothing is written
/// and the filesystem alone would hand the same name to every file captured
/// in the same second.
#[derive(Debug, Default)]
pub struct DestinationNamer {
    reserved: HashSet<PathBuf>,
    // next suffix to try per unsuffixed candidate
    counters: HashMap<PathBuf, usize>,
}

impl DestinationNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `YYYY-MM-DD HH-MM-SS` in UTC
    pub fn base_name(timestamp: DateTime<Utc>) -> String {
        timestamp.format(BASE_FORMAT).to_string()
    }

    /// Next free file name in `target_dir` for a file captured at `timestamp`
    pub fn next_available_name(
        &mut self,
        target_dir: &Path,
        timestamp: DateTime<Utc>,
        extension: &str,
    ) -> String {
        let base = Self::base_name(timestamp);
        let extension = normalize_extension(extension);

        let plain = format!("{}{}", base, extension);
        let key = target_dir.join(&plain);
        if !self.counters.contains_key(&key) && !self.is_taken(&key) {
            self.reserved.insert(key);
            return plain;
        }

        let mut idx = self.counters.get(&key).copied().unwrap_or(1);
        loop {
            let candidate = format!("{} ({}){}", base, idx, extension);
            let path = target_dir.join(&candidate);
            idx += 1;
            if !self.is_taken(&path) {
                self.counters.insert(key, idx);
                self.reserved.insert(path);
                return candidate;
            }
        }
    }

    fn is_taken(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as taken
        self.reserved.contains(path) || fs::symlink_metadata(path).is_ok()
    }
}

/// `.JPG`, `JPG` -> `.jpg`; empty stays empty
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".{}", trimmed.to_ascii_lowercase())
    }
}
