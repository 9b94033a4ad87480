//! Types for the organize module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What to do when a single copy fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CopyFailurePolicy {
    /// Stop the run at the first failure
    #[default]
    Abort,
    /// Report the failure and carry on with the next file
    Continue,
}

/// Flags for one organizer run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub verbose: bool,
    /// Report every action without touching the destination
    pub dry_run: bool,
    /// Abort when any photo lacks GPS instead of asking
    pub enforce_gps: bool,
    pub copy_failure: CopyFailurePolicy,
    /// Prefetch metadata on the rayon pool
    pub parallel_metadata: bool,
}

impl RunConfig {
    /// A dry run is always verbose
    pub fn is_verbose(&self) -> bool {
        self.verbose || self.dry_run
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            dry_run: false,
            enforce_gps: true,
            copy_failure: CopyFailurePolicy::Abort,
            parallel_metadata: true,
        }
    }
}

/// One file to copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCopy {
    pub source: PathBuf,
    /// Full destination path inside the year directory
    pub destination: PathBuf,
    pub capture_time: DateTime<Utc>,
}

impl PlannedCopy {
    /// File name part of the destination
    pub fn file_name(&self) -> &str {
        self.destination
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Year -> files to copy into `<root>/<year>/`, years ascending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationPlan {
    root: PathBuf,
    years: BTreeMap<i32, Vec<PlannedCopy>>,
}

impl DestinationPlan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            years: BTreeMap::new(),
        }
    }

    pub fn year_dir(&self, year: i32) -> PathBuf {
        self.root.join(year.to_string())
    }

    pub fn push(&mut self, year: i32, copy: PlannedCopy) {
        self.years.entry(year).or_default().push(copy);
    }

    /// Years in ascending order with their copies in plan order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[PlannedCopy])> {
        self.years.iter().map(|(year, copies)| (*year, copies.as_slice()))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Earliest and latest capture time in the plan
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.years.values().flatten().map(|c| c.capture_time);
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// Result of executing the plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeResult {
    pub files_copied: usize,
    pub folders_created: usize,
    /// Records dropped because their metadata could not be read
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub dry_run: bool,
    pub duration_ms: u64,
}
