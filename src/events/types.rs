//! Event type definitions for progress reporting.

use crate::core::gps::GateDecision;
use crate::core::scanner::MediaKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the organize pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Source tree walk
    Scan(ScanEvent),
    /// Metadata resolution
    Metadata(MetadataEvent),
    /// GPS policy gate
    Gps(GpsEvent),
    /// Directory creation and file copies
    Copy(CopyEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// A media file was found
    MediaFound { path: PathBuf, kind: MediaKind },
    /// An entry could not be read but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_media: usize },
}

/// Events while reading capture times and GPS presence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MetadataEvent {
    Started { total: usize },
    Progress(MetadataProgress),
    /// A record was dropped because its metadata could not be read
    Skipped { path: PathBuf, message: String },
    Completed { resolved: usize, skipped: usize },
}

/// Progress information during metadata resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataProgress {
    pub completed: usize,
    pub total: usize,
    pub current_path: PathBuf,
}

/// Events from the GPS policy gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GpsEvent {
    /// Some photos carry no GPS coordinates
    MissingGps { count: usize, message: String },
    /// One offending file (verbose only)
    MissingFile { path: PathBuf },
    /// The gate reached its decision
    Decided { decision: GateDecision },
}

/// Events while writing the destination tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CopyEvent {
    /// A year directory is created (or would be, in a dry run)
    DirectoryCreated { path: PathBuf, dry_run: bool },
    /// About to copy a file (verbose only)
    Copying {
        source: PathBuf,
        destination: PathBuf,
        dry_run: bool,
    },
    /// A year directory could not be created; its files are not copied
    DirectoryFailed {
        path: PathBuf,
        files: usize,
        message: String,
    },
    /// A copy failed and the run continues
    Failed {
        source: PathBuf,
        destination: PathBuf,
        message: String,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started,
    PhaseChanged { phase: PipelinePhase },
    Completed { summary: PipelineSummary },
    /// The run stopped before touching the destination
    Aborted { reason: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    ReadingMetadata,
    CheckingGps,
    Planning,
    Copying,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub files_copied: usize,
    pub folders_created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::ReadingMetadata => write!(f, "Reading metadata"),
            PipelinePhase::CheckingGps => write!(f, "Checking GPS"),
            PipelinePhase::Planning => write!(f, "Planning"),
            PipelinePhase::Copying => write!(f, "Copying"),
        }
    }
}
