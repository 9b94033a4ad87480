//! # Core Module
//!
//! The terminal-agnostic organizer engine.
//!
//! ## Modules
//! - `scanner` - Discovers and classifies media in a source tree
//! - `metadata` - Reads capture dates and GPS through pluggable providers
//! - `media` - Per-file record with cached capture time and GPS flag
//! - `gps` - Run-level policy on photos without GPS
//! - `organize` - Plans destination names and copies files
//! - `pipeline` - Orchestrates the full workflow

pub mod gps;
pub mod media;
pub mod metadata;
pub mod organize;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use gps::{ConfirmPrompt, GateDecision};
pub use media::{CaptureSource, CaptureTime, MediaRecord};
pub use metadata::{MetadataProvider, MetadataProviders};
pub use organize::{CopyFailurePolicy, OrganizeResult, RunConfig};
pub use pipeline::Pipeline;
pub use scanner::MediaKind;
