//! # Scanner Module
//!
//! Discovers media files in a source tree and classifies them.
//!
//! ## Supported Formats
//! - Photos: JPEG (.jpg, .jpeg)
//! - Movies: QuickTime (.mov), MPEG-4 (.mp4)
//!
//! Everything else is ignored silently; an unsupported extension is not an
//! error.
//!
//! ## Example
//! ```rust,ignore
//! use media_organizer::core::scanner::{MediaScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/Volumes/SDCARD/DCIM"))?;
//! ```

mod filter;
mod walker;

pub use filter::MediaFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::core::media::MediaRecord;
use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The two kinds of media the organizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Movie,
}

impl MediaKind {
    /// Detect the kind from a bare extension (no leading dot), ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaKind::Photo),
            "mov" | "mp4" => Some(MediaKind::Movie),
            _ => None,
        }
    }

    /// Classify a path by its extension. Pure; touches no filesystem.
    pub fn classify(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Movie => write!(f, "movie"),
        }
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered media, in walk order
    pub media: Vec<MediaRecord>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for media scanners
pub trait MediaScanner: Send + Sync {
    /// Scan a source tree and return discovered media
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_photos_any_case() {
        for name in ["a.jpg", "a.JPG", "a.jpeg", "a.JpEg", "dir/b.Jpg"] {
            assert_eq!(MediaKind::classify(Path::new(name)), Some(MediaKind::Photo), "{}", name);
        }
    }

    #[test]
    fn classify_movies_any_case() {
        for name in ["a.mov", "a.MOV", "a.mp4", "a.Mp4"] {
            assert_eq!(MediaKind::classify(Path::new(name)), Some(MediaKind::Movie), "{}", name);
        }
    }

    #[test]
    fn unsupported_extensions_are_not_media() {
        for name in ["a.png", "a.heic", "a.txt", "a.avi", "a.jpg.bak", "jpg", "a.", "noext"] {
            assert_eq!(MediaKind::classify(Path::new(name)), None, "{}", name);
        }
    }

    #[test]
    fn from_extension_ignores_case() {
        assert_eq!(MediaKind::from_extension("JPEG"), Some(MediaKind::Photo));
        assert_eq!(MediaKind::from_extension("MP4"), Some(MediaKind::Movie));
        assert_eq!(MediaKind::from_extension("gif"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(MediaKind::Photo.to_string(), "photo");
        assert_eq!(MediaKind::Movie.to_string(), "movie");
    }
}
