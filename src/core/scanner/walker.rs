//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, MediaFilter};
use super::{MediaScanner, ScanResult};
use crate::core::media::MediaRecord;
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: MediaFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = MediaFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }
}

impl MediaScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    fn scan_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut media = Vec::new();
        let mut errors = Vec::new();

        // Sorted walk keeps year buckets, and therefore disambiguators, stable across runs
        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()));

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    let Some(kind) = self.filter.accept(path) else {
                        continue;
                    };

                    debug!(path = %path.display(), %kind, "found media");
                    events.send(Event::Scan(ScanEvent::MediaFound {
                        path: path.to_path_buf(),
                        kind,
                    }));
                    media.push(MediaRecord::new(path.to_path_buf(), kind));
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    warn!(%error, "skipping unreadable entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    errors.push(error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_media: media.len(),
        }));

        Ok(ScanResult { media, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::MediaKind;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.media.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_classifies_photos_and_movies() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.jpg");
        create_file(temp_dir.path(), "b.MOV");
        create_file(temp_dir.path(), "c.mp4");
        create_file(temp_dir.path(), "notes.txt");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let kinds: Vec<MediaKind> = result.media.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![MediaKind::Photo, MediaKind::Movie, MediaKind::Movie]);
    }

    #[test]
    fn scan_traverses_nested_directories_in_sorted_order() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2019").join("trip");
        fs::create_dir_all(&nested).unwrap();

        create_file(temp_dir.path(), "z.jpg");
        create_file(&nested, "a.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.media.len(), 2);
        assert!(result.media[0].path().ends_with("2019/trip/a.jpg"));
        assert!(result.media[1].path().ends_with("z.jpg"));
    }

    #[test]
    fn scan_can_skip_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir_all(&hidden_dir).unwrap();
        create_file(&hidden_dir, "inside.jpg");
        create_file(temp_dir.path(), ".hidden.jpg");
        create_file(temp_dir.path(), "visible.jpg");

        let all = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(all.media.len(), 3);

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let visible = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();
        assert_eq!(visible.media.len(), 1);
        assert!(visible.media[0].path().ends_with("visible.jpg"));
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
