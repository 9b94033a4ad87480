//! File filtering logic for the scanner.

use super::MediaKind;
use std::path::Path;

/// Decides which walked files become media records
pub struct MediaFilter {
    /// Whether to include hidden files
    include_hidden: bool,
}

impl MediaFilter {
    /// Create a filter that accepts every supported media file
    pub fn new() -> Self {
        Self {
            include_hidden: true,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Classify a path, returning `None` for anything that should be skipped
    pub fn accept(&self, path: &Path) -> Option<MediaKind> {
        if !self.include_hidden && is_hidden(path) {
            return None;
        }
        MediaKind::classify(path)
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_media() {
        let filter = MediaFilter::new();
        assert_eq!(filter.accept(Path::new("/dcim/IMG_0001.JPG")), Some(MediaKind::Photo));
        assert_eq!(filter.accept(Path::new("/dcim/IMG_0002.MOV")), Some(MediaKind::Movie));
    }

    #[test]
    fn filter_rejects_other_files() {
        let filter = MediaFilter::new();
        assert_eq!(filter.accept(Path::new("/dcim/notes.txt")), None);
        assert_eq!(filter.accept(Path::new("/dcim/no_extension")), None);
    }

    #[test]
    fn filter_includes_hidden_by_default() {
        let filter = MediaFilter::new();
        assert!(filter.accept(Path::new("/dcim/.hidden.jpg")).is_some());
    }

    #[test]
    fn filter_can_exclude_hidden() {
        let filter = MediaFilter::new().with_hidden(false);
        assert!(filter.accept(Path::new("/dcim/.hidden.jpg")).is_none());
        assert!(filter.accept(Path::new("/dcim/visible.jpg")).is_some());
    }
}
