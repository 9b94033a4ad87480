//! # Media Module
//!
//! A discovered media file plus the two facts the organizer needs about it:
//! whether it is geotagged and when it was captured.
//!
//! Both are resolved lazily through the [`MetadataProviders`] and cached on
//! the record, so the (possibly slow) provider runs at most once per file no
//! matter how often the answers are read.
//!
//! ## Capture time fallback
//! - Photo: `DateTimeOriginal`, then filesystem mtime
//! - Movie: `DateTimeOriginal`, `CreateDate`, `MediaCreateDate`,
//!   `FileModifyDate`, then filesystem mtime
//!
//! A capture time therefore always exists for a readable file.

use crate::core::metadata::{MetadataField, MetadataMap, MetadataProviders};
use crate::core::scanner::MediaKind;
use crate::error::MetadataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

const PHOTO_CHAIN: &[MetadataField] = &[MetadataField::DateTimeOriginal];

const MOVIE_CHAIN: &[MetadataField] = &[
    MetadataField::DateTimeOriginal,
    MetadataField::CreateDate,
    MetadataField::MediaCreateDate,
    MetadataField::FileModifyDate,
];

/// Where a capture time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureSource {
    Metadata(MetadataField),
    FileSystem,
}

/// A resolved capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTime {
    pub time: DateTime<Utc>,
    pub source: CaptureSource,
}

/// A media file found during the scan
#[derive(Debug)]
pub struct MediaRecord {
    path: PathBuf,
    kind: MediaKind,
    metadata: OnceLock<Result<MetadataMap, MetadataError>>,
    has_gps: OnceLock<bool>,
    capture: OnceLock<CaptureTime>,
}

impl MediaRecord {
    pub fn new(path: PathBuf, kind: MediaKind) -> Self {
        Self {
            path,
            kind,
            metadata: OnceLock::new(),
            has_gps: OnceLock::new(),
            capture: OnceLock::new(),
        }
    }

    /// Classify `path` and wrap it, or `None` if it is not media
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = MediaKind::classify(&path)?;
        Some(Self::new(path, kind))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Lower-cased extension with its leading dot (`.jpg`)
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    /// The provider's property bag, extracted on first use. A failed
    /// extraction is remembered too.
    pub fn metadata(&self, providers: &MetadataProviders) -> Result<&MetadataMap, MetadataError> {
        self.metadata
            .get_or_init(|| providers.for_kind(self.kind).extract(&self.path))
            .as_ref()
            .map_err(MetadataError::clone)
    }

    /// Whether the file is geotagged. Movies always pass.
    pub fn has_gps(&self, providers: &MetadataProviders) -> Result<bool, MetadataError> {
        if let Some(has_gps) = self.has_gps.get() {
            return Ok(*has_gps);
        }
        let has_gps = match self.kind {
            MediaKind::Movie => true,
            MediaKind::Photo => self.metadata(providers)?.has_value(MetadataField::GpsLatitude),
        };
        Ok(*self.has_gps.get_or_init(|| has_gps))
    }

    /// Capture time and the source it was taken from
    pub fn capture(&self, providers: &MetadataProviders) -> Result<CaptureTime, MetadataError> {
        if let Some(capture) = self.capture.get() {
            return Ok(*capture);
        }

        let metadata = self.metadata(providers)?;
        let capture = match first_timestamp(self.kind, metadata) {
            Some(capture) => capture,
            None => {
                debug!(path = %self.path.display(), kind = %self.kind, "no capture date in metadata, using mtime");
                CaptureTime {
                    time: file_modified(&self.path)?,
                    source: CaptureSource::FileSystem,
                }
            }
        };

        Ok(*self.capture.get_or_init(|| capture))
    }

    pub fn capture_time(&self, providers: &MetadataProviders) -> Result<DateTime<Utc>, MetadataError> {
        Ok(self.capture(providers)?.time)
    }

    /// Resolve and cache everything later phases will ask for
    pub fn resolve(&self, providers: &MetadataProviders) -> Result<(), MetadataError> {
        self.has_gps(providers)?;
        self.capture(providers)?;
        Ok(())
    }
}

fn first_timestamp(kind: MediaKind, metadata: &MetadataMap) -> Option<CaptureTime> {
    let chain = match kind {
        MediaKind::Photo => PHOTO_CHAIN,
        MediaKind::Movie => MOVIE_CHAIN,
    };

    chain.iter().find_map(|&field| {
        let time = metadata.get(field)?.to_utc()?;
        Some(CaptureTime {
            time,
            source: CaptureSource::Metadata(field),
        })
    })
}

fn file_modified(path: &Path) -> Result<DateTime<Utc>, MetadataError> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(modified.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{InMemoryProvider, MetadataProvider, MetadataValue};
    use chrono::TimeZone;
    use filetime::FileTime;
    use std::fs::File;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Shares one in-memory provider between both kinds so tests can count calls
    struct Shared(Arc<InMemoryProvider>);

    impl MetadataProvider for Shared {
        fn name(&self) -> &str {
            "shared"
        }

        fn extract(&self, path: &Path) -> Result<MetadataMap, MetadataError> {
            self.0.extract(path)
        }
    }

    fn providers(provider: InMemoryProvider) -> (MetadataProviders, Arc<InMemoryProvider>) {
        let provider = Arc::new(provider);
        let providers = MetadataProviders::new(
            Box::new(Shared(Arc::clone(&provider))),
            Box::new(Shared(Arc::clone(&provider))),
        );
        (providers, provider)
    }

    fn file_with_mtime(dir: &TempDir, name: &str, unix_secs: i64) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
        path
    }

    #[test]
    fn from_path_classifies() {
        assert_eq!(MediaRecord::from_path("a.JPG").unwrap().kind(), MediaKind::Photo);
        assert_eq!(MediaRecord::from_path("b.mp4").unwrap().kind(), MediaKind::Movie);
        assert!(MediaRecord::from_path("c.txt").is_none());
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(MediaRecord::from_path("/x/IMG_1.JPEG").unwrap().extension(), ".jpeg");
    }

    #[test]
    fn photo_uses_date_time_original() {
        let (providers, _) = providers(InMemoryProvider::new().with(
            "/src/a.jpg",
            MetadataMap::new().with(MetadataField::DateTimeOriginal, MetadataValue::text("2020:01:01 10:00:00")),
        ));
        let record = MediaRecord::from_path("/src/a.jpg").unwrap();

        let capture = record.capture(&providers).unwrap();
        assert_eq!(capture.time, Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(capture.source, CaptureSource::Metadata(MetadataField::DateTimeOriginal));
    }

    #[test]
    fn photo_ignores_movie_only_fields_and_falls_back_to_mtime() {
        let temp = TempDir::new().unwrap();
        // 2021-06-01T12:00:00Z
        let path = file_with_mtime(&temp, "a.jpg", 1_622_548_800);
        let (providers, _) = providers(InMemoryProvider::new().with(
            path.clone(),
            MetadataMap::new().with(MetadataField::CreateDate, MetadataValue::text("2010:01:01 00:00:00")),
        ));
        let record = MediaRecord::from_path(path).unwrap();

        let capture = record.capture(&providers).unwrap();
        assert_eq!(capture.source, CaptureSource::FileSystem);
        assert_eq!(capture.time, Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn movie_chain_order() {
        let (providers, _) = providers(InMemoryProvider::new().with(
            "/src/b.mov",
            MetadataMap::new()
                .with(MetadataField::CreateDate, MetadataValue::text("0000:00:00 00:00:00"))
                .with(MetadataField::MediaCreateDate, MetadataValue::text("2018:05:05 05:05:05"))
                .with(MetadataField::FileModifyDate, MetadataValue::text("2022:01:01 00:00:00+00:00")),
        ));
        let record = MediaRecord::from_path("/src/b.mov").unwrap();

        let capture = record.capture(&providers).unwrap();
        assert_eq!(capture.source, CaptureSource::Metadata(MetadataField::MediaCreateDate));
        assert_eq!(capture.time, Utc.with_ymd_and_hms(2018, 5, 5, 5, 5, 5).unwrap());
    }

    #[test]
    fn movie_with_only_file_modify_date_uses_it() {
        let modified = Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 1).unwrap();
        let (providers, _) = providers(InMemoryProvider::new().with(
            "/src/b.mov",
            MetadataMap::new().with(MetadataField::FileModifyDate, MetadataValue::Timestamp(modified.fixed_offset())),
        ));
        let record = MediaRecord::from_path("/src/b.mov").unwrap();

        assert_eq!(record.capture_time(&providers).unwrap(), modified);
    }

    #[test]
    fn zoned_timestamps_are_normalized_to_utc() {
        let (providers, _) = providers(InMemoryProvider::new().with(
            "/src/c.mp4",
            MetadataMap::new().with(MetadataField::CreateDate, MetadataValue::text("2020:01:01 01:00:00+02:00")),
        ));
        let record = MediaRecord::from_path("/src/c.mp4").unwrap();

        assert_eq!(
            record.capture_time(&providers).unwrap(),
            Utc.with_ymd_and_hms(2019, 12, 31, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn movie_always_has_gps_without_asking_provider() {
        let (providers, provider) = providers(InMemoryProvider::new().failing("/src/broken.mov"));
        let record = MediaRecord::from_path("/src/broken.mov").unwrap();

        assert!(record.has_gps(&providers).unwrap());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn photo_gps_requires_non_empty_value() {
        let (providers, _) = providers(
            InMemoryProvider::new()
                .with(
                    "/src/tagged.jpg",
                    MetadataMap::new().with(MetadataField::GpsLatitude, MetadataValue::text("52 deg 22 min")),
                )
                .with(
                    "/src/blank.jpg",
                    MetadataMap::new().with(MetadataField::GpsLatitude, MetadataValue::text("")),
                ),
        );

        assert!(MediaRecord::from_path("/src/tagged.jpg").unwrap().has_gps(&providers).unwrap());
        assert!(!MediaRecord::from_path("/src/blank.jpg").unwrap().has_gps(&providers).unwrap());
        assert!(!MediaRecord::from_path("/src/none.jpg").unwrap().has_gps(&providers).unwrap());
    }

    #[test]
    fn provider_is_queried_once_per_record() {
        let (providers, provider) = providers(InMemoryProvider::new().with(
            "/src/a.jpg",
            MetadataMap::new().with(MetadataField::DateTimeOriginal, MetadataValue::text("2020:01:01 10:00:00")),
        ));
        let record = MediaRecord::from_path("/src/a.jpg").unwrap();

        record.resolve(&providers).unwrap();
        record.has_gps(&providers).unwrap();
        record.capture_time(&providers).unwrap();

        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn provider_failure_surfaces_as_error() {
        let (providers, _) = providers(InMemoryProvider::new().failing("/src/broken.jpg"));
        let record = MediaRecord::from_path("/src/broken.jpg").unwrap();

        assert!(record.resolve(&providers).is_err());
    }

    #[test]
    fn provider_failure_is_not_retried() {
        let (providers, provider) = providers(InMemoryProvider::new().failing("/src/broken.jpg"));
        let record = MediaRecord::from_path("/src/broken.jpg").unwrap();

        assert!(matches!(record.has_gps(&providers), Err(MetadataError::Parse { .. })));
        assert!(matches!(record.capture(&providers), Err(MetadataError::Parse { .. })));
        assert!(record.metadata(&providers).is_err());

        assert_eq!(provider.call_count(), 1);
    }
}
