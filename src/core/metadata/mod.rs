//! # Metadata Module
//!
//! Reads capture timestamps and GPS presence out of media files.
//!
//! ## Providers
//! - `ExifProvider` - in-process EXIF reader (kamadak-exif), used for photos
//! - `ExifToolProvider` - wraps the `exiftool` binary, used for movies
//! - `InMemoryProvider` - fixed answers, for tests
//!
//! Every provider returns a [`MetadataMap`]: a property bag keyed by
//! [`MetadataField`]. Consumers never see provider-specific types.

mod exif_reader;
mod exiftool;
mod memory;
mod timestamp;
mod traits;

pub use exif_reader::ExifProvider;
pub use exiftool::ExifToolProvider;
pub use memory::InMemoryProvider;
pub use timestamp::{parse_offset, parse_timestamp, with_offset};
pub use traits::MetadataProvider;

use crate::core::scanner::MediaKind;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Metadata fields the organizer cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    /// When the shutter fired (EXIF)
    DateTimeOriginal,
    /// Zone of `DateTimeOriginal`, when the camera recorded one
    OffsetTimeOriginal,
    /// Container creation date (QuickTime)
    CreateDate,
    /// Media track creation date (QuickTime)
    MediaCreateDate,
    /// Filesystem modification time as seen by the provider
    FileModifyDate,
    /// Any GPS coordinate; its presence means the file is geotagged
    GpsLatitude,
}

impl MetadataField {
    pub const ALL: [MetadataField; 6] = [
        MetadataField::DateTimeOriginal,
        MetadataField::OffsetTimeOriginal,
        MetadataField::CreateDate,
        MetadataField::MediaCreateDate,
        MetadataField::FileModifyDate,
        MetadataField::GpsLatitude,
    ];

    /// Tag name as printed by exiftool
    pub fn tag_name(&self) -> &'static str {
        match self {
            MetadataField::DateTimeOriginal => "DateTimeOriginal",
            MetadataField::OffsetTimeOriginal => "OffsetTimeOriginal",
            MetadataField::CreateDate => "CreateDate",
            MetadataField::MediaCreateDate => "MediaCreateDate",
            MetadataField::FileModifyDate => "FileModifyDate",
            MetadataField::GpsLatitude => "GPSLatitude",
        }
    }

    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag_name() == name)
    }

    /// Whether values of this field are timestamps
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self,
            MetadataField::DateTimeOriginal
                | MetadataField::CreateDate
                | MetadataField::MediaCreateDate
                | MetadataField::FileModifyDate
        )
    }
}

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    /// Raw text as the provider reported it
    Text(String),
    /// A timestamp the provider already parsed
    Timestamp(DateTime<FixedOffset>),
}

impl MetadataValue {
    pub fn text(value: impl Into<String>) -> Self {
        MetadataValue::Text(value.into())
    }

    /// Build a value from provider text, parsing timestamp fields eagerly.
    ///
    /// Unparseable timestamps stay `Text` and are treated as absent later.
    pub fn from_raw(field: MetadataField, raw: String) -> Self {
        if field.is_timestamp() {
            if let Some(ts) = parse_timestamp(&raw) {
                return MetadataValue::Timestamp(ts);
            }
        }
        MetadataValue::Text(raw)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MetadataValue::Text(s) => s.trim().trim_matches('\0').is_empty(),
            MetadataValue::Timestamp(_) => false,
        }
    }

    /// The value as a UTC instant, if it is (or parses as) a timestamp
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            MetadataValue::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
            MetadataValue::Text(s) => parse_timestamp(s).map(|ts| ts.with_timezone(&Utc)),
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataValue::Text(s) => write!(f, "{}", s),
            MetadataValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y:%m:%d %H:%M:%S%:z")),
        }
    }
}

/// Property bag returned by a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataMap {
    fields: HashMap<MetadataField, MetadataValue>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: MetadataField, value: MetadataValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: MetadataField, value: MetadataValue) {
        self.fields.insert(field, value);
    }

    pub fn get(&self, field: MetadataField) -> Option<&MetadataValue> {
        self.fields.get(&field)
    }

    /// Present and non-empty
    pub fn has_value(&self, field: MetadataField) -> bool {
        self.get(field).map(|v| !v.is_empty()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One provider per media kind
pub struct MetadataProviders {
    photo: Box<dyn MetadataProvider>,
    movie: Box<dyn MetadataProvider>,
}

impl MetadataProviders {
    pub fn new(photo: Box<dyn MetadataProvider>, movie: Box<dyn MetadataProvider>) -> Self {
        Self { photo, movie }
    }

    /// EXIF reader for photos, exiftool at `binary` for movies
    pub fn with_exiftool(binary: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(ExifProvider::new()),
            Box::new(ExifToolProvider::with_binary(binary)),
        )
    }

    pub fn for_kind(&self, kind: MediaKind) -> &dyn MetadataProvider {
        match kind {
            MediaKind::Photo => self.photo.as_ref(),
            MediaKind::Movie => self.movie.as_ref(),
        }
    }
}

impl Default for MetadataProviders {
    fn default() -> Self {
        Self::with_exiftool(ExifToolProvider::DEFAULT_BINARY)
    }
}
