//! In-process EXIF reader for photos.

use super::{timestamp, MetadataField, MetadataMap, MetadataProvider, MetadataValue};
use crate::error::MetadataError;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Fast metadata provider backed by kamadak-exif
///
/// Reads `DateTimeOriginal` (combined with `OffsetTimeOriginal` when the
/// camera wrote one) and `GPSLatitude`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifProvider;

impl ExifProvider {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataProvider for ExifProvider {
    fn name(&self) -> &str {
        "exif"
    }

    fn extract(&self, path: &Path) -> Result<MetadataMap, MetadataError> {
        let file = File::open(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bufreader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                debug!(path = %path.display(), "no EXIF block");
                return Ok(MetadataMap::new());
            }
            Err(exif::Error::Io(source)) => {
                return Err(MetadataError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                return Err(MetadataError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let mut metadata = MetadataMap::new();

        let offset = ascii_field(&exif, Tag::OffsetTimeOriginal);
        if let Some(raw) = ascii_field(&exif, Tag::DateTimeOriginal) {
            let zoned = offset
                .as_deref()
                .and_then(|offset| timestamp::with_offset(&raw, offset))
                .map(MetadataValue::Timestamp);
            let value = zoned.unwrap_or_else(|| MetadataValue::from_raw(MetadataField::DateTimeOriginal, raw));
            metadata.insert(MetadataField::DateTimeOriginal, value);
        }
        if let Some(offset) = offset {
            metadata.insert(MetadataField::OffsetTimeOriginal, MetadataValue::Text(offset));
        }

        if let Some(field) = exif.get_field(Tag::GPSLatitude, In::PRIMARY) {
            metadata.insert(
                MetadataField::GpsLatitude,
                MetadataValue::Text(field.display_value().to_string()),
            );
        }

        Ok(metadata)
    }
}

/// Helper to extract a trimmed string from an EXIF ASCII field
fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref vec) = field.value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}
