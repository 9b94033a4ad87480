//! Metadata provider trait definition.

use super::MetadataMap;
use crate::error::MetadataError;
use std::path::Path;

/// Something that can read a property bag out of a media file
///
/// Implementations differ in cost and coverage: the EXIF reader is
/// in-process and fast but only understands photos, exiftool spawns a
/// process per file but reads movies too.
pub trait MetadataProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Read the metadata of one file
    ///
    /// A file without any of the requested fields yields an empty map, not an
    /// error. Errors are reserved for unreadable or corrupt files and for a
    /// broken tool.
    fn extract(&self, path: &Path) -> Result<MetadataMap, MetadataError>;

    /// Whether the provider can run at all on this machine
    fn is_available(&self) -> bool {
        true
    }
}
