//! exiftool wrapper for movies.

use super::{MetadataField, MetadataMap, MetadataProvider, MetadataValue};
use crate::error::MetadataError;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Slow but comprehensive provider: one `exiftool -json` process per file
#[derive(Debug, Clone)]
pub struct ExifToolProvider {
    binary: PathBuf,
}

impl ExifToolProvider {
    pub const DEFAULT_BINARY: &'static str = "exiftool";

    /// Use `exiftool` from `PATH`
    pub fn new() -> Self {
        Self::with_binary(Self::DEFAULT_BINARY)
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn tool_name(&self) -> String {
        self.binary.display().to_string()
    }

    /// Arguments asking only for the tags we use, as JSON
    fn arguments() -> Vec<String> {
        let mut args = vec!["-json".to_string()];
        args.extend(
            [
                MetadataField::DateTimeOriginal,
                MetadataField::CreateDate,
                MetadataField::MediaCreateDate,
                MetadataField::FileModifyDate,
                MetadataField::GpsLatitude,
            ]
            .iter()
            .map(|field| format!("-{}", field.tag_name())),
        );
        args
    }

    /// Turn exiftool's JSON (an array with one object per file) into a map
    pub(crate) fn parse_output(path: &Path, stdout: &[u8]) -> Result<MetadataMap, MetadataError> {
        let entries: Vec<HashMap<String, Value>> =
            serde_json::from_slice(stdout).map_err(|e| MetadataError::Parse {
                path: path.to_path_buf(),
                reason: format!("invalid exiftool output: {}", e),
            })?;

        let tags = entries.into_iter().next().ok_or_else(|| MetadataError::Parse {
            path: path.to_path_buf(),
            reason: "exiftool returned no entries".to_string(),
        })?;

        let mut metadata = MetadataMap::new();
        for (name, value) in tags {
            let Some(field) = MetadataField::from_tag_name(&name) else {
                continue;
            };
            let raw = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            metadata.insert(field, MetadataValue::from_raw(field, raw));
        }

        Ok(metadata)
    }
}

impl Default for ExifToolProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for ExifToolProvider {
    fn name(&self) -> &str {
        "exiftool"
    }

    fn extract(&self, path: &Path) -> Result<MetadataMap, MetadataError> {
        debug!(binary = %self.binary.display(), path = %path.display(), "running exiftool");

        let output = Command::new(&self.binary)
            .args(Self::arguments())
            .arg(path)
            .output()
            .map_err(|source| {
                if source.kind() == ErrorKind::NotFound {
                    MetadataError::ToolUnavailable {
                        tool: self.tool_name(),
                    }
                } else {
                    MetadataError::Read {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;

        // exiftool exits non-zero for minor warnings but still prints JSON
        if output.stdout.is_empty() {
            return Err(MetadataError::ToolFailed {
                tool: self.tool_name(),
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Self::parse_output(path, &output.stdout)
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-ver")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
