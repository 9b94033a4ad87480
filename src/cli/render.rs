//! Terminal rendering of pipeline events.

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_organizer::error::OrganizerError;
use media_organizer::events::{
    CopyEvent, Event, GpsEvent, MetadataEvent, PipelineEvent, PipelineSummary, ScanEvent,
};

/// Turns events into lines on the terminal
pub struct Renderer {
    term: Term,
    verbose: bool,
    progress: Option<ProgressBar>,
}

impl Renderer {
    pub fn new(term: Term, verbose: bool) -> Self {
        Self {
            term,
            verbose,
            progress: None,
        }
    }

    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::Scan(ScanEvent::Error { message, .. }) => self.warn(message),
            Event::Scan(ScanEvent::Completed { total_media }) if self.verbose => {
                self.line(&format!("Found {} media files", total_media));
            }
            Event::Metadata(MetadataEvent::Started { total }) => {
                if !self.verbose && *total > 0 {
                    self.progress = Some(metadata_bar(*total as u64));
                }
            }
            Event::Metadata(MetadataEvent::Progress(p)) => {
                if let Some(ref pb) = self.progress {
                    pb.set_position(p.completed as u64);
                }
            }
            Event::Metadata(MetadataEvent::Skipped { message, .. }) => {
                self.warn(&format!("Skipping: {}", message));
            }
            Event::Metadata(MetadataEvent::Completed { .. }) => self.finish_progress(),
            Event::Gps(GpsEvent::MissingGps { message, .. }) => self.warn(message),
            Event::Gps(GpsEvent::MissingFile { path }) => self.warn(&path.display().to_string()),
            Event::Copy(CopyEvent::DirectoryCreated { path, .. }) => {
                self.line(&format!("mkdir {}", path.display()));
            }
            Event::Copy(CopyEvent::Copying {
                source,
                destination,
                ..
            }) => {
                self.line(&format!("Copying {} -> {}", source.display(), destination.display()));
            }
            Event::Copy(CopyEvent::Failed { message, .. }) => self.error(message),
            Event::Copy(CopyEvent::DirectoryFailed { message, files, .. }) => {
                self.error(&format!("{} ({} files not copied)", message, files));
            }
            Event::Pipeline(PipelineEvent::Completed { summary }) => self.summary(summary),
            _ => {}
        }
    }

    /// Clear any progress bar before the terminal is used for input
    pub fn finish_progress(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }

    pub fn line(&self, text: &str) {
        self.write(text.to_string());
    }

    pub fn warn(&self, text: &str) {
        self.write(style(text).yellow().to_string());
    }

    pub fn error(&self, text: &str) {
        self.write(style(text).red().to_string());
    }

    fn write(&self, text: String) {
        match self.progress {
            Some(ref pb) => pb.suspend(|| {
                self.term.write_line(&text).ok();
            }),
            None => {
                self.term.write_line(&text).ok();
            }
        }
    }

    fn summary(&self, summary: &PipelineSummary) {
        // identical wording in a dry run
        self.line(&format!(
            "{} Organized {} files into {} new folders in {:.1}s",
            style("✓").green().bold(),
            style(summary.files_copied).cyan(),
            style(summary.folders_created).cyan(),
            summary.duration_ms as f64 / 1000.0
        ));

        if let (Some(earliest), Some(latest)) = (summary.earliest, summary.latest) {
            self.line(&format!(
                "  captured {} to {}",
                earliest.format("%Y-%m-%d"),
                latest.format("%Y-%m-%d")
            ));
        }
        if summary.skipped > 0 {
            self.warn(&format!("  {} files skipped (unreadable metadata)", summary.skipped));
        }
        if summary.failed > 0 {
            self.error(&format!("  {} files failed to copy", summary.failed));
        }
    }
}

fn metadata_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("Reading metadata");
    pb
}

/// User-facing text for a failed run
pub fn error_message(error: &OrganizerError) -> String {
    match error {
        OrganizerError::Argument(inner) => inner.to_string(),
        OrganizerError::GpsPolicyAbort { .. } => "Aborting".to_string(),
        other => other.to_string(),
    }
}

pub fn print_error(term: &Term, error: &OrganizerError) {
    term.write_line(&style(error_message(error)).red().to_string()).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_organizer::error::ArgumentError;
    use std::path::PathBuf;

    #[test]
    fn gps_abort_reads_aborting() {
        let error = OrganizerError::GpsPolicyAbort { missing: 2 };
        assert_eq!(error_message(&error), "Aborting");
    }

    #[test]
    fn argument_errors_are_unwrapped() {
        let error = OrganizerError::from(ArgumentError::SourceNotDirectory {
            path: PathBuf::from("/nope"),
        });
        assert_eq!(error_message(&error), "/nope is not a directory");
    }
}
