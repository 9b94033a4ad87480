//! Executor for organization plans.

use super::types::*;
use crate::error::CopyError;
use crate::events::{CopyEvent, Event, EventSender};
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Creates year directories and copies files according to a plan
pub struct OrganizeExecutor<'a> {
    config: &'a RunConfig,
    events: &'a EventSender,
}

impl<'a> OrganizeExecutor<'a> {
    pub fn new(config: &'a RunConfig, events: &'a EventSender) -> Self {
        Self { config, events }
    }

    /// Execute the plan, year by year in ascending order
    pub fn execute(&self, plan: &DestinationPlan) -> Result<OrganizeResult, CopyError> {
        let start = Instant::now();
        let mut result = OrganizeResult {
            dry_run: self.config.dry_run,
            ..OrganizeResult::default()
        };

        for (year, copies) in plan.iter() {
            let year_dir = plan.year_dir(year);

            if !year_dir.is_dir() {
                match self.create_year_dir(&year_dir) {
                    Ok(()) => result.folders_created += 1,
                    Err(e) => {
                        let failure = CopyEvent::DirectoryFailed {
                            path: year_dir.clone(),
                            files: copies.len(),
                            message: e.to_string(),
                        };
                        self.handle_failure(e, failure, &mut result)?;
                        result.failed += copies.len().saturating_sub(1);
                        continue;
                    }
                }
            }

            for copy in copies {
                match self.copy(&copy.source, &copy.destination) {
                    Ok(()) => result.files_copied += 1,
                    Err(e) => {
                        let failure = CopyEvent::Failed {
                            source: copy.source.clone(),
                            destination: copy.destination.clone(),
                            message: e.to_string(),
                        };
                        self.handle_failure(e, failure, &mut result)?;
                    }
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        Ok(result)
    }

    fn create_year_dir(&self, path: &Path) -> Result<(), CopyError> {
        if self.config.is_verbose() {
            self.events.send(Event::Copy(CopyEvent::DirectoryCreated {
                path: path.to_path_buf(),
                dry_run: self.config.dry_run,
            }));
        }
        if self.config.dry_run {
            return Ok(());
        }

        debug!(path = %path.display(), "creating year directory");
        fs::create_dir_all(path).map_err(|source| CopyError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Copy one file, announcing it first when verbose
    pub fn copy(&self, source: &Path, destination: &Path) -> Result<(), CopyError> {
        if self.config.is_verbose() {
            self.events.send(Event::Copy(CopyEvent::Copying {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                dry_run: self.config.dry_run,
            }));
        }
        if self.config.dry_run {
            return Ok(());
        }

        copy_preserving(source, destination)
    }

    /// Abort with `error`, or report `failure` and count it
    fn handle_failure(
        &self,
        error: CopyError,
        failure: CopyEvent,
        result: &mut OrganizeResult,
    ) -> Result<(), CopyError> {
        match self.config.copy_failure {
            CopyFailurePolicy::Abort => Err(error),
            CopyFailurePolicy::Continue => {
                warn!(error = %error, "copy failed, continuing");
                self.events.send(Event::Copy(failure));
                result.failed += 1;
                result.errors.push(error.to_string());
                Ok(())
            }
        }
    }
}

/// Copy `source` to a destination that must not exist yet, then carry over
/// permissions and access/modification times.
pub fn copy_preserving(source: &Path, destination: &Path) -> Result<(), CopyError> {
    let copy_error = |source_err: io::Error| CopyError::Copy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: source_err,
    };

    let metadata = fs::metadata(source).map_err(copy_error)?;
    let mut reader = File::open(source).map_err(copy_error)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(copy_error)?;

    let copied = io::copy(&mut reader, &mut writer).map(|_| ());
    drop(writer);
    remove_on_error(destination, copied).map_err(copy_error)?;

    let attribute_error = |source_err: io::Error| CopyError::PreserveAttributes {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: source_err,
    };

    // times before permissions: a read-only target may refuse timestamp updates
    let preserved = filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .and_then(|()| fs::set_permissions(destination, metadata.permissions()));

    remove_on_error(destination, preserved).map_err(attribute_error)
}

/// Delete the destination created by `copy_preserving` when a later step failed
fn remove_on_error(destination: &Path, outcome: io::Result<()>) -> io::Result<()> {
    if outcome.is_err() {
        // the file is ours, created above
        let _ = fs::remove_file(destination);
    }
    outcome
}
