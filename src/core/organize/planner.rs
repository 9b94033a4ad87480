//! Plan generator for organization runs.

use super::namer::DestinationNamer;
use super::types::*;
use crate::core::media::MediaRecord;
use crate::core::metadata::MetadataProviders;
use crate::error::MetadataError;
use chrono::Datelike;
use std::path::Path;
use tracing::debug;

/// Groups records by capture year and names their destinations
pub struct OrganizePlanner<'a> {
    destination: &'a Path,
    providers: &'a MetadataProviders,
}

impl<'a> OrganizePlanner<'a> {
    pub fn new(destination: &'a Path, providers: &'a MetadataProviders) -> Self {
        Self {
            destination,
            providers,
        }
    }

    /// Build the plan. Records are named in the order given.
    pub fn plan(&self, records: &[MediaRecord]) -> Result<DestinationPlan, MetadataError> {
        let mut plan = DestinationPlan::new(self.destination);
        let mut namer = DestinationNamer::new();

        for record in records {
            let capture = record.capture(self.providers)?;
            let year = capture.time.year();
            let year_dir = plan.year_dir(year);

            let file_name = namer.next_available_name(&year_dir, capture.time, &record.extension());
            debug!(
                source = %record.path().display(),
                name = %file_name,
                capture_source = ?capture.source,
                "planned copy"
            );

            plan.push(
                year,
                PlannedCopy {
                    source: record.path().to_path_buf(),
                    destination: year_dir.join(file_name),
                    capture_time: capture.time,
                },
            );
        }

        Ok(plan)
    }
}
