//! Pipeline execution implementation.

use crate::core::gps::{ConfirmPrompt, GateDecision, GpsGate};
use crate::core::media::MediaRecord;
use crate::core::metadata::MetadataProviders;
use crate::core::organize::{
    CopyFailurePolicy, OrganizeExecutor, OrganizePlanner, OrganizeResult, RunConfig,
};
use crate::core::scanner::{MediaKind, MediaScanner, ScanConfig, WalkDirScanner};
use crate::error::{MetadataError, OrganizerError};
use crate::events::{
    null_sender, Event, EventSender, MetadataEvent, MetadataProgress, PipelineEvent,
    PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Tree to read media from
    pub source: PathBuf,
    /// Root of the `<year>/` tree
    pub destination: PathBuf,
    pub run: RunConfig,
    pub scan_config: ScanConfig,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    providers: Option<MetadataProviders>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            providers: None,
        }
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.config.destination = destination.into();
        self
    }

    /// Replace all run flags at once
    pub fn run_config(mut self, run: RunConfig) -> Self {
        self.config.run = run;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.run.verbose = verbose;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.run.dry_run = dry_run;
        self
    }

    pub fn enforce_gps(mut self, enforce: bool) -> Self {
        self.config.run.enforce_gps = enforce;
        self
    }

    pub fn copy_failure(mut self, policy: CopyFailurePolicy) -> Self {
        self.config.run.copy_failure = policy;
        self
    }

    /// Read metadata on the rayon pool (default) or one file at a time
    pub fn parallel_metadata(mut self, parallel: bool) -> Self {
        self.config.run.parallel_metadata = parallel;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Metadata providers; defaults to the EXIF reader plus `exiftool`
    pub fn providers(mut self, providers: MetadataProviders) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            providers: self.providers.unwrap_or_default(),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan, resolve, gate, plan, copy
pub struct Pipeline {
    config: PipelineConfig,
    providers: MetadataProviders,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self, prompt: &mut dyn ConfirmPrompt) -> Result<OrganizeResult, OrganizerError> {
        self.run_with_events(&null_sender(), prompt)
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
        prompt: &mut dyn ConfirmPrompt,
    ) -> Result<OrganizeResult, OrganizerError> {
        let start_time = Instant::now();
        let run = &self.config.run;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        self.enter(PipelinePhase::Scanning, events);
        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.source, events)?;
        for error in &scan_result.errors {
            warn!(error = %error, "scan error");
        }

        let media = scan_result.media;
        if media.iter().any(|m| m.kind() == MediaKind::Movie) {
            self.require_provider(MediaKind::Movie)?;
        }

        // Phase 2: Metadata
        self.enter(PipelinePhase::ReadingMetadata, events);
        let (records, skipped) = self.resolve_metadata(media, events)?;

        // Phase 3: GPS gate, before anything is written
        self.enter(PipelinePhase::CheckingGps, events);
        let gate = GpsGate::new(&self.providers, run);
        if gate.check(&records, prompt, events)? == GateDecision::Abort {
            let missing = gate.missing(&records)?.len();
            let error = OrganizerError::GpsPolicyAbort { missing };
            events.send(Event::Pipeline(PipelineEvent::Aborted {
                reason: error.to_string(),
            }));
            return Err(error);
        }

        // Phase 4: Planning
        self.enter(PipelinePhase::Planning, events);
        let plan = OrganizePlanner::new(&self.config.destination, &self.providers).plan(&records)?;

        // Phase 5: Copying
        self.enter(PipelinePhase::Copying, events);
        let mut result = OrganizeExecutor::new(run, events).execute(&plan)?;
        result.skipped = skipped;
        result.duration_ms = start_time.elapsed().as_millis() as u64;

        let (earliest, latest) = match plan.date_range() {
            Some((earliest, latest)) => (Some(earliest), Some(latest)),
            None => (None, None),
        };
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                files_copied: result.files_copied,
                folders_created: result.folders_created,
                skipped: result.skipped,
                failed: result.failed,
                dry_run: result.dry_run,
                earliest,
                latest,
                duration_ms: result.duration_ms,
            },
        }));
        info!(
            copied = result.files_copied,
            skipped = result.skipped,
            failed = result.failed,
            duration_ms = result.duration_ms,
            "organize complete"
        );

        Ok(result)
    }

    fn enter(&self, phase: PipelinePhase, events: &EventSender) {
        info!(phase = %phase, "pipeline phase");
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    fn require_provider(&self, kind: MediaKind) -> Result<(), MetadataError> {
        let provider = self.providers.for_kind(kind);
        if provider.is_available() {
            Ok(())
        } else {
            Err(MetadataError::ToolUnavailable {
                tool: provider.name().to_string(),
            })
        }
    }

    /// Resolve capture time and GPS for every record, dropping the unreadable
    /// ones. Order is preserved. A missing tool is fatal.
    fn resolve_metadata(
        &self,
        media: Vec<MediaRecord>,
        events: &EventSender,
    ) -> Result<(Vec<MediaRecord>, usize), MetadataError> {
        let total = media.len();
        events.send(Event::Metadata(MetadataEvent::Started { total }));

        let completed = AtomicUsize::new(0);
        let resolve_one = |record: &MediaRecord| {
            let outcome = record.resolve(&self.providers);
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            events.send(Event::Metadata(MetadataEvent::Progress(MetadataProgress {
                completed: done,
                total,
                current_path: record.path().to_path_buf(),
            })));
            outcome
        };

        let outcomes: Vec<Result<(), MetadataError>> = if self.config.run.parallel_metadata {
            media.par_iter().map(resolve_one).collect()
        } else {
            media.iter().map(resolve_one).collect()
        };

        let mut records = Vec::with_capacity(total);
        let mut skipped = 0;
        for (record, outcome) in media.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => records.push(record),
                Err(e @ MetadataError::ToolUnavailable { .. }) => return Err(e),
                Err(e) => {
                    warn!(path = %record.path().display(), error = %e, "skipping file");
                    events.send(Event::Metadata(MetadataEvent::Skipped {
                        path: record.path().to_path_buf(),
                        message: e.to_string(),
                    }));
                    skipped += 1;
                }
            }
        }

        events.send(Event::Metadata(MetadataEvent::Completed {
            resolved: records.len(),
            skipped,
        }));
        Ok((records, skipped))
    }
}
