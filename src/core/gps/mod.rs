//! # GPS Module
//!
//! Run-level policy on photos without GPS coordinates.
//!
//! The gate runs once, after metadata is resolved and before anything is
//! written. Movies never trip it.

use crate::core::media::MediaRecord;
use crate::core::metadata::MetadataProviders;
use crate::core::organize::RunConfig;
use crate::error::MetadataError;
use crate::events::{Event, EventSender, GpsEvent};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Proceed,
    Abort,
}

/// Asks the user a yes/no question
pub trait ConfirmPrompt {
    /// `default` is the answer used when the user just presses enter
    fn confirm(&mut self, question: &str, default: bool) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str, bool) -> bool,
{
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        self(question, default)
    }
}

/// Always answers with the question's default
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnswer;

impl ConfirmPrompt for DefaultAnswer {
    fn confirm(&mut self, _question: &str, default: bool) -> bool {
        default
    }
}

pub const CONTINUE_QUESTION: &str = "Do you want to continue?";

/// `"1 photo is missing gps data"` / `"N photos are missing gps data"`
pub fn missing_gps_message(count: usize) -> String {
    if count == 1 {
        "1 photo is missing gps data".to_string()
    } else {
        format!("{} photos are missing gps data", count)
    }
}

/// The GPS policy gate
pub struct GpsGate<'a> {
    providers: &'a MetadataProviders,
    config: &'a RunConfig,
}

impl<'a> GpsGate<'a> {
    pub fn new(providers: &'a MetadataProviders, config: &'a RunConfig) -> Self {
        Self { providers, config }
    }

    /// Paths of records without GPS, in record order
    pub fn missing(&self, records: &[MediaRecord]) -> Result<Vec<PathBuf>, MetadataError> {
        let mut missing = Vec::new();
        for record in records {
            if !record.has_gps(self.providers)? {
                missing.push(record.path().to_path_buf());
            }
        }
        Ok(missing)
    }

    /// Decide whether the run may touch the destination
    pub fn check(
        &self,
        records: &[MediaRecord],
        prompt: &mut dyn ConfirmPrompt,
        events: &EventSender,
    ) -> Result<GateDecision, MetadataError> {
        let missing = self.missing(records)?;
        let decision = self.decide(&missing, prompt, events);

        events.send(Event::Gps(GpsEvent::Decided { decision }));
        Ok(decision)
    }

    fn decide(
        &self,
        missing: &[PathBuf],
        prompt: &mut dyn ConfirmPrompt,
        events: &EventSender,
    ) -> GateDecision {
        if missing.is_empty() {
            return GateDecision::Proceed;
        }

        let message = missing_gps_message(missing.len());
        warn!(count = missing.len(), "{}", message);
        events.send(Event::Gps(GpsEvent::MissingGps {
            count: missing.len(),
            message,
        }));

        if self.config.is_verbose() {
            for path in missing {
                events.send(Event::Gps(GpsEvent::MissingFile { path: path.clone() }));
            }
        }

        if self.config.enforce_gps {
            info!("gps data enforced, aborting");
            return GateDecision::Abort;
        }

        if prompt.confirm(CONTINUE_QUESTION, false) {
            GateDecision::Proceed
        } else {
            GateDecision::Abort
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{InMemoryProvider, MetadataField, MetadataMap, MetadataValue};
    use crate::events::{null_sender, EventChannel};

    fn tagged() -> MetadataMap {
        MetadataMap::new().with(MetadataField::GpsLatitude, MetadataValue::text("52 deg 22' 12\" N"))
    }

    fn providers() -> MetadataProviders {
        MetadataProviders::new(
            Box::new(
                InMemoryProvider::new()
                    .with("/src/a.jpg", tagged())
                    .with("/src/c.jpg", tagged()),
            ),
            Box::new(InMemoryProvider::new()),
        )
    }

    fn records() -> Vec<MediaRecord> {
        ["/src/a.jpg", "/src/b.jpg", "/src/c.jpg", "/src/d.mov"]
            .into_iter()
            .filter_map(MediaRecord::from_path)
            .collect()
    }

    fn config(enforce_gps: bool, verbose: bool) -> RunConfig {
        RunConfig {
            enforce_gps,
            verbose,
            ..RunConfig::default()
        }
    }

    #[test]
    fn message_is_pluralized() {
        assert_eq!(missing_gps_message(1), "1 photo is missing gps data");
        assert_eq!(missing_gps_message(3), "3 photos are missing gps data");
    }

    #[test]
    fn all_tagged_proceeds_without_prompting() {
        let providers = providers();
        let config = config(true, false);
        let records: Vec<_> = records().into_iter().filter(|r| r.path().to_str() != Some("/src/b.jpg")).collect();

        let mut asked = false;
        let mut prompt = |_: &str, _: bool| {
            asked = true;
            true
        };
        let decision = GpsGate::new(&providers, &config)
            .check(&records, &mut prompt, &null_sender())
            .unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert!(!asked);
    }

    #[test]
    fn enforced_gate_aborts_without_prompting() {
        let providers = providers();
        let config = config(true, false);

        let mut asked = false;
        let mut prompt = |_: &str, _: bool| {
            asked = true;
            true
        };
        let decision = GpsGate::new(&providers, &config)
            .check(&records(), &mut prompt, &null_sender())
            .unwrap();

        assert_eq!(decision, GateDecision::Abort);
        assert!(!asked);
    }

    #[test]
    fn unenforced_gate_asks_with_default_no() {
        let providers = providers();
        let config = config(false, false);

        let mut seen = None;
        let mut prompt = |question: &str, default: bool| {
            seen = Some((question.to_string(), default));
            true
        };
        let decision = GpsGate::new(&providers, &config)
            .check(&records(), &mut prompt, &null_sender())
            .unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(seen, Some((CONTINUE_QUESTION.to_string(), false)));

        let decision = GpsGate::new(&providers, &config)
            .check(&records(), &mut DefaultAnswer, &null_sender())
            .unwrap();
        assert_eq!(decision, GateDecision::Abort);
    }

    #[test]
    fn verbose_lists_each_missing_file() {
        let providers = providers();
        let config = config(true, true);
        let (sender, receiver) = EventChannel::new();

        GpsGate::new(&providers, &config)
            .check(&records(), &mut DefaultAnswer, &sender)
            .unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            &events[0],
            Event::Gps(GpsEvent::MissingGps { count: 1, message }) if message == "1 photo is missing gps data"
        ));
        assert!(matches!(
            &events[1],
            Event::Gps(GpsEvent::MissingFile { path }) if path == &PathBuf::from("/src/b.jpg")
        ));
        assert!(matches!(
            &events[2],
            Event::Gps(GpsEvent::Decided { decision: GateDecision::Abort })
        ));
    }

    #[test]
    fn quiet_run_does_not_list_files() {
        let providers = providers();
        let config = config(true, false);
        let (sender, receiver) = EventChannel::new();

        GpsGate::new(&providers, &config)
            .check(&records(), &mut DefaultAnswer, &sender)
            .unwrap();
        drop(sender);

        assert!(!receiver
            .iter()
            .any(|e| matches!(e, Event::Gps(GpsEvent::MissingFile { .. }))));
    }
}
