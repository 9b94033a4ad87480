//! Pipeline-to-front-end event plumbing over crossbeam-channel.
//!
//! The pipeline runs on a worker thread (metadata reads fan out further onto
//! rayon), while the CLI renders on the main thread and waits on events and
//! prompt requests at once with `select!`.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sending half handed to the pipeline; clones share one channel
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Fire and forget. Nobody listening is not an error.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receiving half owned by the front end
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Next queued event, if one is already waiting
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Events in send order until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    pub fn as_receiver(&self) -> &Receiver<Event> {
        &self.inner
    }
}

pub struct EventChannel;

impl EventChannel {
    /// An unbounded channel; sends never block
    pub fn new() -> (EventSender, EventReceiver) {
        let (inner_tx, inner_rx) = unbounded();
        (EventSender { inner: inner_tx }, EventReceiver { inner: inner_rx })
    }
}

/// Sender whose receiver is already gone, for runs nobody watches
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CopyEvent, PipelineEvent, ScanEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn worker_events_reach_the_front_end() {
        let (sender, receiver) = EventChannel::new();

        let worker = thread::spawn(move || {
            sender.send(Event::Scan(ScanEvent::Completed { total_media: 7 }));
        });
        worker.join().unwrap();

        let events: Vec<Event> = receiver.iter().collect();
        assert!(matches!(
            events.as_slice(),
            [Event::Scan(ScanEvent::Completed { total_media: 7 })]
        ));
    }

    #[test]
    fn try_recv_drains_without_blocking() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Pipeline(PipelineEvent::Started));
        sender.send(Event::Copy(CopyEvent::DirectoryCreated {
            path: PathBuf::from("/dst/2020"),
            dry_run: false,
        }));

        assert!(matches!(receiver.try_recv(), Some(Event::Pipeline(PipelineEvent::Started))));
        assert!(matches!(receiver.try_recv(), Some(Event::Copy(_))));
        // sender still alive, queue empty
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn sending_to_nobody_is_harmless() {
        null_sender().send(Event::Pipeline(PipelineEvent::Started));
    }
}
