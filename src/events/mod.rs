//! # Events Module
//!
//! The core library never prints. Everything a user should see (warnings,
//! verbose copy notices, progress) is emitted as an [`Event`] through a
//! channel, and the front end decides how to render it.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Copy(CopyEvent::Copying { source, destination, .. }) = event {
//!             println!("Copying {} -> {}", source.display(), destination.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender, &mut prompt)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
