//! # Media Organizer
//!
//! Copies photos and movies from a source tree into `dst/<year>/`, named by
//! capture time.
//!
//! ## Core Philosophy
//! - **Never overwrite** - every copy lands on a fresh, collision-free name
//! - **Never touch the source** - files are copied, not moved
//! - **Decide before writing** - the GPS policy runs before any directory is created
//!
//! ## Architecture
//! The library is split into a core engine (terminal-agnostic) and the CLI:
//! - `core` - Scanning, metadata, GPS policy, planning, copying
//! - `events` - Event-driven progress reporting
//! - `error` - User-friendly error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

/// Initialize tracing for the library
///
/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `error`; user-facing
/// warnings are rendered from events instead). Calling this twice is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
