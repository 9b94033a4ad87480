//! # organize CLI
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! organize /Volumes/SDCARD/DCIM ~/Pictures/Library
//! organize --dry-run --no-enforce-gps ~/Downloads/phone ~/Pictures/Library
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
