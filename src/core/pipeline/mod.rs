//! # Pipeline Module
//!
//! Orchestrates a full organizer run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover media in the source tree
//! 2. **Metadata** - Resolve capture time and GPS presence per file
//! 3. **GPS gate** - Abort, ask, or proceed when photos lack GPS
//! 4. **Plan** - Group by year and pick collision-free names
//! 5. **Copy** - Create year directories and copy
//!
//! ## Parallelism
//! Metadata is prefetched on the rayon pool; everything after that is
//! sequential in scan order so naming stays deterministic.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig};
