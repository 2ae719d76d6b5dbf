//! # Pipeline Module
//!
//! Orchestrates the full statistics workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover photo files in the library directories
//! 2. **Extract** - Read and normalize tags, one file at a time
//! 3. **Snapshot** - Overwrite the on-disk snapshot with the fresh records
//!
//! A cached run replaces all three stages with a snapshot load; if the
//! snapshot is missing, corrupt, or from another schema version, the run
//! fails and the user rescans explicitly.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineResult};
