//! # Photo EXIF Stats
//!
//! Scans a photo library, extracts camera/lens/exposure metadata through the
//! external `exiftool` program, and summarizes shooting habits: which cameras
//! and lenses get used, at which focal lengths and ISOs, and how that shifts
//! over time.
//!
//! ## Core Philosophy
//! - **One bad file never kills a scan** - every per-file and per-tag failure
//!   is recovered locally and surfaced as a warning
//! - **Comparable focal lengths** - physical focal lengths are corrected to
//!   their 35mm equivalent so a phone and a full-frame body share one axis
//! - **Inspectable, versioned snapshots** - the record cache is a tagged JSON
//!   document that fails loudly on schema drift instead of decoding garbage
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - scanning, extraction, normalization, snapshotting, reporting
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - user-friendly error types
//! - `cli` - command-line interface (in the `photo-stats` binary)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PhotoStatsError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
