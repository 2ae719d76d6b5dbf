//! # photo-stats CLI
//!
//! Command-line interface for the photo statistics pipeline.
//!
//! ## Usage
//! ```bash
//! photo-stats scan ~/Pictures/originals
//! photo-stats scan --cached --output json
//! ```

mod cli;

use photo_exif_stats::Result;

fn main() -> Result<()> {
    photo_exif_stats::init_tracing();
    cli::run()
}
