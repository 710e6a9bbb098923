//! sweep-ingest - batch ticket ingestion from a camera image drop
//!
//! Parses `{camera}_s{severity}.png` filenames, joins them against the
//! open-data camera catalog, uploads the frames, and writes tickets through
//! the server's repository. Safe to re-run: already ingested files are
//! detected by their dedup key and skipped.

pub mod catalog;
pub mod filename;
pub mod job;

pub use catalog::{Camera, CameraCatalog};
pub use filename::{ParseError, ParsedName, parse_filename};
pub use job::{IngestJob, IngestStats};
