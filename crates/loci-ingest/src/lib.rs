//! Loci Ingest Library
//!
//! Streams a 3DTS locus score file (tab-delimited, 9 columns) into normalized
//! records keyed by genomic identifier, ready for an aggregation sink.
//!
//! # Modules
//!
//! - [`config`]: parser configuration (source tag, file name, delimiter)
//! - [`models`]: output records and their document serialization
//! - [`parser`]: per-line classification into record or skip reason
//! - [`reader`]: the lazy record iterator and file helpers
//! - [`progress`]: progress and ETA logging
//! - [`channel`]: bounded-channel adapter for async consumers
//!
//! # Example
//!
//! ```no_run
//! use loci_ingest::{load_data, ParserConfig};
//!
//! fn main() -> loci_common::Result<()> {
//!     let config = ParserConfig::default();
//!     let mut records = load_data("./data/3dts", &config)?;
//!
//!     for record in records.by_ref() {
//!         let record = record?;
//!         println!("{}", record.id);
//!     }
//!
//!     let summary = records.into_summary();
//!     println!("{} skipped", summary.skip_count());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod models;
pub mod parser;
pub mod progress;
pub mod reader;

pub use config::{ParserConfig, DATA_VERSION};
pub use models::{LocusAnnotation, LocusRecord, ScoreEntry};
pub use parser::{LineOutcome, LineParser, SkipReason};
pub use reader::{load_data, LocusRecords, ParseSummary, SkippedLine};
