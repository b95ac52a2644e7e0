//! High-level facade crate for the `trackdots-*` workspace.
//!
//! This crate provides:
//! - re-exports of the grid types and the pattern crate,
//! - a page scanner that searches every extracted region for every selected
//!   pattern, validates the aligned instances and majority-votes them,
//! - anonymization of an accepted reading.
//!
//! ## Quickstart
//!
//! ```
//! use trackdots::{LogConfig, PageRegion, PageScanner, ScanParams};
//! use trackdots::patterns::{Field, PatternId, Tdm};
//! use trackdots::core::RegionMeta;
//!
//! // Route the scanner's `log` records (or `tracing` spans) to stderr.
//! trackdots::init_logging(&LogConfig::default()).unwrap();
//!
//! let mut tdm = Tdm::blank(PatternId::Four);
//! tdm.set(Field::Raw, &"0".repeat(28)).unwrap();
//! for (field, value) in [
//!     (Field::Year, "18"),
//!     (Field::Month, "6"),
//!     (Field::Day, "12"),
//!     (Field::Hour, "15"),
//!     (Field::Minutes, "55"),
//! ] {
//!     tdm.set(field, value).unwrap();
//! }
//! let region = PageRegion::from_bits(RegionMeta::default(), &tdm.materialize());
//!
//! let scanner = PageScanner::new(ScanParams::default()).unwrap();
//! let report = scanner.scan(&[region]);
//! let best = report.best().expect("accepted reading");
//! assert_eq!(best.pattern, PatternId::Four);
//! ```
//!
//! ## API map
//! - `trackdots::core`: binary grids, transformations, region metadata.
//! - [`init_logging`]: stderr `log` output, or a `tracing-subscriber`
//!   pipeline with the `tracing` feature.
//! - `trackdots::patterns`: pattern definitions, alignment, validation,
//!   decoding, family-4 fields and masks.
//! - [`PageScanner`]: page-level search, voting and anonymization.

pub use trackdots_core as core;
pub use trackdots_patterns as patterns;

pub use trackdots_core::{
    init_logging, BitGrid, ExtractedCell, ExtractedGrid, LogConfig, LogFormat, LogInitError,
    RegionMeta,
};
pub use trackdots_patterns::{DecodedRecord, MaskKind, MinCount, PatternId, Tdm};

mod error;
mod params;
mod region;
mod report;
mod scan;
mod vote;

pub use error::{AnonymizeError, ScanConfigError};
pub use params::ScanParams;
pub use region::PageRegion;
pub use report::{PageScanReport, PatternReading};
pub use scan::{Anonymized, PageScanner};
pub use vote::{majority, VoteOutcome};
