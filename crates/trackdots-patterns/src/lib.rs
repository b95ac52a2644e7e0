//! Printer tracking-dot patterns: definitions, alignment search, validation,
//! decoding and anonymization masks.
//!
//! The crate works on binary grids that an extractor has already cut out of a
//! scanned page. It does **not** look at images.
//!
//! ```
//! use trackdots_patterns::{Aligner, Field, PatternId, Tdm};
//!
//! let mut tdm = Tdm::blank(PatternId::Four);
//! tdm.set(Field::Raw, &"0".repeat(28)).unwrap();
//! tdm.set(Field::Minutes, "55").unwrap();
//! tdm.set(Field::Hour, "15").unwrap();
//! tdm.set(Field::Day, "12").unwrap();
//! tdm.set(Field::Month, "6").unwrap();
//! tdm.set(Field::Year, "18").unwrap();
//! assert!(tdm.check());
//!
//! let page = tdm.materialize();
//! let found = Aligner::new(PatternId::Four).align(&page, None).unwrap();
//! assert!(found.contains(&tdm));
//! ```

mod builtins;
mod error;
mod family;
mod field;
mod mask;
mod pattern;
mod record;
mod search;
mod tdm;

pub use error::{DecodeError, FieldError, MaskError, ParsePatternError};
pub use field::Field;
pub use mask::{AnonymizationMask, MaskKind};
pub use pattern::{Cell, Layout, MinCount, PatternDefinition, PatternId};
pub use record::{DecodedRecord, FieldValue};
pub use search::{materialize, Aligner};
pub use tdm::Tdm;

pub use trackdots_core::{BitGrid, GridError, RegionMeta, Transformation};
