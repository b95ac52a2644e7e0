use trackdots_core::GridError;

use crate::field::Field;
use crate::pattern::PatternId;

/// Unknown pattern name or number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pattern {0:?}")]
pub struct ParsePatternError(pub String);

/// Errors returned while decoding an aligned grid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("pattern {pattern} failed validation")]
    ValidationFailed { pattern: PatternId },
    #[error("block {block}, word {word} is not a one-hot code")]
    InvalidCodeWord { block: usize, word: usize },
    #[error(
        "decoded date {year:04}-{month:02}-{day:02} {hour:02}:{minute:02} is not a valid calendar time"
    )]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },
}

/// Errors returned by named-field access.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("pattern {pattern} has no named fields")]
    UnsupportedPattern { pattern: PatternId },
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("invalid value {value:?} for field {field}: {reason}")]
    InvalidFieldValue {
        field: Field,
        value: String,
        reason: String,
    },
    #[error("{0:?} is not a known manufacturer")]
    UnknownManufacturer(String),
}

/// Errors returned by mask generation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("{context}: {needed} new dot(s) required but only {available} empty candidate cell(s)")]
    InsufficientCapacity {
        context: String,
        needed: usize,
        available: usize,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
