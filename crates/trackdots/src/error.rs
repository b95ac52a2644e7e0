use trackdots_patterns::{MaskError, PatternId};

/// Errors returned when building a scanner from its parameters.
#[derive(thiserror::Error, Debug)]
pub enum ScanConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("no pattern selected")]
    NoPatterns,
    #[error("min_count must be at least 1")]
    ZeroMinCount,
}

/// Errors returned by [`crate::PageScanner::anonymize`].
#[derive(thiserror::Error, Debug)]
pub enum AnonymizeError {
    #[error("pattern {pattern} has no accepted reading")]
    NoAcceptedReading { pattern: PatternId },
    #[error(transparent)]
    Mask(#[from] MaskError),
}
