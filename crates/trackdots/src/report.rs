use serde::{Deserialize, Serialize};

use trackdots_patterns::{DecodedRecord, PatternId, Tdm};

use crate::vote::VoteOutcome;

/// Search and vote result for one pattern over the whole page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternReading {
    pub pattern: PatternId,
    /// Regions with the pattern's grid shape.
    pub regions_searched: usize,
    /// Aligned instances over all regions.
    pub aligned: usize,
    /// Aligned instances passing validation.
    pub valid: usize,
    pub outcome: VoteOutcome,
    /// Decoded fields of the accepted instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<DecodedRecord>,
    /// Why the accepted instance could not be decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

impl PatternReading {
    pub fn winner(&self) -> Option<&Tdm> {
        self.outcome.winner()
    }
}

/// Everything a page scan found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScanReport {
    pub regions: usize,
    /// Regions dropped before search (ambiguous cells or no dot).
    pub skipped_regions: usize,
    pub readings: Vec<PatternReading>,
}

impl PageScanReport {
    /// The accepted reading backed by the most valid instances.
    ///
    /// Ties go to the pattern scanned first.
    pub fn best(&self) -> Option<&PatternReading> {
        let mut best: Option<&PatternReading> = None;
        for r in self.readings.iter().filter(|r| r.outcome.is_accepted()) {
            if best.map_or(true, |b| r.valid > b.valid) {
                best = Some(r);
            }
        }
        best
    }

    pub fn reading(&self, pattern: PatternId) -> Option<&PatternReading> {
        self.readings.iter().find(|r| r.pattern == pattern)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
