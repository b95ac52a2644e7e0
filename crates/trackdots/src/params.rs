use serde::{Deserialize, Serialize};

use trackdots_patterns::{MinCount, PatternId};

use crate::error::ScanConfigError;

/// Configuration for a page scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Patterns searched on every region, in report order.
    pub patterns: Vec<PatternId>,
    /// Replaces each pattern's own `min_count` when set.
    pub min_count: Option<MinCount>,
    /// Search regions in parallel. Ignored without the `rayon` feature.
    pub parallel: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            patterns: PatternId::ALL.to_vec(),
            min_count: None,
            parallel: true,
        }
    }
}

impl ScanParams {
    /// Parse from JSON; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ScanConfigError> {
        let params: ScanParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_string(&self) -> Result<String, ScanConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ScanConfigError> {
        if self.patterns.is_empty() {
            return Err(ScanConfigError::NoPatterns);
        }
        if self.min_count == Some(MinCount::AtLeast(0)) {
            return Err(ScanConfigError::ZeroMinCount);
        }
        Ok(())
    }

    /// Effective vote threshold for `pattern`.
    pub fn min_count_for(&self, pattern: PatternId) -> MinCount {
        self.min_count
            .unwrap_or_else(|| pattern.definition().min_count)
    }
}
