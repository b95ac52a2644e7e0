//! Anonymization overlays.

use serde::{Deserialize, Serialize};

use trackdots_core::{BitGrid, GridError};

use crate::pattern::PatternId;
use crate::tdm::Tdm;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskKind {
    /// Every empty codebit.
    Full,
    /// A few dots per code word, chosen to make the code ambiguous.
    Strategic,
}

/// Extra dots to print on top of an aligned instance.
///
/// Shares the prototype shape of the instance it was generated for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationMask {
    pattern: PatternId,
    kind: MaskKind,
    bits: BitGrid,
}

impl AnonymizationMask {
    pub(crate) fn new(pattern: PatternId, kind: MaskKind, bits: BitGrid) -> Self {
        Self {
            pattern,
            kind,
            bits,
        }
    }

    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    pub fn kind(&self) -> MaskKind {
        self.kind
    }

    pub fn bits(&self) -> &BitGrid {
        &self.bits
    }

    /// Union with `tdm`, keeping its transformation and position.
    pub fn apply(&self, tdm: &Tdm) -> Result<Tdm, GridError> {
        let merged = tdm.bits().or(&self.bits)?;
        tdm.with_bits(&merged)
    }
}
