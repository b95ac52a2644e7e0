use serde::{Deserialize, Serialize};

use trackdots_core::{BitGrid, ExtractedGrid, RegionMeta};

/// One grid region cut out of a scanned page by the dot extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRegion {
    pub meta: RegionMeta,
    pub grid: ExtractedGrid,
}

impl PageRegion {
    pub fn new(meta: RegionMeta, grid: ExtractedGrid) -> Self {
        Self { meta, grid }
    }

    /// Region from an already binary grid.
    pub fn from_bits(meta: RegionMeta, bits: &BitGrid) -> Self {
        Self::new(meta, ExtractedGrid::from_bits(bits))
    }
}
