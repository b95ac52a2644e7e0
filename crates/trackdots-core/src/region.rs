//! Page-region inputs delivered by the (external) dot-grid extractor.

use serde::{Deserialize, Serialize};

use crate::grid::{BitGrid, GridError};

/// Pixel offsets of a grid region on the scanned page.
///
/// Only their sum is meaningful here; the individual terms are carried
/// through for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionMeta {
    pub crop_x: i64,
    pub crop_y: i64,
    pub grid_x: i64,
    pub grid_y: i64,
    pub cell_x: i64,
    pub cell_y: i64,
    pub subcell_x: i64,
    pub subcell_y: i64,
}

impl RegionMeta {
    /// Absolute `[x, y]` pixel position of the region.
    pub fn position(&self) -> [i64; 2] {
        [
            self.crop_x + self.grid_x + self.cell_x + self.subcell_x,
            self.crop_y + self.grid_y + self.cell_y + self.subcell_y,
        ]
    }
}

/// One cell as reported by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedCell {
    Empty,
    Dot,
    /// Half-confidence pixel; the region cannot be trusted.
    Ambiguous,
}

/// Quantized extractor output for one region, before the binary precondition
/// has been checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<ExtractedCell>,
}

impl ExtractedGrid {
    pub fn from_bits(grid: &BitGrid) -> Self {
        let cells = grid
            .as_bytes()
            .iter()
            .map(|&v| {
                if v == 1 {
                    ExtractedCell::Dot
                } else {
                    ExtractedCell::Empty
                }
            })
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
        }
    }

    pub fn has_ambiguous(&self) -> bool {
        self.cells.contains(&ExtractedCell::Ambiguous)
    }

    pub fn has_dot(&self) -> bool {
        self.cells.contains(&ExtractedCell::Dot)
    }

    /// Binary grid, or `None` when the region is not eligible for search
    /// (any ambiguous cell, or no dot at all).
    pub fn to_bit_grid(&self) -> Result<Option<BitGrid>, GridError> {
        if self.has_ambiguous() || !self.has_dot() {
            return Ok(None);
        }
        let data = self
            .cells
            .iter()
            .map(|c| u8::from(*c == ExtractedCell::Dot))
            .collect();
        BitGrid::from_vec(self.rows, self.cols, data).map(Some)
    }
}
