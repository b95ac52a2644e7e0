//! Pattern identifiers and their static geometric description.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::builtins;
use crate::error::ParsePatternError;

/// Cell coordinate `[row, col]`.
pub type Cell = [usize; 2];

/// Known tracking-dot pattern variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternId {
    /// Family 1, data rows on even prototype rows.
    #[serde(rename = "1s2")]
    One2,
    /// Family 1, data rows on odd prototype rows.
    #[serde(rename = "1s3")]
    One3,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
}

impl PatternId {
    pub const ALL: [PatternId; 5] = [
        PatternId::One2,
        PatternId::One3,
        PatternId::Two,
        PatternId::Three,
        PatternId::Four,
    ];

    /// Numeric identifier (the digits of the variant name).
    pub fn number(self) -> u32 {
        match self {
            PatternId::One2 => 12,
            PatternId::One3 => 13,
            PatternId::Two => 2,
            PatternId::Three => 3,
            PatternId::Four => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternId::One2 => "1s2",
            PatternId::One3 => "1s3",
            PatternId::Two => "2",
            PatternId::Three => "3",
            PatternId::Four => "4",
        }
    }

    pub fn from_number(number: u32) -> Option<PatternId> {
        PatternId::ALL.into_iter().find(|p| p.number() == number)
    }

    /// Static definition of this variant.
    #[inline]
    pub fn definition(self) -> &'static PatternDefinition {
        builtins::definition(self)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternId {
    type Err = ParsePatternError;

    /// Accepts the display name (`"1s2"`, `"4"`) or the numeric id (`"12"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(p) = PatternId::ALL.into_iter().find(|p| p.name() == s) {
            return Ok(p);
        }
        s.parse::<u32>()
            .ok()
            .and_then(PatternId::from_number)
            .ok_or_else(|| ParsePatternError(s.to_string()))
    }
}

/// How many equal, independently validated copies a reading needs before the
/// majority decision is trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinCount {
    /// Every valid copy on the page has to agree.
    All,
    AtLeast(usize),
}

/// Data-cell organisation of a pattern family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Family 1: data cells at `rows × cols`, every column carries even parity.
    ParityColumns { rows: Vec<usize>, cols: Vec<usize> },
    /// Family 2: blocks of four one-hot words plus one parity word,
    /// indexed `[word][position]`.
    OneHotWords { blocks: Vec<[[Cell; 4]; 5]> },
    /// Family 3: blocks of six cells holding exactly one dot each.
    OneHotBlocks { blocks: Vec<[Cell; 6]> },
    /// Family 4: eight-bit columns addressed by named fields.
    FieldColumns,
}

/// Immutable description of one pattern variant.
#[derive(Clone, Debug)]
pub struct PatternDefinition {
    pub id: PatternId,
    /// Shape of the uncollapsed grid delivered by the extractor.
    pub grid_rows: usize,
    pub grid_cols: usize,
    /// Shape of the repetition-collapsed prototype.
    pub proto_rows: usize,
    pub proto_cols: usize,
    /// Physical cell spacing in inches (row, col). Only used by the extractor.
    pub cell_pitch: [f32; 2],
    /// Offsets at which the prototype repeats inside the full grid.
    pub repetitions: Vec<Cell>,
    /// Cells that are dots in every aligned instance.
    pub markers: Vec<Cell>,
    /// Cells that are empty in every aligned instance; `None` when the
    /// pattern imposes no such requirement.
    pub empty: Option<Vec<Cell>>,
    /// Data-carrying cells.
    pub codebits: Vec<Cell>,
    pub allow_flip: bool,
    pub allow_rotation: bool,
    pub allow_upside_down: bool,
    /// Fixed rotation quadrants overriding the derived set.
    pub explicit_rotations: Option<Vec<u8>>,
    pub min_count: MinCount,
    pub layout: Layout,
}

impl PatternDefinition {
    #[inline]
    pub fn grid_shape(&self) -> [usize; 2] {
        [self.grid_rows, self.grid_cols]
    }

    #[inline]
    pub fn proto_shape(&self) -> [usize; 2] {
        [self.proto_rows, self.proto_cols]
    }

    /// Empty-cell requirement as a slice (empty when none is imposed).
    #[inline]
    pub fn empty_cells(&self) -> &[Cell] {
        self.empty.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_numbers_round_trip() {
        for p in PatternId::ALL {
            assert_eq!(p.name().parse::<PatternId>().unwrap(), p);
            assert_eq!(p.number().to_string().parse::<PatternId>().unwrap(), p);
            assert_eq!(p.definition().id, p);
        }
        assert!("5".parse::<PatternId>().is_err());
        assert!("1s4".parse::<PatternId>().is_err());
    }

    #[test]
    fn markers_are_disjoint_from_empty_and_codebits() {
        for p in PatternId::ALL {
            let def = p.definition();
            let markers: HashSet<Cell> = def.markers.iter().copied().collect();
            assert!(
                def.empty_cells().iter().all(|c| !markers.contains(c)),
                "{p}: marker listed as empty"
            );
            assert!(
                def.codebits.iter().all(|c| !markers.contains(c)),
                "{p}: marker listed as codebit"
            );
        }
    }

    #[test]
    fn cells_fit_their_grids() {
        for p in PatternId::ALL {
            let def = p.definition();
            for &[r, c] in def.markers.iter().chain(&def.codebits) {
                assert!(r < def.proto_rows && c < def.proto_cols, "{p}: ({r}, {c})");
            }
            for &[r, c] in def.empty_cells() {
                assert!(r < def.grid_rows && c < def.grid_cols, "{p}: ({r}, {c})");
            }
        }
    }

    #[test]
    fn codebit_counts() {
        let counts: Vec<usize> = PatternId::ALL
            .iter()
            .map(|p| p.definition().codebits.len())
            .collect();
        assert_eq!(counts, vec![56, 56, 160, 162, 120]);
    }

    #[test]
    fn min_count_serializes_snake_case() {
        let json = serde_json::to_string(&MinCount::AtLeast(2)).unwrap();
        assert_eq!(json, r#"{"at_least":2}"#);
        let id: PatternId = serde_json::from_str(r#""1s3""#).unwrap();
        assert_eq!(id, PatternId::One3);
    }
}
