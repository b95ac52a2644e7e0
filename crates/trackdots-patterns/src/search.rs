//! Alignment search: find every orientation and cyclic offset under which a
//! raw grid matches a pattern's markers and empty cells.

use log::{debug, trace};

use trackdots_core::{
    BitGrid, GridError, Orientation, RegionMeta, Transformation, ORIENTATIONS_D4,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::family;
use crate::pattern::{PatternDefinition, PatternId};
use crate::tdm::Tdm;

/// Aligner for a fixed pattern.
///
/// Brute force over at most eight orientations and every cyclic offset of
/// the oriented grid. Grids are at most a few hundred cells, so no index
/// structure is kept.
#[derive(Clone, Copy, Debug)]
pub struct Aligner {
    def: &'static PatternDefinition,
}

impl Aligner {
    pub fn new(pattern: PatternId) -> Self {
        Self {
            def: pattern.definition(),
        }
    }

    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.def.id
    }

    #[inline]
    pub fn definition(&self) -> &'static PatternDefinition {
        self.def
    }

    fn rotations(&self, shape: [usize; 2]) -> Vec<u8> {
        let def = self.def;
        let mut rotations = match &def.explicit_rotations {
            Some(r) => r.clone(),
            None if def.allow_rotation => {
                let mut r = Vec::with_capacity(2);
                if shape == def.grid_shape() {
                    r.push(0);
                }
                if shape == [def.grid_cols, def.grid_rows] {
                    r.push(1);
                }
                r
            }
            None => vec![0],
        };
        if def.allow_upside_down {
            rotations = rotations.into_iter().flat_map(|r| [r, r + 2]).collect();
        }
        rotations
    }

    /// Orientations whose result has the pattern's grid shape, in
    /// [`ORIENTATIONS_D4`] order.
    pub fn orientations(&self, shape: [usize; 2]) -> Vec<Orientation> {
        let rotations: Vec<u8> = self.rotations(shape).into_iter().map(|r| r % 4).collect();
        ORIENTATIONS_D4
            .into_iter()
            .filter(|o| rotations.contains(&o.rotation))
            .filter(|o| self.def.allow_flip || !o.flip)
            .filter(|o| o.oriented_shape(shape) == self.def.grid_shape())
            .collect()
    }

    /// All transformations aligning `raw` with the pattern's markers and
    /// empty cells.
    ///
    /// An empty result means no alignment exists; a grid no orientation can
    /// bring to the pattern's shape is an error.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, raw), fields(pattern = %self.def.id, rows = raw.rows(), cols = raw.cols()))
    )]
    pub fn transformations(&self, raw: &BitGrid) -> Result<Vec<Transformation>, GridError> {
        let def = self.def;
        let orientations = self.orientations(raw.shape());
        if orientations.is_empty() {
            return Err(GridError::ShapeMismatch {
                expected: def.grid_shape(),
                got: raw.shape(),
            });
        }

        let empty = def.empty_cells();
        let mut out = Vec::new();
        for o in orientations {
            let m = o.apply(raw);
            if !family::check_unaligned(def, &m) {
                trace!("{}: orientation {:?} rejected before offset scan", def.id, o);
                continue;
            }
            for row_offset in 0..m.rows() {
                for col_offset in 0..m.cols() {
                    let at = |[r, c]: [usize; 2]| m.get_wrapped(r + row_offset, c + col_offset) == 1;
                    if def.markers.iter().all(|&cell| at(cell))
                        && !empty.iter().any(|&cell| at(cell))
                    {
                        out.push(Transformation {
                            rotation: o.rotation,
                            flip: o.flip,
                            row_offset,
                            col_offset,
                        });
                    }
                }
            }
        }
        debug!(
            "{}: {} candidate transformation(s) for {}x{} grid",
            def.id,
            out.len(),
            raw.rows(),
            raw.cols()
        );
        Ok(out)
    }

    /// Aligned instances for every transformation found by
    /// [`Aligner::transformations`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, raw, meta), fields(pattern = %self.def.id))
    )]
    pub fn align(&self, raw: &BitGrid, meta: Option<RegionMeta>) -> Result<Vec<Tdm>, GridError> {
        let def = self.def;
        self.transformations(raw)?
            .into_iter()
            .map(|t| {
                let proto = t.apply(raw, def.proto_rows, def.proto_cols)?;
                let tdm = Tdm::new(def.id, &proto, t)?;
                Ok(match meta {
                    Some(meta) => tdm.with_meta(meta),
                    None => tdm,
                })
            })
            .collect()
    }
}

/// Expand an aligned instance to its full grid in the orientation of the
/// source.
///
/// The prototype is written at the origin and at every repetition offset,
/// then rotation and mirroring are undone. The cyclic offset is kept, so the
/// result aligns again at offset `(0, 0)`.
pub fn materialize(tdm: &Tdm) -> BitGrid {
    let def = tdm.definition();
    let (rows, cols) = (def.grid_rows, def.grid_cols);
    let mut full = BitGrid::zeros(rows, cols);
    for [r, c] in tdm.bits().ones() {
        for [dr, dc] in std::iter::once([0, 0]).chain(def.repetitions.iter().copied()) {
            full.set((r + dr) % rows, (c + dc) % cols, true);
        }
    }
    tdm.transformation().orientation().invert(&full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotations_of(id: PatternId, shape: [usize; 2]) -> Vec<(u8, bool)> {
        Aligner::new(id)
            .orientations(shape)
            .into_iter()
            .map(|o| (o.rotation, o.flip))
            .collect()
    }

    #[test]
    fn orientation_candidates_follow_pattern_flags() {
        assert_eq!(rotations_of(PatternId::One2, [32, 32]), vec![(0, false), (3, false)]);
        assert_eq!(
            rotations_of(PatternId::Two, [18, 23]),
            vec![(0, false), (2, false), (0, true), (2, true)]
        );
        assert_eq!(
            rotations_of(PatternId::Two, [23, 18]),
            vec![(1, false), (3, false), (1, true), (3, true)]
        );
        assert_eq!(rotations_of(PatternId::Three, [48, 24]), vec![(1, false), (3, false)]);
        assert!(rotations_of(PatternId::Four, [16, 16]).is_empty());
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let raw = BitGrid::zeros(10, 10);
        assert_eq!(
            Aligner::new(PatternId::Four).transformations(&raw),
            Err(GridError::ShapeMismatch {
                expected: [16, 32],
                got: [10, 10]
            })
        );
    }

    #[test]
    fn single_dot_has_no_alignment() {
        let mut raw = BitGrid::zeros(18, 23);
        raw.set(5, 5, true);
        assert!(Aligner::new(PatternId::Two).align(&raw, None).unwrap().is_empty());
    }

    #[test]
    fn materialize_repeats_prototype() {
        let tdm = Tdm::blank(PatternId::Three);
        let full = materialize(&tdm);
        assert_eq!(full.shape(), [24, 48]);
        assert_eq!(full.count_ones(), 9);
        // Marker (0, 1) repeated at (8, 17) and (16, 33).
        assert!(full.is_set(0, 1) && full.is_set(8, 17) && full.is_set(16, 33));
    }
}
