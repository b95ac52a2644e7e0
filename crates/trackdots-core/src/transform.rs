use serde::{Deserialize, Serialize};

use crate::grid::{BitGrid, GridError};

/// Orientation of a raw grid: optional left-right mirror followed by a
/// counter-clockwise rotation of `rotation × 90°`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    pub rotation: u8,
    pub flip: bool,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rotation: 0,
        flip: false,
    };

    /// Mirror (if requested), then rotate.
    pub fn apply(&self, grid: &BitGrid) -> BitGrid {
        let grid = if self.flip {
            grid.flip_lr()
        } else {
            grid.clone()
        };
        if self.rotation & 3 == 0 {
            grid
        } else {
            grid.rot90(self.rotation)
        }
    }

    /// Undo [`Orientation::apply`]: rotate back, then mirror.
    pub fn invert(&self, grid: &BitGrid) -> BitGrid {
        let grid = match self.rotation & 3 {
            0 => grid.clone(),
            r => grid.rot90(4 - r),
        };
        if self.flip {
            grid.flip_lr()
        } else {
            grid
        }
    }

    /// Shape of a `[rows, cols]` grid after this orientation.
    #[inline]
    pub fn oriented_shape(&self, shape: [usize; 2]) -> [usize; 2] {
        if self.rotation % 2 == 1 {
            [shape[1], shape[0]]
        } else {
            shape
        }
    }
}

/// The 8 orientations of the dihedral group on a rectangular grid.
pub const ORIENTATIONS_D4: [Orientation; 8] = [
    Orientation {
        rotation: 0,
        flip: false,
    },
    Orientation {
        rotation: 1,
        flip: false,
    },
    Orientation {
        rotation: 2,
        flip: false,
    },
    Orientation {
        rotation: 3,
        flip: false,
    },
    Orientation {
        rotation: 0,
        flip: true,
    },
    Orientation {
        rotation: 1,
        flip: true,
    },
    Orientation {
        rotation: 2,
        flip: true,
    },
    Orientation {
        rotation: 3,
        flip: true,
    },
];

/// Geometric registration of a raw grid onto a pattern prototype.
///
/// The aligned cell `(i, j)` is the oriented raw cell
/// `((i + row_offset) mod R, (j + col_offset) mod C)`, where `R × C` is the
/// oriented raw grid shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    pub rotation: u8,
    pub flip: bool,
    pub row_offset: usize,
    pub col_offset: usize,
}

impl Transformation {
    pub const IDENTITY: Transformation = Transformation {
        rotation: 0,
        flip: false,
        row_offset: 0,
        col_offset: 0,
    };

    #[inline]
    pub fn orientation(&self) -> Orientation {
        Orientation {
            rotation: self.rotation,
            flip: self.flip,
        }
    }

    /// Orient, roll and crop `raw` into a `proto_rows × proto_cols` window.
    pub fn apply(
        &self,
        raw: &BitGrid,
        proto_rows: usize,
        proto_cols: usize,
    ) -> Result<BitGrid, GridError> {
        self.orientation()
            .apply(raw)
            .roll_to(self.row_offset, self.col_offset)
            .crop(proto_rows, proto_cols)
    }
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
