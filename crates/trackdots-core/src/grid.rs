//! Binary dot grids.
//!
//! A [`BitGrid`] is a row-major `rows × cols` matrix of `0`/`1` cells. It is the
//! only grid representation used by the decoder: raw extractions, aligned
//! prototypes and anonymization masks all share it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Errors raised when building, reshaping or combining grids.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid data length {got} does not match {rows}x{cols}")]
    InvalidLength { rows: usize, cols: usize, got: usize },
    #[error("cell ({row}, {col}) holds {value}, expected 0 or 1")]
    NonBinaryCell { row: usize, col: usize, value: u8 },
    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("unexpected character {ch:?} on line {line}")]
    InvalidCharacter { line: usize, ch: char },
    #[error("grid shape {got:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: [usize; 2],
        got: [usize; 2],
    },
}

/// Row-major binary grid.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBitGrid", into = "RawBitGrid")]
pub struct BitGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct RawBitGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl TryFrom<RawBitGrid> for BitGrid {
    type Error = GridError;

    fn try_from(raw: RawBitGrid) -> Result<Self, Self::Error> {
        BitGrid::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl From<BitGrid> for RawBitGrid {
    fn from(grid: BitGrid) -> Self {
        RawBitGrid {
            rows: grid.rows,
            cols: grid.cols,
            data: grid.data,
        }
    }
}

impl BitGrid {
    /// All-empty grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from row-major cell values. Every value must be `0` or `1`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, GridError> {
        if data.len() != rows * cols {
            return Err(GridError::InvalidLength {
                rows,
                cols,
                got: data.len(),
            });
        }
        if let Some(idx) = data.iter().position(|&v| v > 1) {
            return Err(GridError::NonBinaryCell {
                row: idx / cols,
                col: idx % cols,
                value: data[idx],
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from a slice of equally long rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != cols {
                return Err(GridError::RaggedRows {
                    row,
                    expected: cols,
                    got: cells.len(),
                });
            }
            data.extend_from_slice(cells);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    /// Parse a text rendering.
    ///
    /// `1`, `x`, `X` and `#` are dots; `0`, `.` and `_` are empty cells.
    /// Spaces and blank lines are ignored, so both the [`fmt::Display`]
    /// output and hand-written fixtures round-trip.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let mut row = Vec::new();
            for ch in line.chars() {
                match ch {
                    '1' | 'x' | 'X' | '#' => row.push(1),
                    '0' | '.' | '_' => row.push(0),
                    c if c.is_whitespace() => {}
                    ch => {
                        return Err(GridError::InvalidCharacter {
                            line: line_no + 1,
                            ch,
                        })
                    }
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(&rows)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `[rows, cols]`.
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell value. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 1
    }

    /// Cell value under cyclic (torus) indexing.
    #[inline]
    pub fn get_wrapped(&self, row: usize, col: usize) -> u8 {
        self.data[(row % self.rows) * self.cols + col % self.cols]
    }

    /// Set or clear a cell. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        self.data[row * self.cols + col] = u8::from(on);
    }

    /// Total number of dots.
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|&v| v as usize).sum()
    }

    /// Number of dots inside a rectangular window.
    pub fn count_in(&self, rows: Range<usize>, cols: Range<usize>) -> usize {
        let mut n = 0;
        for r in rows {
            for c in cols.clone() {
                n += self.get(r, c) as usize;
            }
        }
        n
    }

    /// Dots per row.
    pub fn row_sums(&self) -> Vec<usize> {
        self.data
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().map(|&v| v as usize).sum())
            .collect()
    }

    /// Dots per column.
    pub fn col_sums(&self) -> Vec<usize> {
        let mut sums = vec![0usize; self.cols];
        for row in self.data.chunks(self.cols.max(1)).take(self.rows) {
            for (sum, &v) in sums.iter_mut().zip(row) {
                *sum += v as usize;
            }
        }
        sums
    }

    /// Coordinates `[row, col]` of every dot in row-major order.
    pub fn ones(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1)
            .map(move |(idx, _)| [idx / cols, idx % cols])
    }

    /// Left-right mirror.
    pub fn flip_lr(&self) -> BitGrid {
        let mut out = BitGrid::zeros(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[r * self.cols + c] = self.data[r * self.cols + (self.cols - 1 - c)];
            }
        }
        out
    }

    /// Rotate counter-clockwise by `quarters × 90°`.
    ///
    /// Odd quarter turns swap the grid dimensions.
    pub fn rot90(&self, quarters: u8) -> BitGrid {
        let (r_in, c_in) = (self.rows, self.cols);
        let q = quarters & 3;
        let (rows, cols) = if q % 2 == 1 { (c_in, r_in) } else { (r_in, c_in) };
        let mut out = BitGrid::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let (si, sj) = match q {
                    0 => (i, j),
                    1 => (j, c_in - 1 - i),
                    2 => (r_in - 1 - i, c_in - 1 - j),
                    _ => (r_in - 1 - j, i),
                };
                out.data[i * cols + j] = self.data[si * c_in + sj];
            }
        }
        out
    }

    /// Cyclic shift such that cell `(row, col)` lands at the origin:
    /// `out[i][j] = self[(i + row) mod rows][(j + col) mod cols]`.
    pub fn roll_to(&self, row: usize, col: usize) -> BitGrid {
        let mut out = BitGrid::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[i * self.cols + j] = self.get_wrapped(i + row, j + col);
            }
        }
        out
    }

    /// Top-left `rows × cols` window.
    pub fn crop(&self, rows: usize, cols: usize) -> Result<BitGrid, GridError> {
        if rows > self.rows || cols > self.cols {
            return Err(GridError::ShapeMismatch {
                expected: [rows, cols],
                got: self.shape(),
            });
        }
        let mut out = BitGrid::zeros(rows, cols);
        for r in 0..rows {
            out.data[r * cols..(r + 1) * cols]
                .copy_from_slice(&self.data[r * self.cols..r * self.cols + cols]);
        }
        Ok(out)
    }

    /// Cell-wise OR.
    pub fn or(&self, other: &BitGrid) -> Result<BitGrid, GridError> {
        self.zip_with(other, |a, b| a | b)
    }

    /// Cells set in `self` but not in `other`.
    pub fn and_not(&self, other: &BitGrid) -> Result<BitGrid, GridError> {
        self.zip_with(other, |a, b| a & !b & 1)
    }

    fn zip_with(&self, other: &BitGrid, f: impl Fn(u8, u8) -> u8) -> Result<BitGrid, GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(BitGrid {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Canonical byte encoding (row-major, one byte per cell).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f)?;
            }
            for c in 0..self.cols {
                f.write_str(if self.is_set(r, c) { "x" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid {}x{}", self.rows, self.cols)?;
        fmt::Display::fmt(self, f)
    }
}
