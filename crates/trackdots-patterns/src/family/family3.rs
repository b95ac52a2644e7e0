//! Family 3: 27 blocks of six cells, each holding exactly one dot.

use rand::Rng;

use trackdots_core::BitGrid;

use super::{one_hot_index, pick_empty};
use crate::error::{DecodeError, MaskError};
use crate::pattern::{Cell, PatternId};
use crate::record::{DecodedRecord, FieldValue};

const MANUFACTURER: &str = "Konica Minolta/Epson";
/// Three markers plus one dot per block.
const DOTS_PER_COPY: usize = 30;
const COPY_COLS: usize = 16;

pub(super) fn check_unaligned(oriented: &BitGrid) -> bool {
    (0..oriented.cols() / COPY_COLS).any(|k| {
        oriented.count_in(0..oriented.rows(), k * COPY_COLS..(k + 1) * COPY_COLS) == DOTS_PER_COPY
    })
}

pub(super) fn check(bits: &BitGrid, blocks: &[[Cell; 6]]) -> bool {
    let cols = bits.cols().min(COPY_COLS);
    bits.count_in(0..bits.rows(), 0..cols) == DOTS_PER_COPY
        && blocks
            .iter()
            .all(|b| b.iter().filter(|&&[r, c]| bits.is_set(r, c)).count() == 1)
}

pub(super) fn decode(
    pattern: PatternId,
    bits: &BitGrid,
    blocks: &[[Cell; 6]],
) -> Result<DecodedRecord, DecodeError> {
    let digits: String = blocks
        .iter()
        .enumerate()
        .map(|(block, cells)| {
            one_hot_index(bits, cells)
                .map(|i| char::from(b'5' - i as u8))
                .ok_or(DecodeError::InvalidCodeWord { block, word: 0 })
        })
        .collect::<Result<_, _>>()?;

    let group = |r: std::ops::Range<usize>| digits.get(r).unwrap_or_default();
    let raw = format!(
        "--{} -{} {} {} {}",
        group(0..4),
        group(4..9),
        group(9..15),
        group(15..21),
        group(21..27)
    );
    let mut record = DecodedRecord::new(pattern, raw.clone(), MANUFACTURER);
    record.insert("printer", FieldValue::Text(raw));
    Ok(record)
}

/// One extra dot in every block.
pub(super) fn strategic_mask<R: Rng + ?Sized>(
    bits: &BitGrid,
    blocks: &[[Cell; 6]],
    rng: &mut R,
) -> Result<BitGrid, MaskError> {
    let mut mask = BitGrid::zeros(bits.rows(), bits.cols());
    for (i, cells) in blocks.iter().enumerate() {
        for [r, c] in pick_empty(bits, cells.iter().copied(), 1, rng, || format!("block {i}"))? {
            mask.set(r, c, true);
        }
    }
    Ok(mask)
}
