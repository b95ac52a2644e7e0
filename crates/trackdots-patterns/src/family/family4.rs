//! Family 4: 14 two-digit columns with odd column and row parity.

use rand::Rng;

use trackdots_core::BitGrid;

use super::pick_empty;
use crate::error::{DecodeError, MaskError};
use crate::field::{self, Field};
use crate::pattern::PatternId;
use crate::record::{DecodedRecord, FieldValue};

pub(super) fn check_unaligned(oriented: &BitGrid) -> bool {
    let odd_cols = oriented.col_sums().iter().filter(|&&s| s % 2 == 1).count();
    let odd_rows = oriented.row_sums().iter().filter(|&&s| s % 2 == 1).count();
    odd_cols >= 14 && odd_rows >= 7
}

pub(super) fn check(bits: &BitGrid) -> bool {
    let odd_cols = (1..15).all(|c| bits.count_in(0..8, c..c + 1) % 2 == 1);
    let odd_rows = (1..8).all(|r| bits.count_in(r..r + 1, 1..16) % 2 == 1);
    let reserved_clear = bits.count_in(1..4, 9..10) == 0 && bits.count_in(1..3, 10..12) == 0;
    odd_cols && odd_rows && reserved_clear
}

pub(super) fn decode(pattern: PatternId, bits: &BitGrid) -> Result<DecodedRecord, DecodeError> {
    let manufacturer = field::read(bits, Field::Manufacturer).unwrap_or_default();
    let raw = field::read_digits(bits, Field::Raw);
    let mut record = DecodedRecord::new(pattern, raw, manufacturer);
    for f in Field::ALL {
        if matches!(f, Field::Raw | Field::Manufacturer) {
            continue;
        }
        record.insert(f.name(), FieldValue::from(field::read(bits, f)));
    }
    record.insert(crate::record::TIMESTAMP, FieldValue::Timestamp(field::timestamp(bits)?));
    Ok(record)
}

/// Cells always added: the row-parity column, the high bits of the
/// manufacturer column and the date columns.
const FORCED: &[(usize, &[usize])] = &[
    (15, &[0, 1, 2, 3, 4, 5, 6, 7]),
    (12, &[7, 6, 5, 3]),
    (8, &[3, 4, 5, 6, 7]),
    (9, &[4, 5, 6, 7]),
    (10, &[3, 4, 5, 6, 7]),
];

/// Serial and printer columns are filled up to at least four dots.
const PADDED_COLS: std::ops::Range<usize> = 1..6;
const MIN_DOTS: usize = 4;

pub(super) fn strategic_mask<R: Rng + ?Sized>(
    bits: &BitGrid,
    rng: &mut R,
) -> Result<BitGrid, MaskError> {
    let mut mask = BitGrid::zeros(bits.rows(), bits.cols());
    for &(c, rows) in FORCED {
        for &r in rows {
            mask.set(r, c, true);
        }
    }
    for c in PADDED_COLS {
        let dots = bits.count_in(0..8, c..c + 1);
        let needed = MIN_DOTS.saturating_sub(dots).max(1);
        let picked = pick_empty(bits, (0..8).map(|r| [r, c]), needed, rng, || {
            format!("column {c}")
        })?;
        for [r, c] in picked {
            mask.set(r, c, true);
        }
    }
    Ok(mask.and_not(bits)?)
}
