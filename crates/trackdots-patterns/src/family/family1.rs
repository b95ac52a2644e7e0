//! Family 1: 7×8 data cells, even parity per column, serial in the last words.

use rand::Rng;

use trackdots_core::BitGrid;

use super::pick_empty;
use crate::error::MaskError;
use crate::pattern::PatternId;
use crate::record::{DecodedRecord, FieldValue};

const MANUFACTURER: &str = "Ricoh/Lanier/Savin/NRG";

pub(super) fn check_unaligned(oriented: &BitGrid) -> bool {
    let sums = oriented.col_sums();
    sums.contains(&2) && sums.iter().filter(|&&s| s % 2 == 0).count() >= 8
}

/// Data matrix indexed `[row][col]` over the data rows and columns.
fn matrix(bits: &BitGrid, rows: &[usize], cols: &[usize]) -> Vec<Vec<u8>> {
    rows.iter()
        .map(|&r| cols.iter().map(|&c| bits.get(r, c)).collect())
        .collect()
}

pub(super) fn check(bits: &BitGrid, rows: &[usize], cols: &[usize]) -> bool {
    let total: usize = rows
        .iter()
        .map(|&r| cols.iter().filter(|&&c| bits.is_set(r, c)).count())
        .sum();
    let even_columns = cols
        .iter()
        .all(|&c| rows.iter().filter(|&&r| bits.is_set(r, c)).count() % 2 == 0);
    total > 3 && even_columns
}

fn serial_letter(digit: u8) -> char {
    match digit {
        b'0' => 'W',
        b'9' => 'P',
        _ => '?',
    }
}

pub(super) fn decode(
    pattern: PatternId,
    bits: &BitGrid,
    rows: &[usize],
    cols: &[usize],
) -> DecodedRecord {
    let m = matrix(bits, rows, cols);
    // Column-major over the rows below the parity row, last bit first.
    let mut info: Vec<u8> = (0..cols.len())
        .flat_map(|j| m.iter().skip(1).map(move |row| row[j]))
        .collect();
    info.reverse();
    let raw: String = info
        .chunks(4)
        .map(|w| w.iter().fold(0u32, |acc, &b| (acc << 1) | b as u32).to_string())
        .collect();

    let snr = &raw[raw.len() - 12..raw.len() - 1];
    let snr_bytes = snr.as_bytes();
    let alt = format!(
        "{}{}{}{}",
        serial_letter(snr_bytes[0]),
        &snr[1..4],
        serial_letter(snr_bytes[4]),
        &snr[5..11]
    );

    let mut record = DecodedRecord::new(pattern, raw.clone(), MANUFACTURER);
    record.insert("serial", FieldValue::Text(format!("{snr} or {alt}")));
    record.insert("printer", FieldValue::Text(raw));
    record
}

/// Three new dots in every blank data column, one in every other.
pub(super) fn strategic_mask<R: Rng + ?Sized>(
    bits: &BitGrid,
    rows: &[usize],
    cols: &[usize],
    rng: &mut R,
) -> Result<BitGrid, MaskError> {
    let mut mask = BitGrid::zeros(bits.rows(), bits.cols());
    for &c in cols {
        let blank = rows.iter().all(|&r| !bits.is_set(r, c));
        let needed = if blank { 3 } else { 1 };
        let picked = pick_empty(bits, rows.iter().map(|&r| [r, c]), needed, rng, || {
            format!("data column {c}")
        })?;
        for [r, c] in picked {
            mask.set(r, c, true);
        }
    }
    Ok(mask)
}
