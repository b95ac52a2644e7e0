//! Family 2: eight blocks of four one-hot base-4 digits plus a parity word.

use rand::seq::SliceRandom;
use rand::Rng;

use trackdots_core::BitGrid;

use super::{one_hot_index, pick_empty};
use crate::error::{DecodeError, MaskError};
use crate::pattern::{Cell, PatternDefinition, PatternId};
use crate::record::{DecodedRecord, FieldValue};

/// First block's digits → manufacturer.
const MANUFACTURERS: [(&str, &str); 6] = [
    ("3210", "Okidata"),
    ("3021", "HP"),
    ("2310", "Ricoh"),
    ("0132", "Ricoh"),
    ("0213", "Lexmark"),
    ("0123", "Kyocera"),
];

const UNKNOWN_MANUFACTURER: &str = "Okidata/HP/Ricoh/Lexmark/Kyocera";

const DIGITS: usize = 4;

type Block = [[Cell; 4]; 5];

/// A word's digit is 3 for its first cell down to 0 for its last.
fn digit_position(digit: usize) -> usize {
    DIGITS - 1 - digit
}

pub(super) fn check(bits: &BitGrid, blocks: &[Block]) -> bool {
    blocks.iter().all(|words| {
        let one_hot = words[..DIGITS]
            .iter()
            .all(|w| w.iter().filter(|&&[r, c]| bits.is_set(r, c)).count() == 1);
        let parity = (0..4).all(|p| {
            words.iter().filter(|w| bits.is_set(w[p][0], w[p][1])).count() % 2 == 1
        });
        one_hot && parity
    })
}

fn block_digits(bits: &BitGrid, blocks: &[Block]) -> Result<Vec<String>, DecodeError> {
    blocks
        .iter()
        .enumerate()
        .map(|(block, words)| {
            words[..DIGITS]
                .iter()
                .enumerate()
                .map(|(word, cells)| {
                    one_hot_index(bits, cells)
                        .map(|i| char::from(b'0' + digit_position(i) as u8))
                        .ok_or(DecodeError::InvalidCodeWord { block, word })
                })
                .collect()
        })
        .collect()
}

fn manufacturer(code: &str) -> &'static str {
    MANUFACTURERS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(UNKNOWN_MANUFACTURER, |(_, name)| *name)
}

pub(super) fn decode(
    pattern: PatternId,
    bits: &BitGrid,
    blocks: &[Block],
) -> Result<DecodedRecord, DecodeError> {
    let digits = block_digits(bits, blocks)?;
    let manufacturer = manufacturer(digits.first().map_or("", String::as_str));
    let raw = digits.join("-");
    let mut record = DecodedRecord::new(pattern, raw.clone(), manufacturer);
    record.insert("printer", FieldValue::Text(raw));
    Ok(record)
}

/// Scramble every word, then rewrite the first two blocks with the code of a
/// different manufacturer.
pub(super) fn strategic_mask<R: Rng + ?Sized>(
    def: &PatternDefinition,
    bits: &BitGrid,
    blocks: &[Block],
    rng: &mut R,
) -> Result<BitGrid, MaskError> {
    let mut mask = BitGrid::zeros(bits.rows(), bits.cols());
    for (b, words) in blocks.iter().enumerate() {
        for (w, cells) in words[..DIGITS].iter().enumerate() {
            let picked = pick_empty(bits, cells.iter().copied(), 1, rng, || {
                format!("block {b}, word {w}")
            })?;
            for [r, c] in picked {
                mask.set(r, c, true);
            }
        }
        for &[r, c] in &words[DIGITS] {
            if !bits.is_set(r, c) {
                mask.set(r, c, true);
            }
        }
    }

    // Blocks A and B carry the manufacturer code.
    for r in 1..def.grid_rows {
        for c in 2..7 {
            mask.set(r, c, false);
        }
    }
    let current = decode(def.id, bits, blocks)?;
    let others: Vec<&str> = MANUFACTURERS
        .iter()
        .filter(|(_, name)| *name != current.manufacturer())
        .map(|(code, _)| *code)
        .collect();
    let code = others
        .choose(rng)
        .ok_or_else(|| MaskError::InsufficientCapacity {
            context: "replacement manufacturer".to_string(),
            needed: 1,
            available: 0,
        })?;
    for (word, digit) in code.bytes().enumerate() {
        let col = word + 2;
        let p = digit_position(usize::from(digit - b'0'));
        mask.set(1 + 2 * p + 1 - col % 2, col, true);
    }

    let mut mask = mask.and_not(bits)?;
    for r in 1..9 {
        for c in 2..7 {
            let v = mask.is_set(r, c);
            mask.set(r + 9, c, v);
        }
    }
    Ok(mask)
}
