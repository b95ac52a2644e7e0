//! Family-specific validation, decoding and strategic masking.
//!
//! Dispatch is on [`Layout`]; the definition supplies the cell geometry.

mod family1;
mod family2;
mod family3;
mod family4;

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use trackdots_core::BitGrid;

use crate::error::{DecodeError, MaskError};
use crate::pattern::{Cell, Layout, PatternDefinition};
use crate::record::DecodedRecord;

/// Cheap rejection on an oriented, not yet rolled grid.
pub(crate) fn check_unaligned(def: &PatternDefinition, oriented: &BitGrid) -> bool {
    match &def.layout {
        Layout::ParityColumns { .. } => family1::check_unaligned(oriented),
        Layout::OneHotWords { .. } => true,
        Layout::OneHotBlocks { .. } => family3::check_unaligned(oriented),
        Layout::FieldColumns => family4::check_unaligned(oriented),
    }
}

pub(crate) fn check(def: &PatternDefinition, bits: &BitGrid) -> bool {
    match &def.layout {
        Layout::ParityColumns { rows, cols } => family1::check(bits, rows, cols),
        Layout::OneHotWords { blocks } => family2::check(bits, blocks),
        Layout::OneHotBlocks { blocks } => family3::check(bits, blocks),
        Layout::FieldColumns => family4::check(bits),
    }
}

pub(crate) fn decode(def: &PatternDefinition, bits: &BitGrid) -> Result<DecodedRecord, DecodeError> {
    match &def.layout {
        Layout::ParityColumns { rows, cols } => Ok(family1::decode(def.id, bits, rows, cols)),
        Layout::OneHotWords { blocks } => family2::decode(def.id, bits, blocks),
        Layout::OneHotBlocks { blocks } => family3::decode(def.id, bits, blocks),
        Layout::FieldColumns => family4::decode(def.id, bits),
    }
}

pub(crate) fn strategic_mask<R: Rng + ?Sized>(
    def: &PatternDefinition,
    bits: &BitGrid,
    rng: &mut R,
) -> Result<BitGrid, MaskError> {
    match &def.layout {
        Layout::ParityColumns { rows, cols } => family1::strategic_mask(bits, rows, cols, rng),
        Layout::OneHotWords { blocks } => family2::strategic_mask(def, bits, blocks, rng),
        Layout::OneHotBlocks { blocks } => family3::strategic_mask(bits, blocks, rng),
        Layout::FieldColumns => family4::strategic_mask(bits, rng),
    }
}

/// Index of the single set cell in `cells`, or `None` if not exactly one is set.
fn one_hot_index(bits: &BitGrid, cells: &[Cell]) -> Option<usize> {
    let mut set = cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| bits.is_set(cell[0], cell[1]))
        .map(|(i, _)| i);
    match (set.next(), set.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}

/// Draw `needed` distinct cells among the `candidates` that are empty in `bits`.
fn pick_empty<R: Rng + ?Sized>(
    bits: &BitGrid,
    candidates: impl IntoIterator<Item = Cell>,
    needed: usize,
    rng: &mut R,
    context: impl FnOnce() -> String,
) -> Result<Vec<Cell>, MaskError> {
    let empty: Vec<Cell> = candidates
        .into_iter()
        .filter(|&[r, c]| !bits.is_set(r, c))
        .collect();
    if empty.len() < needed {
        let context = context();
        warn!(
            "mask capacity exceeded in {context}: need {needed}, have {}",
            empty.len()
        );
        return Err(MaskError::InsufficientCapacity {
            context,
            needed,
            available: empty.len(),
        });
    }
    Ok(empty.choose_multiple(rng, needed).copied().collect())
}
