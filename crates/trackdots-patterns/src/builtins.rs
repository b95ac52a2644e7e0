//! Built-in pattern definitions.
//!
//! Geometry per family:
//! - 1: 32×32 grid of two diagonal 16×16 copies, 7×8 data cells with column parity.
//! - 2: 18×23 grid, eight blocks of one-hot base-4 digits with parity words.
//! - 3: 24×48 grid of three shifted 24×16 copies, 27 one-of-six blocks.
//! - 4: 16×32 grid of two diagonal 8×16 copies, 14 data columns with parity.

use std::sync::OnceLock;

use crate::pattern::{Cell, Layout, MinCount, PatternDefinition, PatternId};

static DEFINITIONS: OnceLock<Vec<PatternDefinition>> = OnceLock::new();

pub(crate) fn definition(id: PatternId) -> &'static PatternDefinition {
    let all = DEFINITIONS.get_or_init(|| PatternId::ALL.into_iter().map(build).collect());
    // `ALL` order is the storage order.
    let idx = PatternId::ALL
        .iter()
        .position(|&p| p == id)
        .unwrap_or_default();
    &all[idx]
}

fn build(id: PatternId) -> PatternDefinition {
    match id {
        PatternId::One2 => family1(id, 2),
        PatternId::One3 => family1(id, 3),
        PatternId::Two => family2(),
        PatternId::Three => family3(),
        PatternId::Four => family4(),
    }
}

fn family1(id: PatternId, s: usize) -> PatternDefinition {
    let rows: Vec<usize> = (s..16).step_by(2).collect();
    let cols: Vec<usize> = (1..16).step_by(2).collect();
    let codebits = rows
        .iter()
        .flat_map(|&r| cols.iter().map(move |&c| [r, c]))
        .collect();

    let mut empty: Vec<Cell> = (0..16)
        .flat_map(|r| (2..15).step_by(2).map(move |c| [r, c]))
        .collect();
    // The rows not carrying data must stay blank between the data columns.
    let blank_rows = if s == 2 { 3..16 } else { 0..15 };
    empty.extend(
        blank_rows
            .step_by(2)
            .flat_map(|r| (1..16).map(move |c| [r, c])),
    );

    PatternDefinition {
        id,
        grid_rows: 32,
        grid_cols: 32,
        proto_rows: 16,
        proto_cols: 16,
        cell_pitch: [0.02, 0.02],
        repetitions: vec![[16, 16]],
        markers: vec![[0, 0], [1, 0]],
        empty: Some(empty),
        codebits,
        allow_flip: false,
        allow_rotation: false,
        allow_upside_down: false,
        explicit_rotations: Some(vec![0, 3]),
        min_count: MinCount::All,
        layout: Layout::ParityColumns { rows, cols },
    }
}

fn family2() -> PatternDefinition {
    let mut blocks = Vec::with_capacity(8);
    for y in 0..4 {
        for x in 0..2 {
            let mut block = [[[0usize; 2]; 4]; 5];
            for (word, cells) in block.iter_mut().enumerate() {
                let col = 5 * y + 2 + word;
                for (pos, cell) in cells.iter_mut().enumerate() {
                    *cell = [9 * x + 1 + 2 * pos + 1 - col % 2, col];
                }
            }
            blocks.push(block);
        }
    }
    let codebits = blocks
        .iter()
        .flat_map(|b| b.iter().flatten().copied())
        .collect();

    PatternDefinition {
        id: PatternId::Two,
        grid_rows: 18,
        grid_cols: 23,
        proto_rows: 18,
        proto_cols: 23,
        cell_pitch: [0.03, 0.03],
        repetitions: Vec::new(),
        markers: vec![[1, 1], [1, 0], [0, 1]],
        empty: Some(vec![[0, 0], [2, 1]]),
        codebits,
        allow_flip: true,
        allow_rotation: true,
        allow_upside_down: true,
        explicit_rotations: None,
        min_count: MinCount::AtLeast(1),
        layout: Layout::OneHotWords { blocks },
    }
}

fn family3() -> PatternDefinition {
    let mut blocks = Vec::with_capacity(27);
    for by in 0..5 {
        for bx in 0..6 {
            if bx + by < 2 {
                continue;
            }
            let mut block = [[0usize; 2]; 6];
            for y in 0..3 {
                for x in 0..2 {
                    block[y * 2 + x] = [(bx * 4 + by + x) % 24, (3 * by + 1 + y) % 16];
                }
            }
            blocks.push(block);
        }
    }
    let codebits = blocks.iter().flatten().copied().collect();

    PatternDefinition {
        id: PatternId::Three,
        grid_rows: 24,
        grid_cols: 48,
        proto_rows: 24,
        proto_cols: 16,
        cell_pitch: [0.02, 0.02],
        repetitions: vec![[8, 16], [16, 32]],
        markers: vec![[0, 4], [0, 1], [2, 1]],
        empty: Some(Vec::new()),
        codebits,
        allow_flip: false,
        allow_rotation: true,
        allow_upside_down: true,
        explicit_rotations: None,
        min_count: MinCount::AtLeast(1),
        layout: Layout::OneHotBlocks { blocks },
    }
}

fn family4() -> PatternDefinition {
    PatternDefinition {
        id: PatternId::Four,
        grid_rows: 16,
        grid_cols: 32,
        proto_rows: 8,
        proto_cols: 16,
        cell_pitch: [0.04, 0.04],
        repetitions: vec![[8, 16]],
        markers: Vec::new(),
        empty: Some(
            (8..16)
                .flat_map(|r| (0..17).map(move |c| [r, c]))
                .collect(),
        ),
        codebits: (0..8)
            .flat_map(|r| (1..16).map(move |c| [r, c]))
            .collect(),
        allow_flip: true,
        allow_rotation: true,
        allow_upside_down: true,
        explicit_rotations: None,
        min_count: MinCount::AtLeast(1),
        layout: Layout::FieldColumns,
    }
}
