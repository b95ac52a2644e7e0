#![allow(dead_code)]

use trackdots_patterns::{BitGrid, Field, Layout, PatternId, Tdm, Transformation};

/// Prototype grid with the pattern's markers set.
fn with_markers(id: PatternId) -> BitGrid {
    let def = id.definition();
    let mut bits = BitGrid::zeros(def.proto_rows, def.proto_cols);
    for &[r, c] in &def.markers {
        bits.set(r, c, true);
    }
    bits
}

/// Two dots in every data column.
pub fn family1(id: PatternId) -> Tdm {
    let Layout::ParityColumns { rows, cols } = &id.definition().layout else {
        panic!("{id} is not family 1");
    };
    let mut bits = with_markers(id);
    for (j, &c) in cols.iter().enumerate() {
        bits.set(rows[j % rows.len()], c, true);
        bits.set(rows[(j + 3) % rows.len()], c, true);
    }
    Tdm::new(id, &bits, Transformation::IDENTITY).unwrap()
}

/// Blocks carrying `digits`, parity words filled in.
pub fn family2(digits: [&str; 8]) -> Tdm {
    let Layout::OneHotWords { blocks } = &PatternId::Two.definition().layout else {
        panic!("family 2 layout");
    };
    let mut bits = with_markers(PatternId::Two);
    for (words, code) in blocks.iter().zip(digits) {
        let mut ones = [0usize; 4];
        for (w, d) in code.bytes().enumerate() {
            let p = 3 - usize::from(d - b'0');
            let [r, c] = words[w][p];
            bits.set(r, c, true);
            ones[p] += 1;
        }
        for (p, n) in ones.iter().enumerate() {
            let [r, c] = words[4][p];
            bits.set(r, c, n % 2 == 0);
        }
    }
    Tdm::new(PatternId::Two, &bits, Transformation::IDENTITY).unwrap()
}

pub const OKIDATA: [&str; 8] = [
    "3210", "3210", "1023", "2301", "0000", "3333", "1212", "0303",
];

/// One dot per block; block `i` holds digit `i mod 6`.
pub fn family3() -> Tdm {
    let Layout::OneHotBlocks { blocks } = &PatternId::Three.definition().layout else {
        panic!("family 3 layout");
    };
    let mut bits = with_markers(PatternId::Three);
    for (i, cells) in blocks.iter().enumerate() {
        let [r, c] = cells[5 - i % 6];
        bits.set(r, c, true);
    }
    Tdm::new(PatternId::Three, &bits, Transformation::IDENTITY).unwrap()
}

/// Printed 2018-06-12 15:55 by a Xerox device with serial 123456.
pub fn family4() -> Tdm {
    let mut tdm = Tdm::blank(PatternId::Four);
    for (field, value) in [
        (Field::Raw, "0".repeat(28)),
        (Field::Minutes, "55".to_string()),
        (Field::Hour, "15".to_string()),
        (Field::Day, "12".to_string()),
        (Field::Month, "06".to_string()),
        (Field::Year, "18".to_string()),
        (Field::Serial, "-123456-".to_string()),
        (Field::Manufacturer, "Xerox".to_string()),
    ] {
        tdm.set(field, &value).unwrap();
    }
    tdm
}

/// A valid instance of every pattern.
pub fn all_valid() -> Vec<Tdm> {
    vec![
        family1(PatternId::One2),
        family1(PatternId::One3),
        family2(OKIDATA),
        family3(),
        family4(),
    ]
}

pub fn reoriented(tdm: &Tdm, rotation: u8, flip: bool) -> Tdm {
    let t = Transformation {
        rotation,
        flip,
        row_offset: 0,
        col_offset: 0,
    };
    Tdm::new(tdm.pattern(), tdm.bits(), t).unwrap()
}
