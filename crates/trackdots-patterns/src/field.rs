//! Named fields of family-4 matrices.
//!
//! Every field occupies one or more prototype columns. Each column holds a
//! two-digit decimal number in rows 1..8 (big-endian) with an odd-parity bit
//! in row 0. Column 15 carries the row parity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use trackdots_core::BitGrid;

use crate::error::{DecodeError, FieldError};

/// Manufacturer codes stored in the `manufacturer` column.
pub const MANUFACTURERS: [(u32, &str); 4] = [(0, "Xerox"), (3, "Epson"), (20, "Dell"), (4, "Xerox")];

/// Reading used when the manufacturer code is not in [`MANUFACTURERS`].
pub const UNKNOWN_MANUFACTURER: &str = "Xerox/Dell/Epson";

const PARITY_COL: usize = 15;
const PIVOT_YEAR: i32 = 2018;

/// Field identifier of a family-4 matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Minutes,
    Hour,
    Day,
    Month,
    Year,
    Serial,
    Unknown1,
    Manufacturer,
    Unknown3,
    Unknown4,
    Unknown5,
    Printer,
    Raw,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Minutes,
        Field::Hour,
        Field::Day,
        Field::Month,
        Field::Year,
        Field::Serial,
        Field::Unknown1,
        Field::Manufacturer,
        Field::Unknown3,
        Field::Unknown4,
        Field::Unknown5,
        Field::Printer,
        Field::Raw,
    ];

    /// Prototype columns holding this field, most significant first.
    pub fn columns(self) -> &'static [usize] {
        match self {
            Field::Minutes => &[14],
            Field::Hour => &[11],
            Field::Day => &[10],
            Field::Month => &[9],
            Field::Year => &[8],
            Field::Serial => &[3, 4, 5],
            Field::Unknown1 => &[13],
            Field::Manufacturer => &[12],
            Field::Unknown3 => &[7],
            Field::Unknown4 => &[2],
            Field::Unknown5 => &[1],
            Field::Printer => &[2, 3, 4, 5],
            Field::Raw => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Minutes => "minutes",
            Field::Hour => "hour",
            Field::Day => "day",
            Field::Month => "month",
            Field::Year => "year",
            Field::Serial => "serial",
            Field::Unknown1 => "unknown1",
            Field::Manufacturer => "manufacturer",
            Field::Unknown3 => "unknown3",
            Field::Unknown4 => "unknown4",
            Field::Unknown5 => "unknown5",
            Field::Printer => "printer",
            Field::Raw => "raw",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

fn column_value(bits: &BitGrid, col: usize) -> u32 {
    (1..8).fold(0, |acc, row| (acc << 1) | bits.get(row, col) as u32)
}

/// Concatenated zero-padded column values of `field`.
pub(crate) fn read_digits(bits: &BitGrid, field: Field) -> String {
    field
        .columns()
        .iter()
        .map(|&col| format!("{:02}", column_value(bits, col)))
        .collect()
}

pub(crate) fn manufacturer_name(code: &str) -> &'static str {
    code.parse::<u32>()
        .ok()
        .and_then(|n| MANUFACTURERS.iter().find(|(c, _)| *c == n))
        .map_or(UNKNOWN_MANUFACTURER, |(_, name)| *name)
}

/// Read a field. `None` only for the serial of Dell devices, whose layout
/// is not known.
pub(crate) fn read(bits: &BitGrid, field: Field) -> Option<String> {
    let digits = read_digits(bits, field);
    match field {
        Field::Manufacturer => Some(manufacturer_name(&digits).to_string()),
        Field::Serial => {
            if read(bits, Field::Manufacturer).as_deref() == Some("Dell") {
                None
            } else {
                Some(format!("-{digits}-"))
            }
        }
        _ => Some(digits),
    }
}

/// Write a field and refresh the row-parity column.
pub(crate) fn write(bits: &mut BitGrid, field: Field, value: &str) -> Result<(), FieldError> {
    let invalid = |reason: String| FieldError::InvalidFieldValue {
        field,
        value: value.to_string(),
        reason,
    };

    let mut digits = match field {
        Field::Serial => value.replace('-', ""),
        _ => value.to_string(),
    };
    if field == Field::Manufacturer && !digits.bytes().all(|b| b.is_ascii_digit()) {
        // Several codes may share a name; the last one listed is written.
        let (code, _) = MANUFACTURERS
            .iter()
            .rev()
            .find(|(_, name)| *name == digits)
            .ok_or_else(|| FieldError::UnknownManufacturer(digits.clone()))?;
        digits = code.to_string();
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected decimal digits".to_string()));
    }
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    let cols = field.columns();
    if digits.len() != 2 * cols.len() {
        return Err(invalid(format!("expected {} digits", 2 * cols.len())));
    }

    for (k, &col) in cols.iter().enumerate() {
        let n: u32 = digits[2 * k..2 * k + 2]
            .parse()
            .map_err(|_| invalid("expected decimal digits".to_string()))?;
        bits.set(0, col, n.count_ones() % 2 == 0);
        for row in 1..8 {
            bits.set(row, col, (n >> (7 - row)) & 1 == 1);
        }
    }
    refresh_parity(bits);
    Ok(())
}

/// Recompute column 15 so that every row over columns `1..=15` is odd, then
/// make column 15 itself odd.
fn refresh_parity(bits: &mut BitGrid) {
    for row in 0..8 {
        let dots = bits.count_in(row..row + 1, 1..PARITY_COL);
        bits.set(row, PARITY_COL, dots % 2 == 0);
    }
    let dots = bits.count_in(1..8, PARITY_COL..PARITY_COL + 1);
    bits.set(0, PARITY_COL, dots % 2 == 0);
}

fn field_number(bits: &BitGrid, field: Field) -> u32 {
    field
        .columns()
        .iter()
        .fold(0, |acc, &col| acc * 100 + column_value(bits, col))
}

/// Print time derived from the year, month, day, hour and minutes columns.
///
/// Two-digit years are placed in whichever of 1900 and 2000 lands closer to
/// 2018.
pub(crate) fn timestamp(bits: &BitGrid) -> Result<NaiveDateTime, DecodeError> {
    let short_year = field_number(bits, Field::Year) as i32;
    let century = [2000, 1900]
        .into_iter()
        .min_by_key(|c| (c + short_year - PIVOT_YEAR).abs())
        .unwrap_or(2000);
    let year = century + short_year;
    let month = field_number(bits, Field::Month);
    let day = field_number(bits, Field::Day);
    let hour = field_number(bits, Field::Hour);
    let minute = field_number(bits, Field::Minutes);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or(DecodeError::InvalidDate {
            year,
            month,
            day,
            hour,
            minute,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> BitGrid {
        BitGrid::zeros(8, 16)
    }

    #[test]
    fn write_then_read_single_column() {
        let mut bits = blank();
        write(&mut bits, Field::Minutes, "55").unwrap();
        assert_eq!(read(&bits, Field::Minutes).as_deref(), Some("55"));
        // 55 = 0b0110111 has five ones, so the parity row stays clear.
        assert!(!bits.is_set(0, 14));
        assert_eq!(bits.count_in(0..8, 14..15) % 2, 1);
    }

    #[test]
    fn multi_column_values_use_consecutive_digit_pairs() {
        let mut bits = blank();
        write(&mut bits, Field::Serial, "-123456-").unwrap();
        assert_eq!(read_digits(&bits, Field::Serial), "123456");
        assert_eq!(read(&bits, Field::Serial).as_deref(), Some("-123456-"));
    }

    #[test]
    fn odd_length_values_are_zero_padded() {
        let mut bits = blank();
        write(&mut bits, Field::Hour, "7").unwrap();
        assert_eq!(read(&bits, Field::Hour).as_deref(), Some("07"));
    }

    #[test]
    fn rejects_bad_values() {
        let mut bits = blank();
        assert!(matches!(
            write(&mut bits, Field::Hour, "123"),
            Err(FieldError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            write(&mut bits, Field::Day, "1a"),
            Err(FieldError::InvalidFieldValue { .. })
        ));
        assert!(matches!(
            write(&mut bits, Field::Manufacturer, "Canon"),
            Err(FieldError::UnknownManufacturer(_))
        ));
    }

    #[test]
    fn manufacturer_names_and_dell_serial() {
        let mut bits = blank();
        write(&mut bits, Field::Manufacturer, "Xerox").unwrap();
        assert_eq!(read_digits(&bits, Field::Manufacturer), "04");
        assert_eq!(read(&bits, Field::Manufacturer).as_deref(), Some("Xerox"));

        write(&mut bits, Field::Manufacturer, "Dell").unwrap();
        assert_eq!(read(&bits, Field::Serial), None);

        write(&mut bits, Field::Manufacturer, "77").unwrap();
        assert_eq!(
            read(&bits, Field::Manufacturer).as_deref(),
            Some(UNKNOWN_MANUFACTURER)
        );
    }

    #[test]
    fn year_pivot_picks_nearer_century() {
        let mut bits = blank();
        for (field, v) in [
            (Field::Month, "1"),
            (Field::Day, "1"),
            (Field::Hour, "0"),
            (Field::Minutes, "0"),
        ] {
            write(&mut bits, field, v).unwrap();
        }
        write(&mut bits, Field::Year, "68").unwrap();
        assert_eq!(timestamp(&bits).unwrap().to_string(), "2068-01-01 00:00:00");
        write(&mut bits, Field::Year, "69").unwrap();
        assert_eq!(timestamp(&bits).unwrap().to_string(), "1969-01-01 00:00:00");
    }

    #[test]
    fn out_of_range_date_is_reported() {
        let mut bits = blank();
        write(&mut bits, Field::Month, "13").unwrap();
        write(&mut bits, Field::Day, "1").unwrap();
        assert!(matches!(
            timestamp(&bits),
            Err(DecodeError::InvalidDate { month: 13, .. })
        ));
    }
}
