//! Aligned tracking-dot matrices.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use trackdots_core::{BitGrid, GridError, RegionMeta, Transformation};

use crate::error::{DecodeError, FieldError, MaskError};
use crate::family;
use crate::field::{self, Field};
use crate::mask::{AnonymizationMask, MaskKind};
use crate::pattern::{PatternDefinition, PatternId};
use crate::record::DecodedRecord;
use crate::search;

/// A raw grid registered onto a pattern prototype.
///
/// Only marker cells (always set) and codebits are carried over from the
/// source; every other cell is blank. Two instances are equal when they
/// belong to the same pattern and hold the same bits, regardless of where on
/// the page or under which transformation they were found.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawTdm")]
pub struct Tdm {
    pattern: PatternId,
    bits: BitGrid,
    transformation: Transformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<RegionMeta>,
}

#[derive(Deserialize)]
struct RawTdm {
    pattern: PatternId,
    bits: BitGrid,
    transformation: Transformation,
    #[serde(default)]
    meta: Option<RegionMeta>,
}

impl TryFrom<RawTdm> for Tdm {
    type Error = GridError;

    fn try_from(raw: RawTdm) -> Result<Self, Self::Error> {
        let tdm = Tdm::new(raw.pattern, &raw.bits, raw.transformation)?;
        Ok(match raw.meta {
            Some(meta) => tdm.with_meta(meta),
            None => tdm,
        })
    }
}

impl Tdm {
    /// Project a prototype-shaped `source` grid onto `pattern`.
    pub fn new(
        pattern: PatternId,
        source: &BitGrid,
        transformation: Transformation,
    ) -> Result<Self, GridError> {
        let def = pattern.definition();
        if source.shape() != def.proto_shape() {
            return Err(GridError::ShapeMismatch {
                expected: def.proto_shape(),
                got: source.shape(),
            });
        }
        let mut bits = BitGrid::zeros(def.proto_rows, def.proto_cols);
        for &[r, c] in &def.markers {
            bits.set(r, c, true);
        }
        for &[r, c] in &def.codebits {
            bits.set(r, c, source.is_set(r, c));
        }
        Ok(Self {
            pattern,
            bits,
            transformation,
            meta: None,
        })
    }

    /// Markers only, identity transformation. Starting point for encoding.
    pub fn blank(pattern: PatternId) -> Self {
        let def = pattern.definition();
        let mut bits = BitGrid::zeros(def.proto_rows, def.proto_cols);
        for &[r, c] in &def.markers {
            bits.set(r, c, true);
        }
        Self {
            pattern,
            bits,
            transformation: Transformation::IDENTITY,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: RegionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    #[inline]
    pub fn definition(&self) -> &'static PatternDefinition {
        self.pattern.definition()
    }

    #[inline]
    pub fn bits(&self) -> &BitGrid {
        &self.bits
    }

    #[inline]
    pub fn transformation(&self) -> Transformation {
        self.transformation
    }

    pub fn meta(&self) -> Option<&RegionMeta> {
        self.meta.as_ref()
    }

    /// Pixel position of the source region, when known.
    pub fn position(&self) -> Option<[i64; 2]> {
        self.meta.as_ref().map(RegionMeta::position)
    }

    /// Redundancy checks of the pattern family.
    pub fn check(&self) -> bool {
        family::check(self.definition(), &self.bits)
    }

    /// Decode without validating first. Callers are expected to run
    /// [`Tdm::check`]; see [`Tdm::decode_checked`].
    pub fn decode(&self) -> Result<DecodedRecord, DecodeError> {
        family::decode(self.definition(), &self.bits)
    }

    pub fn decode_checked(&self) -> Result<DecodedRecord, DecodeError> {
        if !self.check() {
            return Err(DecodeError::ValidationFailed {
                pattern: self.pattern,
            });
        }
        self.decode()
    }

    /// Read a named field. Only family 4 has named fields.
    pub fn get(&self, field: Field) -> Result<Option<String>, FieldError> {
        self.require_fields()?;
        Ok(field::read(&self.bits, field))
    }

    /// Encode a named field and refresh the parity column.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        self.require_fields()?;
        field::write(&mut self.bits, field, value)
    }

    fn require_fields(&self) -> Result<(), FieldError> {
        if self.pattern == PatternId::Four {
            Ok(())
        } else {
            Err(FieldError::UnsupportedPattern {
                pattern: self.pattern,
            })
        }
    }

    /// Every empty codebit.
    pub fn full_mask(&self) -> AnonymizationMask {
        let mut bits = BitGrid::zeros(self.bits.rows(), self.bits.cols());
        for &[r, c] in &self.definition().codebits {
            if !self.bits.is_set(r, c) {
                bits.set(r, c, true);
            }
        }
        AnonymizationMask::new(self.pattern, MaskKind::Full, bits)
    }

    /// Family-specific overlay that makes the code ambiguous with few dots.
    pub fn strategic_mask<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<AnonymizationMask, MaskError> {
        let bits = family::strategic_mask(self.definition(), &self.bits, rng)?;
        Ok(AnonymizationMask::new(
            self.pattern,
            MaskKind::Strategic,
            bits,
        ))
    }

    pub fn mask<R: Rng + ?Sized>(
        &self,
        kind: MaskKind,
        rng: &mut R,
    ) -> Result<AnonymizationMask, MaskError> {
        match kind {
            MaskKind::Full => Ok(self.full_mask()),
            MaskKind::Strategic => self.strategic_mask(rng),
        }
    }

    /// Full-size grid in the orientation of the source.
    pub fn materialize(&self) -> BitGrid {
        search::materialize(self)
    }

    pub(crate) fn with_bits(&self, bits: &BitGrid) -> Result<Self, GridError> {
        let mut out = Tdm::new(self.pattern, bits, self.transformation)?;
        out.meta = self.meta;
        Ok(out)
    }
}

impl PartialEq for Tdm {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.number() == other.pattern.number() && self.bits == other.bits
    }
}

impl Eq for Tdm {}

impl Hash for Tdm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.number().hash(state);
        self.bits.hash(state);
    }
}

impl fmt::Display for Tdm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bits, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn projection_keeps_markers_and_codebits_only() {
        let source = BitGrid::from_vec(8, 16, vec![1; 128]).unwrap();
        let tdm = Tdm::new(PatternId::Four, &source, Transformation::IDENTITY).unwrap();
        // Column 0 is neither marker nor codebit.
        assert_eq!(tdm.bits().count_in(0..8, 0..1), 0);
        assert_eq!(tdm.bits().count_ones(), 8 * 15);

        let blank = Tdm::new(PatternId::Two, &BitGrid::zeros(18, 23), Transformation::IDENTITY)
            .unwrap();
        assert_eq!(blank.bits().count_ones(), 3);
        assert_eq!(blank, Tdm::blank(PatternId::Two));
    }

    #[test]
    fn deserialization_enforces_prototype_shape() {
        let json = r#"{
            "pattern": "4",
            "bits": { "rows": 2, "cols": 2, "data": [1, 0, 0, 1] },
            "transformation": { "rotation": 0, "flip": false, "row_offset": 0, "col_offset": 0 }
        }"#;
        let err = serde_json::from_str::<Tdm>(json).unwrap_err();
        assert!(err.to_string().contains("[8, 16]"), "{err}");

        let tdm = Tdm::blank(PatternId::Four).with_meta(RegionMeta::default());
        let back: Tdm = serde_json::from_str(&serde_json::to_string(&tdm).unwrap()).unwrap();
        assert_eq!(back, tdm);
        assert_eq!(back.meta(), tdm.meta());
        assert_eq!(back.check(), tdm.check());
    }

    #[test]
    fn source_must_have_prototype_shape() {
        let err = Tdm::new(PatternId::Four, &BitGrid::zeros(16, 32), Transformation::IDENTITY)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::ShapeMismatch {
                expected: [8, 16],
                got: [16, 32]
            }
        );
    }

    #[test]
    fn equality_ignores_transformation_and_position() {
        let a = Tdm::blank(PatternId::Three);
        let t = Transformation {
            rotation: 3,
            flip: false,
            row_offset: 4,
            col_offset: 9,
        };
        let b = Tdm::new(PatternId::Three, a.bits(), t)
            .unwrap()
            .with_meta(RegionMeta {
                crop_x: 100,
                ..RegionMeta::default()
            });
        assert_eq!(a, b);
        let set: HashSet<Tdm> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(Tdm::blank(PatternId::One2), Tdm::blank(PatternId::One3));
    }

    #[test]
    fn fields_only_on_family_four() {
        let mut tdm = Tdm::blank(PatternId::Two);
        assert_eq!(
            tdm.set(Field::Hour, "10"),
            Err(FieldError::UnsupportedPattern {
                pattern: PatternId::Two
            })
        );
        assert!(tdm.get(Field::Hour).is_err());
    }

    #[test]
    fn encoded_instance_round_trips() {
        let mut tdm = Tdm::blank(PatternId::Four);
        tdm.set(Field::Raw, "0".repeat(28).as_str()).unwrap();
        tdm.set(Field::Minutes, "55").unwrap();
        tdm.set(Field::Hour, "15").unwrap();
        tdm.set(Field::Day, "12").unwrap();
        tdm.set(Field::Month, "06").unwrap();
        tdm.set(Field::Year, "18").unwrap();
        assert!(tdm.check());
        assert_eq!(tdm.get(Field::Minutes).unwrap().as_deref(), Some("55"));
        let rec = tdm.decode_checked().unwrap();
        assert_eq!(rec.timestamp().map(|t| t.to_string()).as_deref(), Some("2018-06-12 15:55:00"));
    }

    #[test]
    fn decode_checked_rejects_invalid() {
        let tdm = Tdm::blank(PatternId::Four);
        assert!(!tdm.check());
        assert_eq!(
            tdm.decode_checked(),
            Err(DecodeError::ValidationFailed {
                pattern: PatternId::Four
            })
        );
    }

    #[test]
    fn full_mask_covers_empty_codebits() {
        let tdm = Tdm::blank(PatternId::Three);
        let mask = tdm.full_mask();
        assert_eq!(mask.kind(), MaskKind::Full);
        assert_eq!(mask.bits().count_ones(), 162);
        let masked = mask.apply(&tdm).unwrap();
        assert_eq!(masked.bits().count_ones(), 162 + 3);
    }
}
