//! Human-readable decoding results.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pattern::PatternId;

/// Key under which decoders store the print time.
pub(crate) const TIMESTAMP: &str = "timestamp";

/// One decoded value.
///
/// Serialized untagged. On the way back every string is `Text` except the
/// value under the `timestamp` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// The field exists for this pattern but cannot be read (e.g. a Dell serial).
    Missing,
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(FieldValue::Missing, FieldValue::Text)
    }
}

/// Field name → value mapping produced by a decoder.
///
/// Always contains `raw` and `manufacturer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct DecodedRecord {
    pub pattern: PatternId,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

#[derive(Deserialize)]
struct RawRecord {
    pattern: PatternId,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl TryFrom<RawRecord> for DecodedRecord {
    type Error = chrono::ParseError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let mut fields = raw.fields;
        if let Some(FieldValue::Text(s)) = fields.get(TIMESTAMP) {
            let ts: NaiveDateTime = s.parse()?;
            fields.insert(TIMESTAMP.to_string(), FieldValue::Timestamp(ts));
        }
        Ok(Self {
            pattern: raw.pattern,
            fields,
        })
    }
}

impl DecodedRecord {
    pub fn new(pattern: PatternId, raw: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("raw".to_string(), FieldValue::Text(raw.into()));
        fields.insert(
            "manufacturer".to_string(),
            FieldValue::Text(manufacturer.into()),
        );
        Self { pattern, fields }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn raw(&self) -> &str {
        self.text("raw").unwrap_or_default()
    }

    /// Manufacturer name, or a `/`-joined list of candidates when ambiguous.
    pub fn manufacturer(&self) -> &str {
        self.text("manufacturer").unwrap_or_default()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self.get(TIMESTAMP) {
            Some(FieldValue::Timestamp(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
