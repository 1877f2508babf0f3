use std::collections::BTreeMap;

use crate::model::Section;

/// A tag value exactly as the codec handed it over, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// ASCII/undefined payloads and rationals rendered as `"num/den"`.
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
    List(Vec<RawValue>),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Bytes(s.into().into_bytes())
    }

    /// A rational in the `"num/den"` form the normalizer expects.
    pub fn fraction(num: i64, den: i64) -> Self {
        RawValue::text(format!("{num}/{den}"))
    }

    /// Collapse a codec component vector: nothing, one scalar, or a list.
    pub fn from_components(mut items: Vec<RawValue>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(RawValue::List(items)),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Lossy text view, used for refs and shape checks.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Bytes(b) => Some(
                String::from_utf8_lossy(b)
                    .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                    .to_string(),
            ),
            RawValue::Integer(n) => Some(n.to_string()),
            RawValue::Float(x) => Some(x.to_string()),
            RawValue::List(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(n) => Some(*n),
            RawValue::Bytes(_) => self.to_text()?.parse().ok(),
            _ => None,
        }
    }
}

/// Lowercase key -> raw value, for one section.
pub type RawSection = BTreeMap<String, RawValue>;

/// Everything one extraction call pulled out of a file.
///
/// `exif` is grouped by section already; `iptc` keeps the IIM dataset codes
/// (`"2#025"`) with every repetition of a dataset in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSegment {
    pub exif: BTreeMap<Section, RawSection>,
    pub iptc: BTreeMap<String, Vec<Vec<u8>>>,
}

impl RawSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.exif.values().all(BTreeMap::is_empty) && self.iptc.is_empty()
    }

    /// Insert a codec entry; the key is lowercased on the way in.
    pub fn insert(&mut self, section: Section, key: &str, value: RawValue) {
        self.exif
            .entry(section)
            .or_default()
            .insert(key.to_lowercase(), value);
    }

    pub fn get(&self, section: Section, key: &str) -> Option<&RawValue> {
        self.exif.get(&section)?.get(key)
    }

    pub fn push_iptc(&mut self, code: String, value: Vec<u8>) {
        self.iptc.entry(code).or_default().push(value);
    }

    /// Section names holding at least one entry, in `Section` order.
    pub fn sections_found(&self) -> Vec<Section> {
        let mut found: Vec<Section> = self
            .exif
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(section, _)| *section)
            .collect();
        if !self.iptc.is_empty() && !found.contains(&Section::Iptc) {
            found.push(Section::Iptc);
        }
        found
    }
}
