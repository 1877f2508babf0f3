//! Output types: sections, tag values, documents and tag descriptors.
//!
//! A [`MetadataDocument`] is built once per extraction call and never mutated
//! afterwards. Callers address single entries with a [`TagDescriptor`]
//! (`section` + `tag`), either built explicitly or parsed from a field name
//! such as `exif_model` or `field_iptc_keywords`.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named group of related tags, mirroring the EXIF IFD layout plus the
/// IPTC, XMP and synthesized file/computed groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Exif,
    File,
    Computed,
    Ifd0,
    Gps,
    Winxp,
    Iptc,
    Xmp,
    Thumbnail,
    Interop,
}

impl Section {
    /// Every section, in the order field keys are listed.
    pub const ALL: [Section; 10] = [
        Section::Exif,
        Section::File,
        Section::Computed,
        Section::Ifd0,
        Section::Gps,
        Section::Winxp,
        Section::Iptc,
        Section::Xmp,
        Section::Thumbnail,
        Section::Interop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Exif => "exif",
            Section::File => "file",
            Section::Computed => "computed",
            Section::Ifd0 => "ifd0",
            Section::Gps => "gps",
            Section::Winxp => "winxp",
            Section::Iptc => "iptc",
            Section::Xmp => "xmp",
            Section::Thumbnail => "thumbnail",
            Section::Interop => "interop",
        }
    }

    /// Case-insensitive lookup that returns `None` instead of an error.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::parse(s) {
            Some(section) => Ok(section),
            None => bail!(
                "unknown metadata section `{s}` (expected one of: {})",
                Section::ALL.map(|s| s.as_str()).join(", ")
            ),
        }
    }
}

/// A single normalized value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

/// A normalized tag value: one scalar, or an ordered list for multi-valued
/// tags such as IPTC keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl TagValue {
    pub fn text(s: impl Into<String>) -> Self {
        TagValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            TagValue::Scalar(s) => Some(s),
            TagValue::List(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            TagValue::List(items) => Some(items),
            TagValue::Scalar(_) => None,
        }
    }

    /// A blank scalar, or a list without a single non-blank item.
    pub fn is_empty(&self) -> bool {
        match self {
            TagValue::Scalar(s) => s.is_blank(),
            TagValue::List(items) => items.iter().all(Scalar::is_blank),
        }
    }

    /// The value as a flat sequence of scalars.
    pub fn scalars(&self) -> Vec<&Scalar> {
        match self {
            TagValue::Scalar(s) => vec![s],
            TagValue::List(items) => items.iter().collect(),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Scalar(s) => write!(f, "{s}"),
            TagValue::List(items) => {
                let joined: Vec<String> = items.iter().map(Scalar::to_string).collect();
                f.write_str(&joined.join("; "))
            }
        }
    }
}

impl From<Scalar> for TagValue {
    fn from(s: Scalar) -> Self {
        TagValue::Scalar(s)
    }
}

/// Lowercase tag key -> normalized value.
pub type SectionMap = BTreeMap<String, TagValue>;

/// The section-organized result of one extraction call.
///
/// Serializes as a plain `{ "section": { "tag": value } }` JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    sections: BTreeMap<Section, SectionMap>,
}

impl MetadataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no section holds a single entry.
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(BTreeMap::is_empty)
    }

    pub fn section(&self, section: Section) -> Option<&SectionMap> {
        self.sections.get(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (Section, &SectionMap)> {
        self.sections.iter().map(|(s, m)| (*s, m))
    }

    pub fn get(&self, section: Section, tag: &str) -> Option<&TagValue> {
        self.sections.get(&section)?.get(tag)
    }

    pub fn lookup(&self, descriptor: &TagDescriptor) -> Option<&TagValue> {
        self.get(descriptor.section, &descriptor.tag)
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// `(section_tag, display value)` pairs, sorted by key.
    ///
    /// Lists are joined with `"; "`. Empty values and tags the codec could not
    /// name (`undefinedtag*`) are left out.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        for (section, entries) in &self.sections {
            for (key, value) in entries {
                if value.is_empty() || key.starts_with("undefinedtag") {
                    continue;
                }
                rows.push((format!("{section}_{key}"), value.to_string()));
            }
        }
        rows.sort();
        rows
    }
}

impl FromIterator<(Section, SectionMap)> for MetadataDocument {
    fn from_iter<I: IntoIterator<Item = (Section, SectionMap)>>(iter: I) -> Self {
        let mut sections: BTreeMap<Section, SectionMap> = BTreeMap::new();
        for (section, entries) in iter {
            sections.entry(section).or_default().extend(entries);
        }
        Self { sections }
    }
}

/// Identifies one metadata item as a `(section, tag)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagDescriptor {
    pub section: Section,
    pub tag: String,
}

impl TagDescriptor {
    /// Build a descriptor from a section name. An unknown section is a caller
    /// bug and is rejected.
    pub fn new(section: &str, tag: &str) -> Result<Self> {
        let section: Section = section.parse()?;
        let tag = tag.trim();
        if tag.is_empty() {
            bail!("empty tag name for section `{section}`");
        }
        Ok(Self {
            section,
            tag: tag.to_lowercase(),
        })
    }

    /// Parse the `<section>_<tag...>` naming convention.
    ///
    /// A leading `field_` (the prefix content fields carry) is ignored. Returns
    /// `None` when the prefix is not a known section or the tag part is empty.
    ///
    /// ```rust
    /// use exif_meta::model::{Section, TagDescriptor};
    ///
    /// let d = TagDescriptor::from_field_name("field_gps_gpslatitude").unwrap();
    /// assert_eq!(d.section, Section::Gps);
    /// assert_eq!(d.tag, "gpslatitude");
    ///
    /// assert!(TagDescriptor::from_field_name("camera_model").is_none());
    /// ```
    pub fn from_field_name(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim().to_lowercase();
        let name = identifier.strip_prefix("field_").unwrap_or(&identifier);
        let (section, tag) = name.split_once('_')?;
        if tag.is_empty() {
            return None;
        }
        Some(Self {
            section: Section::parse(section)?,
            tag: tag.to_string(),
        })
    }
}

impl fmt::Display for TagDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section, self.tag)
    }
}

/// How an external field is populated from a document: the tag to read and
/// an optional separator for splitting a single string into several values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub descriptor: TagDescriptor,
    #[serde(default)]
    pub separator: Option<String>,
}

impl FieldBinding {
    pub fn new(descriptor: TagDescriptor) -> Self {
        Self {
            descriptor,
            separator: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.separator = if separator.is_empty() { None } else { Some(separator) };
        self
    }

    /// Values for the bound tag, or an empty vector when the document has none.
    pub fn values(&self, document: &MetadataDocument) -> Vec<Scalar> {
        let Some(value) = document.lookup(&self.descriptor) else {
            return Vec::new();
        };
        match (value, self.separator.as_deref()) {
            (TagValue::Scalar(Scalar::Text(s)), Some(sep)) => s
                .split(sep)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(Scalar::from)
                .collect(),
            _ => value.scalars().into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> MetadataDocument {
        let mut exif = SectionMap::new();
        exif.insert("model".into(), TagValue::text("Canon EOS 350D DIGITAL"));
        exif.insert("undefinedtag:0xc4a5".into(), TagValue::text("junk"));
        exif.insert("artist".into(), TagValue::text("  "));
        let mut iptc = SectionMap::new();
        iptc.insert(
            "keywords".into(),
            TagValue::List(vec!["Paris".into(), "Friends".into()]),
        );
        iptc.insert("caption".into(), TagValue::text("Eiffel; Seine"));
        [(Section::Exif, exif), (Section::Iptc, iptc)].into_iter().collect()
    }

    // ── Section ──────────────────────────────────────────────────────

    #[test]
    fn section_parse_is_case_insensitive() {
        assert_eq!(Section::parse("GPS"), Some(Section::Gps));
        assert_eq!(Section::parse("ifd0"), Some(Section::Ifd0));
        assert_eq!(Section::parse("makernote"), None);
    }

    #[test]
    fn section_from_str_rejects_unknown() {
        let err = "camera".parse::<Section>().unwrap_err();
        assert!(err.to_string().contains("camera"));
    }

    // ── TagDescriptor ────────────────────────────────────────────────

    #[test]
    fn descriptor_new_validates_section() {
        let d = TagDescriptor::new("exif", "Model").unwrap();
        assert_eq!(d.section, Section::Exif);
        assert_eq!(d.tag, "model");
        assert!(TagDescriptor::new("nope", "model").is_err());
        assert!(TagDescriptor::new("exif", " ").is_err());
    }

    #[test]
    fn field_name_keeps_underscores_in_tag() {
        let d = TagDescriptor::from_field_name("ifd0_exif_ifd_pointer").unwrap();
        assert_eq!(d.section, Section::Ifd0);
        assert_eq!(d.tag, "exif_ifd_pointer");
        assert_eq!(d.to_string(), "ifd0_exif_ifd_pointer");
    }

    #[test]
    fn field_name_strips_field_prefix() {
        let d = TagDescriptor::from_field_name("field_iptc_keywords").unwrap();
        assert_eq!(d.section, Section::Iptc);
        assert_eq!(d.tag, "keywords");
    }

    #[test]
    fn field_name_rejects_unknown_or_incomplete() {
        assert!(TagDescriptor::from_field_name("camera_model").is_none());
        assert!(TagDescriptor::from_field_name("exif").is_none());
        assert!(TagDescriptor::from_field_name("exif_").is_none());
        assert!(TagDescriptor::from_field_name("").is_none());
    }

    // ── TagValue ─────────────────────────────────────────────────────

    #[test]
    fn list_display_joins_with_semicolon() {
        let v = TagValue::List(vec!["a".into(), Scalar::Integer(2)]);
        assert_eq!(v.to_string(), "a; 2");
    }

    #[test]
    fn blank_values_are_empty() {
        assert!(TagValue::text(" \t").is_empty());
        assert!(TagValue::List(vec![]).is_empty());
        assert!(!TagValue::Scalar(Scalar::Integer(0)).is_empty());
    }

    #[test]
    fn tag_value_serializes_untagged() {
        let v = TagValue::List(vec!["x".into(), Scalar::Float(1.5)]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["x",1.5]"#);
    }

    // ── MetadataDocument ─────────────────────────────────────────────

    #[test]
    fn document_serializes_as_nested_object() {
        let doc = sample_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["exif"]["model"], "Canon EOS 350D DIGITAL");
        assert_eq!(json["iptc"]["keywords"][1], "Friends");
    }

    #[test]
    fn flatten_skips_empty_and_undefined() {
        let rows = sample_document().flatten();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["exif_model", "iptc_caption", "iptc_keywords"]);
        assert_eq!(rows[2].1, "Paris; Friends");
    }

    // ── FieldBinding ─────────────────────────────────────────────────

    #[test]
    fn binding_splits_on_separator() {
        let doc = sample_document();
        let binding = FieldBinding::new(TagDescriptor::new("iptc", "caption").unwrap())
            .with_separator(";");
        assert_eq!(binding.values(&doc), vec![Scalar::from("Eiffel"), Scalar::from("Seine")]);
    }

    #[test]
    fn binding_flattens_lists_and_handles_missing() {
        let doc = sample_document();
        let keywords = FieldBinding::new(TagDescriptor::new("iptc", "keywords").unwrap());
        assert_eq!(keywords.values(&doc).len(), 2);

        let missing = FieldBinding::new(TagDescriptor::new("gps", "gpslatitude").unwrap());
        assert!(missing.values(&doc).is_empty());
    }
}
