//! Per-key reformatting of raw tag values.
//!
//! Every raw entry goes through [`Normalizer::normalize`] exactly once. A key
//! matches at most one rule; anything a rule cannot convert (a malformed
//! fraction, a date in an unexpected shape, a GPS value without usable
//! components) is passed through as trimmed text instead of failing.
//!
//! The rules only fire on raw-shaped input, so running an already normalized
//! value through them again leaves it unchanged.

use chrono::{Local, TimeZone};

use crate::config::{Config, Granularity};
use crate::dictionary;
use crate::exif::{RawSection, RawValue};
use crate::model::{Scalar, Section, SectionMap, TagValue};

const UNICODE_MARKER: &[u8] = b"UNICODE";

/// UserComment character-code headers whose payload is plain text.
const TEXT_HEADERS: &[&[u8]] = &[b"ASCII\0\0\0", b"JIS\0\0\0\0\0", &[0; 8]];

/// Applies the tag-specific reformatting rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    granularity: Granularity,
}

impl Normalizer {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.granularity)
    }

    /// Normalize every entry of one raw section.
    ///
    /// GPS keys look up their `<key>ref` sibling in the same section.
    pub fn normalize_section(&self, section: Section, entries: &RawSection) -> SectionMap {
        entries
            .iter()
            .map(|(key, raw)| {
                let reference = entries.get(&format!("{key}ref"));
                (key.clone(), self.normalize(section, key, raw, reference))
            })
            .collect()
    }

    /// Normalize one raw value. `reference` is the hemisphere/direction
    /// sibling for GPS keys and is ignored by every other rule.
    pub fn normalize(
        &self,
        section: Section,
        key: &str,
        raw: &RawValue,
        reference: Option<&RawValue>,
    ) -> TagValue {
        let converted = match key {
            "usercomment" | "title" | "comment" | "author" | "subject" => {
                raw.as_bytes().map(|b| TagValue::text(decode_text(b)))
            }
            "filedatetime" => raw
                .as_i64()
                .and_then(format_file_timestamp)
                .map(TagValue::text),
            "datetimeoriginal" | "datetime" | "datetimedigitized" => {
                raw.to_text().and_then(|s| self.date(&s)).map(TagValue::text)
            }
            "gpslatitude" | "gpslongitude" | "gps_latitude" | "gps_longitude" => {
                let reference = reference.and_then(RawValue::to_text);
                gps(raw, reference.as_deref())
            }
            "gpsaltitude" | "gpsimgdirection" => {
                let reference = reference
                    .and_then(RawValue::to_text)
                    .unwrap_or_else(|| "0".to_string());
                gps(raw, Some(&reference))
            }
            "exposuretime" => fraction_with_unit(raw, "s"),
            "focallength" => fraction_with_unit(raw, "mm"),
            "keywords" if section == Section::Iptc => keywords(raw),
            k if dictionary::is_enum_tag(k) => Some(enum_labels(k, raw)),
            _ => None,
        };
        converted.unwrap_or_else(|| passthrough(raw))
    }

    fn date(&self, value: &str) -> Option<String> {
        let iso = exif_date_to_iso(value)?;
        match self.granularity {
            Granularity::Default => Some(iso),
            Granularity::Day => {
                let (date, _) = iso.split_once('T')?;
                Some(format!("{date}T00:00:00"))
            }
        }
    }
}

/// Trimmed, UTF-8-repaired scalar (or list of scalars) for keys no rule
/// claims.
pub fn passthrough(raw: &RawValue) -> TagValue {
    match raw {
        RawValue::List(items) => TagValue::List(items.iter().flat_map(scalars).collect()),
        other => TagValue::Scalar(scalar(other)),
    }
}

fn scalar(raw: &RawValue) -> Scalar {
    match raw {
        RawValue::Bytes(b) => Scalar::Text(repair_text(b)),
        RawValue::Integer(n) => Scalar::Integer(*n),
        RawValue::Float(x) => Scalar::Float(*x),
        RawValue::List(items) => {
            let joined: Vec<String> = items.iter().flat_map(scalars).map(|s| s.to_string()).collect();
            Scalar::Text(joined.join(" "))
        }
    }
}

fn scalars(raw: &RawValue) -> Vec<Scalar> {
    match raw {
        RawValue::List(items) => items.iter().flat_map(scalars).collect(),
        other => vec![scalar(other)],
    }
}

// ── text ─────────────────────────────────────────────────────────────

/// Decode free-text tags: `UNICODE` comments are UTF-16LE after the 8-byte
/// header, other charset headers are stripped, anything else is repaired.
pub fn decode_text(bytes: &[u8]) -> String {
    if bytes.starts_with(UNICODE_MARKER) {
        let body = bytes.get(8..).unwrap_or_default();
        let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(body);
        return text.replace('\0', "").trim().to_string();
    }
    let body = TEXT_HEADERS
        .iter()
        .find_map(|header| bytes.strip_prefix(*header))
        .unwrap_or(bytes);
    repair_text(body)
}

/// Valid UTF-8 is kept; anything else is read as Windows-1252. NUL padding
/// and surrounding whitespace are removed.
pub fn repair_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            decoded.into_owned()
        }
    };
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

// ── dates ────────────────────────────────────────────────────────────

/// `"YYYY:MM:DD HH:MM:SS"` -> `"YYYY-MM-DDTHH:MM:SS"`.
///
/// Returns `None` for anything not in the EXIF shape, including strings that
/// are already ISO 8601.
///
/// ```rust
/// use exif_meta::normalize::exif_date_to_iso;
///
/// assert_eq!(
///     exif_date_to_iso("2004:02:12 15:19:21").as_deref(),
///     Some("2004-02-12T15:19:21")
/// );
/// assert_eq!(exif_date_to_iso("2004-02-12T15:19:21"), None);
/// ```
pub fn exif_date_to_iso(value: &str) -> Option<String> {
    let (date, time) = value.trim().split_once(' ')?;
    let time = time.trim();
    if !colon_triplet(date) || !colon_triplet(time) {
        return None;
    }
    Some(format!("{}T{time}", date.replace(':', "-")))
}

fn colon_triplet(s: &str) -> bool {
    let parts: Vec<&str> = s.split(':').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

/// Unix seconds -> local time as `YYYY-MM-DDTHH:MM:SS+HH:MM`.
pub fn format_file_timestamp(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

// ── fractions and GPS ────────────────────────────────────────────────

fn parse_fraction(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => value.trim().parse().ok(),
    }
}

/// Render a `"top/bottom"` fraction the way camera UIs show it.
///
/// - `top > bottom`: the quotient, rounded to two decimals unless exact
/// - `top == bottom`: `"1"`
/// - `top < bottom`: `"1/bottom"` when `top` is 1, `"0"` when it is 0,
///   otherwise `"1/"` plus `bottom / top` rounded to a whole number
///
/// The result is always text, whole quotients included, since callers append
/// a unit (`"1.5"` becomes `"1.5mm"`). Returns `None` for malformed input or
/// a zero denominator.
pub fn normalise_fraction(value: &str) -> Option<String> {
    let (top, bottom) = value.split_once('/')?;
    let top: f64 = top.trim().parse().ok()?;
    let bottom: f64 = bottom.trim().parse().ok()?;
    if bottom == 0.0 {
        return None;
    }

    let text = if top > bottom {
        if top % bottom == 0.0 {
            format!("{}", top / bottom)
        } else {
            format!("{}", ((top / bottom) * 100.0).round() / 100.0)
        }
    } else if top == bottom {
        "1".to_string()
    } else if top == 1.0 {
        format!("1/{bottom}")
    } else if top == 0.0 {
        "0".to_string()
    } else {
        format!("1/{}", (bottom / top).round())
    };
    Some(text)
}

/// Sum `component_i / 60^i` over degree/minute/second components given as
/// `"num/den"` (or plain numbers), negated for `S` and `W` references.
///
/// ```rust
/// use exif_meta::normalize::gps_to_decimal;
///
/// let north = gps_to_decimal(&["40/1", "26/1", "46/1"], Some("N")).unwrap();
/// assert!((north - 40.446111).abs() < 1e-5);
///
/// let south = gps_to_decimal(&["40/1", "26/1", "46/1"], Some("S")).unwrap();
/// assert_eq!(south, -north);
/// ```
pub fn gps_to_decimal(components: &[&str], reference: Option<&str>) -> Option<f64> {
    if components.is_empty() {
        return None;
    }
    let mut decimal = 0.0;
    for (i, component) in components.iter().enumerate() {
        decimal += parse_fraction(component)? / 60f64.powi(i as i32);
    }
    let negative = reference
        .map(|r| r.trim())
        .is_some_and(|r| r.eq_ignore_ascii_case("S") || r.eq_ignore_ascii_case("W"));
    Some(if negative { -decimal.abs() } else { decimal })
}

fn gps(raw: &RawValue, reference: Option<&str>) -> Option<TagValue> {
    let components: Vec<String> = match raw {
        RawValue::List(items) => items.iter().map(RawValue::to_text).collect::<Option<_>>()?,
        other => vec![other.to_text()?],
    };
    let refs: Vec<&str> = components.iter().map(String::as_str).collect();
    gps_to_decimal(&refs, reference).map(|d| TagValue::Scalar(Scalar::Float(d)))
}

fn fraction_with_unit(raw: &RawValue, unit: &str) -> Option<TagValue> {
    let text = raw.to_text()?;
    if !text.contains('/') {
        return None;
    }
    normalise_fraction(&text).map(|f| TagValue::text(format!("{f}{unit}")))
}

// ── enums and keywords ───────────────────────────────────────────────

fn enum_labels(tag: &str, raw: &RawValue) -> TagValue {
    let label = |item: &RawValue| -> Scalar {
        item.to_text()
            .and_then(|code| dictionary::enum_label(tag, &code))
            .map(Scalar::from)
            .unwrap_or_else(|| scalar(item))
    };
    match raw {
        RawValue::List(items) => TagValue::List(items.iter().map(label).collect()),
        other => TagValue::Scalar(label(other)),
    }
}

/// Split `;`-joined keyword strings and drop empty entries. Kept entries are
/// not trimmed, so `"a; b"` yields `" b"`.
///
/// ```rust
/// use exif_meta::normalize::split_keywords;
///
/// assert_eq!(split_keywords(&["Paris;Friends;"]), vec!["Paris", "Friends"]);
/// assert_eq!(split_keywords(&["Paris; Friends"]), vec!["Paris", " Friends"]);
/// ```
pub fn split_keywords<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(';'))
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn keywords(raw: &RawValue) -> Option<TagValue> {
    let values: Vec<String> = match raw {
        RawValue::List(items) => items.iter().filter_map(RawValue::to_text).collect(),
        other => vec![other.to_text()?],
    };
    let mut keywords: Vec<Scalar> = split_keywords(&values).into_iter().map(Scalar::from).collect();
    Some(match keywords.len() {
        1 => TagValue::Scalar(keywords.remove(0)),
        _ => TagValue::List(keywords),
    })
}
