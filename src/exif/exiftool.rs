use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::Path;
use std::process::Command;

use super::raw::{RawSegment, RawValue};
use crate::dictionary;
use crate::model::Section;

/// Run exiftool (`-j -G1 -a -n`) on `path` and group its tags by section.
///
/// `-G1` prefixes every tag with its family-1 group (`IFD0:Make`,
/// `GPS:GPSLatitude`), `-n` keeps values numeric so the normalizer sees the
/// same shapes the native reader produces.
pub fn read_exiftool(binary: &str, path: &Path) -> Result<RawSegment> {
    let output = Command::new(binary)
        .args(["-j", "-G1", "-a", "-n"])
        .arg(path)
        .output()
        .with_context(|| format!("Failed to run exiftool at `{binary}`"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "exiftool exited with {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        );
    }

    let json: Value =
        serde_json::from_slice(&output.stdout).context("Failed to parse exiftool JSON")?;
    sections_from_json(&json)
}

/// Convert exiftool's JSON dump into a [`RawSegment`].
///
/// exiftool returns an array with one object per file; only the first is
/// used. Tags from groups without a section (maker notes, ICC profile, ...)
/// are dropped.
pub fn sections_from_json(json: &Value) -> Result<RawSegment> {
    let object = json
        .as_array()
        .and_then(|files| files.first())
        .and_then(Value::as_object)
        .context("exiftool output is not an array of objects")?;

    let mut raw = RawSegment::new();
    for (name, value) in object {
        let Some((group, tag)) = name.split_once(':') else {
            continue; // SourceFile
        };
        let Some(section) = group_section(group) else {
            continue;
        };
        let Some(value) = json_to_raw(value) else {
            continue;
        };
        let key = tag_key(tag);
        let key = match section {
            Section::Iptc => dictionary::exiftool_iptc_name(&key),
            _ => key.as_str(),
        };
        raw.insert(section, key, value);
    }
    Ok(raw)
}

/// Family-1 exiftool group -> section.
fn group_section(group: &str) -> Option<Section> {
    let section = match group {
        "IFD0" => Section::Ifd0,
        "ExifIFD" => Section::Exif,
        "GPS" => Section::Gps,
        "InteropIFD" => Section::Interop,
        "IFD1" => Section::Thumbnail,
        "File" | "System" => Section::File,
        "Composite" => Section::Computed,
        "IPTC" => Section::Iptc,
        g if g.starts_with("XMP") => Section::Xmp,
        _ => return None,
    };
    Some(section)
}

fn tag_key(tag: &str) -> String {
    tag.to_lowercase().replace('-', "_")
}

fn json_to_raw(value: &Value) -> Option<RawValue> {
    match value {
        Value::String(s) => Some(RawValue::text(s.as_str())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(RawValue::Integer(i)),
            None => n.as_f64().map(RawValue::Float),
        },
        Value::Bool(b) => Some(RawValue::Integer(i64::from(*b))),
        Value::Array(items) => {
            RawValue::from_components(items.iter().filter_map(json_to_raw).collect())
        }
        Value::Null | Value::Object(_) => None,
    }
}
