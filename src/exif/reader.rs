use ::exif::{Context as IfdContext, Exif, Field, In, Reader, Tag, Value};
use anyhow::{Context, Result};
use img_parts::jpeg::Jpeg;
use std::path::Path;
use std::time::UNIX_EPOCH;

use super::raw::{RawSegment, RawValue};
use crate::dictionary;
use crate::model::Section;

const TAG_MAKER_NOTE: u16 = 0x927C;
const TAG_COMPONENTS_CONFIGURATION: u16 = 0x9101;

/// Numeric file type code reported for JPEG.
const FILETYPE_JPEG: i64 = 2;

/// Dimensions and channel count from the JPEG start-of-frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub width: u16,
    pub height: u16,
    pub components: u8,
}

/// Parse the TIFF structure held by an APP1 `Exif` segment.
///
/// Malformed entries are skipped with a warning; the fields that did
/// decode are kept.
pub fn parse_tiff(tiff: Vec<u8>) -> Result<Exif> {
    Reader::new()
        .continue_on_error(true)
        .read_raw(tiff)
        .or_else(|e| e.distill_partial_result(warn_skipped))
        .context("Failed to parse EXIF TIFF data")
}

/// Let the codec locate the APP1 segment itself, for files img-parts
/// refuses to split into segments.
pub fn parse_container(bytes: &[u8]) -> Result<Exif> {
    let mut cursor = std::io::Cursor::new(bytes);
    Reader::new()
        .continue_on_error(true)
        .read_from_container(&mut cursor)
        .or_else(|e| e.distill_partial_result(warn_skipped))
        .context("Failed to read EXIF from JPEG container")
}

fn warn_skipped(errors: Vec<::exif::Error>) {
    for e in errors {
        log::warn!("Skipped malformed EXIF entry: {e}");
    }
}

/// Sort every EXIF field into its section under its lowercase key.
pub fn read_fields(exif: &Exif, raw: &mut RawSegment) {
    for field in exif.fields() {
        let number = field.tag.1;
        if number == TAG_MAKER_NOTE {
            continue;
        }

        let section = field_section(field);
        if section == Section::Ifd0 {
            if let Some(key) = dictionary::winxp_key(number) {
                if let Some(text) = decode_winxp(&field.value) {
                    raw.insert(Section::Winxp, key, RawValue::text(text));
                }
                continue;
            }
        }

        let Some(value) = convert_value(field) else {
            log::debug!("Skipping EXIF tag 0x{number:04x} with an empty value");
            continue;
        };
        raw.insert(section, &field_key(&field.tag), value);
    }
}

fn field_section(field: &Field) -> Section {
    if field.ifd_num == In::THUMBNAIL {
        return Section::Thumbnail;
    }
    match field.tag.context() {
        IfdContext::Tiff => Section::Ifd0,
        IfdContext::Exif => Section::Exif,
        IfdContext::Gps => Section::Gps,
        IfdContext::Interop => Section::Interop,
        _ => Section::Ifd0,
    }
}

/// Lowercase codec name, mapped to the historic key where one exists.
fn field_key(tag: &Tag) -> String {
    if tag.description().is_none() {
        return dictionary::undefined_tag_key(tag.1);
    }
    let name = tag.to_string().to_lowercase();
    dictionary::codec_key_alias(&name).to_string()
}

fn convert_value(field: &Field) -> Option<RawValue> {
    fn ints<T: Copy + Into<i64>>(v: &[T]) -> Option<RawValue> {
        RawValue::from_components(v.iter().map(|n| RawValue::Integer((*n).into())).collect())
    }

    match &field.value {
        Value::Byte(v) => ints(v),
        Value::Short(v) => ints(v),
        Value::Long(v) => ints(v),
        Value::SByte(v) => ints(v),
        Value::SShort(v) => ints(v),
        Value::SLong(v) => ints(v),
        Value::Ascii(strings) => {
            RawValue::from_components(strings.iter().map(|s| RawValue::Bytes(s.clone())).collect())
        }
        Value::Rational(v) => RawValue::from_components(
            v.iter()
                .map(|r| RawValue::fraction(r.num.into(), r.denom.into()))
                .collect(),
        ),
        Value::SRational(v) => RawValue::from_components(
            v.iter()
                .map(|r| RawValue::fraction(r.num.into(), r.denom.into()))
                .collect(),
        ),
        Value::Float(v) => {
            RawValue::from_components(v.iter().map(|x| RawValue::Float((*x).into())).collect())
        }
        Value::Double(v) => {
            RawValue::from_components(v.iter().map(|x| RawValue::Float(*x)).collect())
        }
        Value::Undefined(bytes, _) => {
            if field.tag.1 == TAG_COMPONENTS_CONFIGURATION || is_small_binary(bytes) {
                ints(bytes)
            } else {
                Some(RawValue::Bytes(bytes.clone()))
            }
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Short undefined payloads carrying codes rather than text (FileSource,
/// SceneType).
fn is_small_binary(bytes: &[u8]) -> bool {
    bytes.len() <= 4 && bytes.iter().any(|b| *b < 0x20)
}

/// XP* tags are BYTE arrays holding NUL-terminated UCS-2LE text.
fn decode_winxp(value: &Value) -> Option<String> {
    let bytes = match value {
        Value::Byte(v) | Value::Undefined(v, _) => v,
        _ => return None,
    };
    let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
    Some(text.trim_end_matches('\0').to_string())
}

/// Width, height and component count from the first SOF segment.
pub fn frame_info(jpeg: &Jpeg) -> Option<FrameInfo> {
    jpeg.segments()
        .iter()
        .find(|s| is_sof_marker(s.marker()))
        .and_then(|s| {
            let c = s.contents();
            if c.len() < 6 {
                return None;
            }
            Some(FrameInfo {
                height: u16::from_be_bytes([c[1], c[2]]),
                width: u16::from_be_bytes([c[3], c[4]]),
                components: c[5],
            })
        })
}

/// SOF0..SOF15, minus DHT (C4), JPG (C8) and DAC (CC).
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Values derived from the frame header and the parsed EXIF fields.
pub fn read_computed(exif: Option<&Exif>, frame: Option<FrameInfo>, raw: &mut RawSegment) {
    if let Some(frame) = frame {
        raw.insert(
            Section::Computed,
            "html",
            RawValue::text(format!(
                "width=\"{}\" height=\"{}\"",
                frame.width, frame.height
            )),
        );
        raw.insert(Section::Computed, "height", RawValue::Integer(frame.height.into()));
        raw.insert(Section::Computed, "width", RawValue::Integer(frame.width.into()));
        raw.insert(
            Section::Computed,
            "iscolor",
            RawValue::Integer(i64::from(frame.components >= 3)),
        );
    }

    let Some(exif) = exif else {
        return;
    };

    raw.insert(
        Section::Computed,
        "byteordermotorola",
        RawValue::Integer(i64::from(!exif.little_endian())),
    );

    if let Some(Value::Rational(v)) = primary(exif, Tag::FNumber) {
        if let Some(r) = v.first().filter(|r| r.denom != 0) {
            raw.insert(
                Section::Computed,
                "aperturefnumber",
                RawValue::text(format!("f/{:.1}", r.num as f64 / r.denom as f64)),
            );
        }
    }

    if let Some(Value::Undefined(bytes, _)) = primary(exif, Tag::UserComment) {
        raw.insert(Section::Computed, "usercomment", RawValue::Bytes(bytes.clone()));
        raw.insert(
            Section::Computed,
            "usercommentencoding",
            RawValue::text(user_comment_encoding(bytes)),
        );
    }

    if let Some(Value::Ascii(strings)) = primary(exif, Tag::Copyright) {
        if let Some(first) = strings.first() {
            raw.insert(Section::Computed, "copyright", RawValue::Bytes(first.clone()));
        }
    }

    if exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)
        .is_some()
    {
        raw.insert(
            Section::Computed,
            "thumbnail.filetype",
            RawValue::Integer(FILETYPE_JPEG),
        );
        raw.insert(
            Section::Computed,
            "thumbnail.mimetype",
            RawValue::text("image/jpeg"),
        );
    }
}

fn primary(exif: &Exif, tag: Tag) -> Option<&Value> {
    exif.get_field(tag, In::PRIMARY).map(|f| &f.value)
}

/// The 8-byte character code at the head of a UserComment.
fn user_comment_encoding(bytes: &[u8]) -> String {
    let header = &bytes[..bytes.len().min(8)];
    let name = String::from_utf8_lossy(header)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();
    if name.is_empty() {
        "UNDEFINED".to_string()
    } else {
        name
    }
}

/// The `file` section: name, size and modification time of the image.
pub fn read_file_section(path: &Path, raw: &mut RawSegment) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    if let Some(name) = path.file_name() {
        raw.insert(
            Section::File,
            "filename",
            RawValue::text(name.to_string_lossy()),
        );
    }
    if let Ok(modified) = metadata.modified() {
        if let Ok(since) = modified.duration_since(UNIX_EPOCH) {
            raw.insert(
                Section::File,
                "filedatetime",
                RawValue::Integer(since.as_secs() as i64),
            );
        }
    }
    raw.insert(Section::File, "filesize", RawValue::Integer(metadata.len() as i64));
    raw.insert(Section::File, "filetype", RawValue::Integer(FILETYPE_JPEG));
    raw.insert(Section::File, "mimetype", RawValue::text("image/jpeg"));
    Ok(())
}
