//! Raw EXIF and IPTC extraction from JPEG files.
//!
//! [`extract`] is the only entry point the rest of the crate needs. It picks a
//! strategy from the [`Config`]:
//!
//! - [`ExtractionStrategy::Native`] reads EXIF with `kamadak-exif` and the
//!   IPTC APP13 block with the parser in this module
//! - [`ExtractionStrategy::ExifTool`] shells out to exiftool and maps its
//!   groups onto the same sections
//!
//! Either way the result is a [`RawSegment`]: keys lowercased, values still
//! raw. Nothing here fails past the function boundary; unreadable or
//! malformed input degrades to an empty or partial segment with a warning.

mod exiftool;
mod iptc;
mod raw;
mod reader;

pub use exiftool::{read_exiftool, sections_from_json};
pub use iptc::{iptc_blocks, parse_iim, read_iptc};
pub use raw::{RawSection, RawSegment, RawValue};
pub use reader::FrameInfo;

use img_parts::Bytes;
use img_parts::ImageEXIF;
use img_parts::jpeg::Jpeg;
use std::path::Path;

use crate::config::{Config, ExtractionStrategy};
use crate::model::Section;

/// Extensions the extractor accepts, compared case-insensitively.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Whether `path` has a `.jpg`/`.jpeg` extension.
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| JPEG_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read the raw EXIF sections and IPTC datasets of a JPEG file.
///
/// Non-JPEG extensions and unreadable files yield an empty segment.
pub fn extract(path: &Path, config: &Config) -> RawSegment {
    if !is_jpeg_path(path) {
        log::debug!("Not a JPEG, skipping: {}", path.display());
        return RawSegment::new();
    }

    match config.extraction {
        ExtractionStrategy::Native => extract_native(path),
        ExtractionStrategy::ExifTool => match read_exiftool(&config.exiftool_location, path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("exiftool extraction failed for {}: {e:#}", path.display());
                RawSegment::new()
            }
        },
    }
}

fn extract_native(path: &Path) -> RawSegment {
    let mut raw = RawSegment::new();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Cannot read {}: {e}", path.display());
            return raw;
        }
    };

    let jpeg = match Jpeg::from_bytes(Bytes::from(bytes.clone())) {
        Ok(jpeg) => Some(jpeg),
        Err(e) => {
            log::warn!("Malformed JPEG structure in {}: {e}", path.display());
            None
        }
    };

    // EXIF (APP1)
    let exif = match &jpeg {
        Some(jpeg) => jpeg.exif().map(|tiff| reader::parse_tiff(tiff.to_vec())),
        None => Some(reader::parse_container(&bytes)),
    };
    let exif = match exif {
        Some(Ok(exif)) => Some(exif),
        Some(Err(e)) => {
            log::warn!("EXIF segment unreadable in {}: {e:#}", path.display());
            None
        }
        None => {
            log::debug!("No EXIF segment in {}", path.display());
            None
        }
    };
    if jpeg.is_none() && exif.is_none() {
        return raw;
    }
    if let Some(exif) = &exif {
        reader::read_fields(exif, &mut raw);
    }

    // IPTC (APP13)
    if let Some(jpeg) = &jpeg {
        match read_iptc(jpeg) {
            Ok(datasets) => {
                for (code, value) in datasets {
                    raw.push_iptc(code, value);
                }
            }
            Err(e) => log::warn!("IPTC segment unreadable in {}: {e:#}", path.display()),
        }
    }

    let frame = jpeg.as_ref().and_then(reader::frame_info);
    reader::read_computed(exif.as_ref(), frame, &mut raw);

    let found = sections_found_label(&raw);
    if let Err(e) = reader::read_file_section(path, &mut raw) {
        log::warn!("{e:#}");
    }
    raw.insert(Section::File, "sectionsfound", RawValue::text(found));

    raw
}

/// Uppercase names of the sections the file actually carried.
fn sections_found_label(raw: &RawSegment) -> String {
    raw.sections_found()
        .into_iter()
        .filter(|s| !matches!(s, Section::File | Section::Computed))
        .map(|s| s.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}
