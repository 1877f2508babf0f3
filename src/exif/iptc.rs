use anyhow::{Result, bail};
use img_parts::jpeg::Jpeg;

// ============================================================================
// IPTC-IIM Metadata Reading (APP13 / Photoshop 3.0)
// ============================================================================

const IPTC_HEADER: &[u8] = b"Photoshop 3.0\0";
const IPTC_8BIM: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;
const IIM_TAG_MARKER: u8 = 0x1C;
const APP13: u8 = 0xED;

/// One IIM dataset: `"<record>#<dataset>"` code and its payload.
pub type Dataset = (String, Vec<u8>);

/// Read every IIM dataset from the JPEG's Photoshop APP13 segment(s).
///
/// Returns an empty list when the image carries no IPTC block.
pub fn read_iptc(jpeg: &Jpeg) -> Result<Vec<Dataset>> {
    let mut datasets = Vec::new();
    for segment in jpeg.segments() {
        if segment.marker() != APP13 || !segment.contents().starts_with(IPTC_HEADER) {
            continue;
        }
        for block in iptc_blocks(segment.contents())? {
            datasets.extend(parse_iim(block));
        }
    }
    Ok(datasets)
}

/// Walk the 8BIM resources of an APP13 payload and return the contents of
/// each IPTC-IIM resource (0x0404).
///
/// A truncated resource ends the walk; blocks found before it are kept.
pub fn iptc_blocks(data: &[u8]) -> Result<Vec<&[u8]>> {
    let Some(rest) = data.strip_prefix(IPTC_HEADER) else {
        bail!("APP13 segment lacks the Photoshop 3.0 header");
    };
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos + 12 <= rest.len() {
        if &rest[pos..pos + 4] != IPTC_8BIM {
            break;
        }
        let resource_id = u16::from_be_bytes([rest[pos + 4], rest[pos + 5]]);
        // Pascal string: length byte + name, padded to even
        let pascal_len = rest[pos + 6] as usize;
        let pascal_padded = if (pascal_len + 1) % 2 == 0 {
            pascal_len + 1
        } else {
            pascal_len + 2
        };
        let data_start = pos + 6 + pascal_padded;
        if data_start + 4 > rest.len() {
            log::warn!("Truncated 8BIM resource header at offset {pos}");
            break;
        }
        let data_len = u32::from_be_bytes([
            rest[data_start],
            rest[data_start + 1],
            rest[data_start + 2],
            rest[data_start + 3],
        ]) as usize;
        let body_start = data_start + 4;
        let body_end = body_start + data_len;
        if body_end > rest.len() {
            log::warn!("8BIM resource 0x{resource_id:04x} runs past the segment end");
            break;
        }

        if resource_id == IPTC_RESOURCE_ID {
            blocks.push(&rest[body_start..body_end]);
        }

        pos = if data_len % 2 == 0 { body_end } else { body_end + 1 };
    }

    // Old writers put bare IIM records right after the header
    if blocks.is_empty() && rest.first() == Some(&IIM_TAG_MARKER) {
        blocks.push(rest);
    }
    Ok(blocks)
}

/// Parse IIM records (`0x1C record dataset length data`).
///
/// Parsing stops at the first malformed record and returns the datasets
/// read up to that point.
pub fn parse_iim(data: &[u8]) -> Vec<Dataset> {
    let mut datasets = Vec::new();
    let mut pos = 0;

    while pos + 5 <= data.len() {
        if data[pos] != IIM_TAG_MARKER {
            // Padding after the last record
            if data[pos..].iter().all(|b| *b == 0) {
                break;
            }
            log::warn!("Unexpected byte 0x{:02x} at IIM offset {pos}", data[pos]);
            break;
        }
        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let mut len = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;
        pos += 5;

        // Extended dataset: low 15 bits give the size of the length field
        if len & 0x8000 != 0 {
            let width = len & 0x7FFF;
            if width == 0 || width > 4 || pos + width > data.len() {
                log::warn!("Bad extended IIM length for {record}#{dataset:03}");
                break;
            }
            len = data[pos..pos + width]
                .iter()
                .fold(0usize, |acc, b| (acc << 8) | *b as usize);
            pos += width;
        }

        if pos + len > data.len() {
            log::warn!("IIM dataset {record}#{dataset:03} runs past the block end");
            break;
        }
        datasets.push((format!("{record}#{dataset:03}"), data[pos..pos + len].to_vec()));
        pos += len;
    }

    datasets
}
