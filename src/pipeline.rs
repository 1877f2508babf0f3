use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::dictionary;
use crate::exif::{self, RawSegment, RawValue};
use crate::model::{MetadataDocument, Section, SectionMap, TagDescriptor};
use crate::normalize::Normalizer;

/// Read and normalize the metadata of one image.
///
/// Never fails: non-JPEG, unreadable or malformed files give an empty
/// document, and a broken EXIF or IPTC block only costs its own section.
///
/// # Example
///
/// ```rust,no_run
/// use exif_meta::config::Config;
/// use exif_meta::model::Section;
/// use exif_meta::pipeline::read_metadata;
/// use std::path::Path;
///
/// let doc = read_metadata(Path::new("photo.jpg"), &Config::default());
/// if let Some(model) = doc.get(Section::Ifd0, "model") {
///     println!("Camera: {model}");
/// }
/// ```
pub fn read_metadata(path: &Path, config: &Config) -> MetadataDocument {
    let raw = exif::extract(path, config);
    let document = assemble(&raw, config);
    log::debug!(
        "{}: {} tags in {} sections",
        path.display(),
        document.len(),
        document.sections().count()
    );
    document
}

/// Normalize a raw segment into a document.
///
/// EXIF sections are taken as they are; IPTC datasets are renamed through
/// the dictionary and merged into the `iptc` section last, so they win over
/// any same-named entry an external tool already put there. Empty values are
/// dropped unless `write_empty_values` is set.
pub fn assemble(raw: &RawSegment, config: &Config) -> MetadataDocument {
    let normalizer = Normalizer::from_config(config);

    let exif_sections = raw
        .exif
        .iter()
        .map(|(section, entries)| (*section, normalizer.normalize_section(*section, entries)));
    let iptc = std::iter::once((Section::Iptc, iptc_section(raw, &normalizer)));

    exif_sections
        .chain(iptc)
        .map(|(section, entries)| (section, drop_empty(entries, config.write_empty_values)))
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}

fn iptc_section(raw: &RawSegment, normalizer: &Normalizer) -> SectionMap {
    raw.iptc
        .iter()
        .filter_map(|(code, values)| {
            let key = dictionary::iptc_descriptor(code).unwrap_or(code.as_str());
            let value = RawValue::from_components(
                values.iter().map(|v| RawValue::Bytes(v.clone())).collect(),
            )?;
            Some((key.to_string(), normalizer.normalize(Section::Iptc, key, &value, None)))
        })
        .collect()
}

fn drop_empty(entries: SectionMap, keep_empty: bool) -> SectionMap {
    if keep_empty {
        return entries;
    }
    entries
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// The entries of `document` named by `wanted`.
///
/// Descriptors with no matching entry are skipped; an empty result means
/// "no data", not an error.
pub fn filter_metadata(document: &MetadataDocument, wanted: &[TagDescriptor]) -> MetadataDocument {
    wanted
        .iter()
        .filter_map(|d| {
            let value = document.lookup(d)?.clone();
            Some((d.section, SectionMap::from([(d.tag.clone(), value)])))
        })
        .collect()
}

/// Collect JPEG files from the given paths (files or directories).
///
/// Directories are walked recursively. Only `.jpg`/`.jpeg` files (any case)
/// are kept.
///
/// # Example
///
/// ```rust,no_run
/// use exif_meta::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("photo.jpg"),       // single file
///     PathBuf::from("./photos/"),        // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if exif::is_jpeg_path(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && exif::is_jpeg_path(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}
