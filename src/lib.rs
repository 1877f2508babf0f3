//! # exif-meta
//!
//! EXIF/IPTC metadata normalizer for JPEG images: turns the raw, loosely typed tags
//! embedded in a file into a section-qualified map of cleaned values, with readable
//! labels for enumerated codes, unit-aware fractions, signed decimal GPS coordinates
//! and ISO 8601 dates.
//!
//! ## Quick Start
//!
//! The simplest way to use the library is through the pipeline module, which handles
//! the full read → normalize → merge flow:
//!
//! ```rust,no_run
//! use exif_meta::config::Config;
//! use exif_meta::model::Section;
//! use exif_meta::pipeline::{collect_images, read_metadata};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load config from file (empty-value retention, date granularity, strategy)
//!     let config = Config::load(Some("exif-meta.json".as_ref()))?;
//!
//!     // Collect JPEG files from paths (files or directories)
//!     let images = collect_images(&[PathBuf::from("./photos")]);
//!
//!     for path in &images {
//!         let doc = read_metadata(path, &config);
//!         if let Some(taken) = doc.get(Section::Exif, "datetimeoriginal") {
//!             println!("{}: taken {taken}", path.display());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Field Naming Convention
//!
//! Callers that map metadata onto their own fields name those fields
//! `<section>_<tag>` and let the library resolve them:
//!
//! ```rust,no_run
//! use exif_meta::config::Config;
//! use exif_meta::model::TagDescriptor;
//! use exif_meta::pipeline::{filter_metadata, read_metadata};
//! use std::path::Path;
//!
//! let wanted: Vec<TagDescriptor> = ["field_exif_model", "field_gps_gpslatitude", "iptc_keywords"]
//!     .iter()
//!     .filter_map(|name| TagDescriptor::from_field_name(name))
//!     .collect();
//!
//! let doc = read_metadata(Path::new("photo.jpg"), &Config::default());
//! for (key, value) in filter_metadata(&doc, &wanted).flatten() {
//!     println!("{key} = {value}");
//! }
//! ```
//!
//! ## Sections
//!
//! | Section | Contents |
//! |---------|----------|
//! | `file` | File name, size, modification time, MIME type |
//! | `computed` | Frame size, colour flag, byte order, f-number, comment charset |
//! | `ifd0` | Primary image IFD (make, model, orientation, ...) |
//! | `exif` | Exif sub-IFD (exposure, dates, flash, lens, ...) |
//! | `gps` | GPS sub-IFD, coordinates as signed decimal degrees |
//! | `interop` | Interoperability IFD |
//! | `thumbnail` | IFD1 (embedded thumbnail) |
//! | `winxp` | Windows XP title/comments/author/keywords/subject |
//! | `iptc` | IPTC-IIM datasets from APP13, by readable name |
//! | `xmp` | XMP properties (exiftool strategy only) |
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`dictionary`] — IPTC dataset names, EXIF enum labels, known field keys
//! - [`exif`] — Raw EXIF/IPTC extraction (native or via exiftool)
//! - [`model`] — Documents, sections, tag values and descriptors
//! - [`normalize`] — Per-tag value reformatting
//! - [`pipeline`] — Extraction entry point, merging, filtering and file collection

pub mod config;
pub mod dictionary;
pub mod exif;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use config::Config;
pub use model::{MetadataDocument, Section, TagDescriptor, TagValue};
pub use pipeline::{filter_metadata, read_metadata};
