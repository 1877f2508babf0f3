//! End-to-end extraction from JPEG fixtures built on the fly: pixels from
//! `image`, EXIF from kamadak-exif's writer, IPTC APP13 spliced in with
//! img-parts.

use exif::experimental::Writer;
use exif::{Context, Field, In, Rational, Tag, Value};
use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::{Bytes, ImageEXIF};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use exif_meta::config::{Config, Granularity};
use exif_meta::model::{Scalar, Section, TagDescriptor, TagValue};
use exif_meta::pipeline::{filter_metadata, read_metadata};

// ── fixtures ─────────────────────────────────────────────────────────

fn rgb_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    encode(image::DynamicImage::ImageRgb8(img))
}

fn gray_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::GrayImage::from_pixel(width, height, image::Luma([128]));
    encode(image::DynamicImage::ImageLuma8(img))
}

fn encode(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn field(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

fn ascii(s: &str) -> Value {
    Value::Ascii(vec![s.as_bytes().to_vec()])
}

fn rationals(parts: &[(u32, u32)]) -> Value {
    Value::Rational(
        parts
            .iter()
            .map(|&(num, denom)| Rational { num, denom })
            .collect(),
    )
}

fn ucs2(s: &str) -> Value {
    let mut bytes: Vec<u8> = s.encode_utf16().flat_map(|c| c.to_le_bytes()).collect();
    bytes.extend_from_slice(&[0, 0]);
    Value::Byte(bytes)
}

fn camera_fields() -> Vec<Field> {
    vec![
        field(Tag::Make, ascii("Canon")),
        field(Tag::Model, ascii("Canon EOS 350D DIGITAL")),
        field(Tag::Orientation, Value::Short(vec![6])),
        field(Tag::DateTime, ascii("2004:02:12 15:19:21")),
        field(Tag::DateTimeOriginal, ascii("2004:02:12 15:19:21")),
        field(Tag::ExposureTime, rationals(&[(1, 200)])),
        field(Tag::FNumber, rationals(&[(56, 10)])),
        field(Tag::FocalLength, rationals(&[(50, 1)])),
        field(Tag::Flash, Value::Short(vec![16])),
        field(Tag::WhiteBalance, Value::Short(vec![0])),
        field(
            Tag::UserComment,
            Value::Undefined(b"ASCII\0\0\0Evening walk".to_vec(), 0),
        ),
        field(Tag::GPSLatitudeRef, ascii("S")),
        field(Tag::GPSLatitude, rationals(&[(40, 1), (26, 1), (46, 1)])),
        field(Tag::GPSLongitudeRef, ascii("W")),
        field(Tag::GPSLongitude, rationals(&[(73, 1), (59, 1), (0, 1)])),
        field(Tag::GPSAltitude, rationals(&[(1234, 10)])),
        field(Tag(Context::Tiff, 0x9C9B), ucs2("Sunset")),
    ]
}

fn tiff(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for f in fields {
        writer.push_field(f);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}

fn app13(records: &[(u8, u8, &[u8])]) -> Vec<u8> {
    let mut iim = Vec::new();
    for (record, dataset, value) in records {
        iim.extend_from_slice(&[0x1C, *record, *dataset]);
        iim.extend_from_slice(&(value.len() as u16).to_be_bytes());
        iim.extend_from_slice(value);
    }
    wrap_iim(&iim)
}

/// Photoshop 3.0 payload with one 8BIM IPTC resource holding `iim` verbatim.
fn wrap_iim(iim: &[u8]) -> Vec<u8> {
    let mut out = b"Photoshop 3.0\0".to_vec();
    out.extend_from_slice(b"8BIM");
    out.extend_from_slice(&0x0404u16.to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&(iim.len() as u32).to_be_bytes());
    out.extend_from_slice(iim);
    if iim.len() % 2 != 0 {
        out.push(0);
    }
    out
}

/// Splice EXIF (TIFF bytes) and an APP13 payload into a plain JPEG.
fn write_fixture(
    dir: &Path,
    name: &str,
    base: Vec<u8>,
    exif: Option<Vec<u8>>,
    iptc: Option<Vec<u8>>,
) -> PathBuf {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(base)).unwrap();
    if let Some(tiff) = exif {
        jpeg.set_exif(Some(Bytes::from(tiff)));
    }
    if let Some(payload) = iptc {
        let segment = JpegSegment::new_with_contents(0xED, Bytes::from(payload));
        jpeg.segments_mut().insert(1, segment);
    }
    let path = dir.join(name);
    fs::write(&path, jpeg.encoder().bytes()).unwrap();
    path
}

fn full_fixture(dir: &Path) -> PathBuf {
    write_fixture(
        dir,
        "full.jpg",
        rgb_jpeg(32, 16),
        Some(tiff(&camera_fields())),
        Some(app13(&[
            (2, 25, b"Paris;Friends;"),
            (2, 120, b"Eiffel tower at dusk"),
            (2, 90, b"Paris"),
        ])),
    )
}

// ── full document ────────────────────────────────────────────────────

#[test]
fn reads_every_section() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    assert_eq!(doc.get(Section::Ifd0, "make"), Some(&TagValue::text("Canon")));
    assert_eq!(
        doc.get(Section::Ifd0, "model"),
        Some(&TagValue::text("Canon EOS 350D DIGITAL"))
    );
    assert_eq!(doc.get(Section::Ifd0, "orientation"), Some(&TagValue::text("Rotate 90 CW")));
    assert_eq!(
        doc.get(Section::Ifd0, "datetime"),
        Some(&TagValue::text("2004-02-12T15:19:21"))
    );
    assert_eq!(
        doc.get(Section::Exif, "datetimeoriginal"),
        Some(&TagValue::text("2004-02-12T15:19:21"))
    );
    assert_eq!(doc.get(Section::Exif, "exposuretime"), Some(&TagValue::text("1/200s")));
    assert_eq!(doc.get(Section::Exif, "focallength"), Some(&TagValue::text("50mm")));
    assert_eq!(
        doc.get(Section::Exif, "flash"),
        Some(&TagValue::text("Flash did not fire, compulsory flash mode"))
    );
    assert_eq!(doc.get(Section::Exif, "whitebalance"), Some(&TagValue::text("Auto")));
    assert_eq!(
        doc.get(Section::Exif, "usercomment"),
        Some(&TagValue::text("Evening walk"))
    );
    assert_eq!(doc.get(Section::Winxp, "title"), Some(&TagValue::text("Sunset")));
}

#[test]
fn gps_is_signed_decimal() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    let lat = doc.get(Section::Gps, "gpslatitude").unwrap();
    assert!(matches!(lat, TagValue::Scalar(Scalar::Float(_))));
    assert!((lat.as_f64().unwrap() + 40.44611).abs() < 1e-4);

    let lon = doc.get(Section::Gps, "gpslongitude").unwrap().as_f64().unwrap();
    assert!((lon + 73.98333).abs() < 1e-4);

    let alt = doc.get(Section::Gps, "gpsaltitude").unwrap().as_f64().unwrap();
    assert!((alt - 123.4).abs() < 1e-9);
}

#[test]
fn iptc_datasets_by_name() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    assert_eq!(
        doc.get(Section::Iptc, "keywords"),
        Some(&TagValue::List(vec!["Paris".into(), "Friends".into()]))
    );
    assert_eq!(
        doc.get(Section::Iptc, "caption"),
        Some(&TagValue::text("Eiffel tower at dusk"))
    );
    assert_eq!(doc.get(Section::Iptc, "city"), Some(&TagValue::text("Paris")));
}

#[test]
fn computed_and_file_sections() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    assert_eq!(
        doc.get(Section::Computed, "width"),
        Some(&TagValue::Scalar(Scalar::Integer(32)))
    );
    assert_eq!(
        doc.get(Section::Computed, "height"),
        Some(&TagValue::Scalar(Scalar::Integer(16)))
    );
    assert_eq!(
        doc.get(Section::Computed, "html"),
        Some(&TagValue::text("width=\"32\" height=\"16\""))
    );
    assert_eq!(
        doc.get(Section::Computed, "iscolor"),
        Some(&TagValue::Scalar(Scalar::Integer(1)))
    );
    assert_eq!(doc.get(Section::Computed, "aperturefnumber"), Some(&TagValue::text("f/5.6")));
    assert_eq!(
        doc.get(Section::Computed, "byteordermotorola"),
        Some(&TagValue::Scalar(Scalar::Integer(1)))
    );

    assert_eq!(doc.get(Section::File, "filename"), Some(&TagValue::text("full.jpg")));
    assert_eq!(doc.get(Section::File, "mimetype"), Some(&TagValue::text("image/jpeg")));
    assert_eq!(
        doc.get(Section::File, "filetype"),
        Some(&TagValue::Scalar(Scalar::Integer(2)))
    );
    let size = fs::metadata(&path).unwrap().len() as i64;
    assert_eq!(
        doc.get(Section::File, "filesize"),
        Some(&TagValue::Scalar(Scalar::Integer(size)))
    );
    let stamp = doc.get(Section::File, "filedatetime").unwrap().as_str().unwrap();
    assert_eq!(&stamp[10..11], "T");

    let found = doc.get(Section::File, "sectionsfound").unwrap().as_str().unwrap();
    assert!(found.contains("IFD0"));
    assert!(found.contains("GPS"));
    assert!(found.contains("IPTC"));
}

#[test]
fn all_keys_lowercase() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    for (_, entries) in doc.sections() {
        for key in entries.keys() {
            assert_eq!(key, &key.to_lowercase());
        }
    }
}

// ── configuration ────────────────────────────────────────────────────

#[test]
fn day_granularity() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let config = Config {
        granularity: Granularity::Day,
        ..Config::default()
    };
    let doc = read_metadata(&path, &config);

    assert_eq!(
        doc.get(Section::Exif, "datetimeoriginal"),
        Some(&TagValue::text("2004-02-12T00:00:00"))
    );
}

#[test]
fn empty_values_follow_config() {
    let dir = TempDir::new().unwrap();
    let fields = vec![
        field(Tag::Model, ascii("X100")),
        field(Tag::Artist, ascii("   ")),
    ];
    let path = write_fixture(dir.path(), "blank.jpg", rgb_jpeg(8, 8), Some(tiff(&fields)), None);

    let doc = read_metadata(&path, &Config::default());
    assert!(doc.get(Section::Ifd0, "artist").is_none());

    let keep = Config {
        write_empty_values: true,
        ..Config::default()
    };
    let doc = read_metadata(&path, &keep);
    assert_eq!(doc.get(Section::Ifd0, "artist"), Some(&TagValue::text("")));
}

// ── filtering ────────────────────────────────────────────────────────

#[test]
fn filter_to_single_tag() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());

    let wanted = [TagDescriptor::from_field_name("field_ifd0_model").unwrap()];
    let filtered = filter_metadata(&doc, &wanted);

    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered.get(Section::Ifd0, "model"),
        Some(&TagValue::text("Canon EOS 350D DIGITAL"))
    );
}

#[test]
fn json_shape() {
    let dir = TempDir::new().unwrap();
    let path = full_fixture(dir.path());
    let doc = read_metadata(&path, &Config::default());
    let wanted = [
        TagDescriptor::new("ifd0", "model").unwrap(),
        TagDescriptor::new("iptc", "keywords").unwrap(),
    ];

    let json = serde_json::to_value(filter_metadata(&doc, &wanted)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "ifd0": { "model": "Canon EOS 350D DIGITAL" },
            "iptc": { "keywords": ["Paris", "Friends"] }
        })
    );
}

// ── degraded input ───────────────────────────────────────────────────

#[test]
fn jpeg_without_metadata() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "plain.jpeg", gray_jpeg(10, 4), None, None);
    let doc = read_metadata(&path, &Config::default());

    assert!(doc.section(Section::Ifd0).is_none());
    assert!(doc.section(Section::Iptc).is_none());
    assert_eq!(
        doc.get(Section::Computed, "iscolor"),
        Some(&TagValue::Scalar(Scalar::Integer(0)))
    );
    assert_eq!(
        doc.get(Section::Computed, "width"),
        Some(&TagValue::Scalar(Scalar::Integer(10)))
    );
    assert!(doc.get(Section::File, "filename").is_some());
}

#[test]
fn uppercase_extension_is_read() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        dir.path(),
        "UPPER.JPG",
        rgb_jpeg(8, 8),
        Some(tiff(&[field(Tag::Model, ascii("X100"))])),
        None,
    );
    let doc = read_metadata(&path, &Config::default());
    assert_eq!(doc.get(Section::Ifd0, "model"), Some(&TagValue::text("X100")));
}

#[test]
fn non_jpeg_extension_is_empty() {
    let dir = TempDir::new().unwrap();
    let jpeg_bytes = fs::read(full_fixture(dir.path())).unwrap();
    let renamed = dir.path().join("photo.png");
    fs::write(&renamed, jpeg_bytes).unwrap();

    assert!(read_metadata(&renamed, &Config::default()).is_empty());
}

#[test]
fn garbage_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.jpg");
    fs::write(&path, b"this is not an image at all").unwrap();

    assert!(read_metadata(&path, &Config::default()).is_empty());
}

#[test]
fn missing_file_is_empty() {
    let doc = read_metadata(Path::new("/nonexistent/dir/photo.jpg"), &Config::default());
    assert!(doc.is_empty());
}

#[test]
fn broken_exif_keeps_iptc() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        dir.path(),
        "broken-exif.jpg",
        rgb_jpeg(8, 8),
        Some(b"MM\0*garbage".to_vec()),
        Some(app13(&[(2, 25, b"kept")])),
    );
    let doc = read_metadata(&path, &Config::default());

    assert!(doc.section(Section::Ifd0).is_none());
    assert_eq!(doc.get(Section::Iptc, "keywords"), Some(&TagValue::text("kept")));
}

#[test]
fn broken_iptc_keeps_exif() {
    let dir = TempDir::new().unwrap();
    let mut payload = b"Photoshop 3.0\08BIM".to_vec();
    payload.extend_from_slice(&[0x04, 0x04, 0, 0, 0xFF, 0xFF, 0xFF, 0x00, 0x1C]);

    let path = write_fixture(
        dir.path(),
        "broken-iptc.jpg",
        rgb_jpeg(8, 8),
        Some(tiff(&[field(Tag::Model, ascii("X100"))])),
        Some(payload),
    );
    let doc = read_metadata(&path, &Config::default());

    assert!(doc.section(Section::Iptc).is_none());
    assert_eq!(doc.get(Section::Ifd0, "model"), Some(&TagValue::text("X100")));
}

#[test]
fn truncated_iptc_keeps_earlier_datasets() {
    let dir = TempDir::new().unwrap();
    let mut iim = vec![0x1C, 2, 120, 0, 3];
    iim.extend_from_slice(b"abc");
    iim.extend_from_slice(&[0x1C, 2, 25, 0, 5]);
    iim.extend_from_slice(b"Paris");
    // city claims 50 bytes but carries one
    iim.extend_from_slice(&[0x1C, 2, 90, 0, 0x32, b'x']);

    let path = write_fixture(
        dir.path(),
        "short-iptc.jpg",
        rgb_jpeg(8, 8),
        None,
        Some(wrap_iim(&iim)),
    );
    let doc = read_metadata(&path, &Config::default());

    assert_eq!(doc.get(Section::Iptc, "caption"), Some(&TagValue::text("abc")));
    assert_eq!(doc.get(Section::Iptc, "keywords"), Some(&TagValue::text("Paris")));
    assert!(doc.get(Section::Iptc, "city").is_none());
}

#[test]
fn bad_exif_entry_keeps_other_fields() {
    let dir = TempDir::new().unwrap();
    // Big-endian IFD0: Make points far outside the block, Model is inline
    let mut tiff = b"MM\x00\x2A\x00\x00\x00\x08".to_vec();
    tiff.extend_from_slice(&[0x00, 0x02]);
    tiff.extend_from_slice(&[0x01, 0x0F, 0x00, 0x02, 0, 0, 0, 10, 0x00, 0x00, 0xFF, 0xFF]);
    tiff.extend_from_slice(&[0x01, 0x10, 0x00, 0x02, 0, 0, 0, 4, b'X', b'1', b'0', 0]);
    tiff.extend_from_slice(&[0, 0, 0, 0]);

    let path = write_fixture(dir.path(), "bad-entry.jpg", rgb_jpeg(8, 8), Some(tiff), None);
    let doc = read_metadata(&path, &Config::default());

    assert_eq!(doc.get(Section::Ifd0, "model"), Some(&TagValue::text("X10")));
    assert!(doc.get(Section::Ifd0, "make").is_none());
    assert_eq!(
        doc.get(Section::Computed, "byteordermotorola"),
        Some(&TagValue::Scalar(Scalar::Integer(1)))
    );
}
