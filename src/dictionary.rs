//! Static lookup tables: IPTC dataset names, EXIF enum labels, codec name
//! aliases and the list of known field keys.
//!
//! Labels follow the ExifTool tag documentation.

use crate::model::Section;

/// IPTC-IIM dataset code (`"<record>#<dataset>"`) -> snake_case name.
const IPTC_DESCRIPTORS: &[(&str, &str)] = &[
    ("2#202", "object_data_preview_data"),
    ("2#201", "object_data_preview_file_format_version"),
    ("2#200", "object_data_preview_file_format"),
    ("2#154", "audio_outcue"),
    ("2#153", "audio_duration"),
    ("2#152", "audio_sampling_resolution"),
    ("2#151", "audio_sampling_rate"),
    ("2#150", "audio_type"),
    ("2#135", "language_identifier"),
    ("2#131", "image_orientation"),
    ("2#130", "image_type"),
    ("2#125", "rasterized_caption"),
    ("2#122", "writer"),
    ("2#120", "caption"),
    ("2#118", "contact"),
    ("2#116", "copyright_notice"),
    ("2#115", "source"),
    ("2#110", "credit"),
    ("2#105", "headline"),
    ("2#103", "original_transmission_reference"),
    ("2#101", "country_name"),
    ("2#100", "country_code"),
    ("2#095", "state"),
    ("2#092", "sublocation"),
    ("2#090", "city"),
    ("2#085", "by_line_title"),
    ("2#080", "by_line"),
    ("2#075", "object_cycle"),
    ("2#070", "program_version"),
    ("2#065", "originating_program"),
    ("2#063", "digital_creation_time"),
    ("2#062", "digital_creation_date"),
    ("2#060", "creation_time"),
    ("2#055", "creation_date"),
    ("2#050", "reference_number"),
    ("2#047", "reference_date"),
    ("2#045", "reference_service"),
    ("2#042", "action_advised"),
    ("2#040", "special_instruction"),
    ("2#038", "expiration_time"),
    ("2#037", "expiration_date"),
    ("2#035", "release_time"),
    ("2#030", "release_date"),
    ("2#027", "content_location_name"),
    ("2#026", "content_location_code"),
    ("2#025", "keywords"),
    ("2#022", "fixture_identifier"),
    ("2#020", "supplemental_category"),
    ("2#015", "category"),
    ("2#010", "subject_reference"),
    ("2#008", "editorial_update"),
    ("2#007", "edit_status"),
    ("2#005", "object_name"),
    ("2#004", "object_attribute_reference"),
    ("2#003", "object_type_reference"),
    ("2#000", "record_version"),
    ("1#090", "envelope_character_set"),
];

/// Dataset code of the (possibly repeated) IPTC keywords record.
pub const IPTC_KEYWORDS: &str = "2#025";

/// Human-readable name for an IPTC dataset code such as `"2#025"`.
pub fn iptc_descriptor(code: &str) -> Option<&'static str> {
    IPTC_DESCRIPTORS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// All IPTC descriptor names, in table order.
pub fn iptc_names() -> impl Iterator<Item = &'static str> {
    IPTC_DESCRIPTORS.iter().map(|(_, name)| *name)
}

/// ExifTool IPTC tag names (lowercased, `-` as `_`) -> dataset names above.
const EXIFTOOL_IPTC_NAMES: &[(&str, &str)] = &[
    ("applicationrecordversion", "record_version"),
    ("objecttypereference", "object_type_reference"),
    ("objectattributereference", "object_attribute_reference"),
    ("objectname", "object_name"),
    ("editstatus", "edit_status"),
    ("editorialupdate", "editorial_update"),
    ("supplementalcategories", "supplemental_category"),
    ("fixtureidentifier", "fixture_identifier"),
    ("contentlocationcode", "content_location_code"),
    ("contentlocationname", "content_location_name"),
    ("releasedate", "release_date"),
    ("releasetime", "release_time"),
    ("expirationdate", "expiration_date"),
    ("expirationtime", "expiration_time"),
    ("specialinstructions", "special_instruction"),
    ("actionadvised", "action_advised"),
    ("referenceservice", "reference_service"),
    ("referencedate", "reference_date"),
    ("referencenumber", "reference_number"),
    ("datecreated", "creation_date"),
    ("timecreated", "creation_time"),
    ("digitalcreationdate", "digital_creation_date"),
    ("digitalcreationtime", "digital_creation_time"),
    ("originatingprogram", "originating_program"),
    ("programversion", "program_version"),
    ("objectcycle", "object_cycle"),
    ("by_linetitle", "by_line_title"),
    ("sub_location", "sublocation"),
    ("province_state", "state"),
    ("country_primarylocationcode", "country_code"),
    ("country_primarylocationname", "country_name"),
    ("originaltransmissionreference", "original_transmission_reference"),
    ("copyrightnotice", "copyright_notice"),
    ("caption_abstract", "caption"),
    ("writer_editor", "writer"),
    ("rasterizedcaption", "rasterized_caption"),
    ("imagetype", "image_type"),
    ("imageorientation", "image_orientation"),
    ("languageidentifier", "language_identifier"),
    ("audiotype", "audio_type"),
    ("audiosamplingrate", "audio_sampling_rate"),
    ("audiosamplingresolution", "audio_sampling_resolution"),
    ("audioduration", "audio_duration"),
    ("audiooutcue", "audio_outcue"),
    ("objectpreviewfileformat", "object_data_preview_file_format"),
    ("objectpreviewfileversion", "object_data_preview_file_format_version"),
    ("objectpreviewdata", "object_data_preview_data"),
    ("codedcharacterset", "envelope_character_set"),
];

/// Name the native reader gives the IPTC dataset exiftool calls `key`.
/// Names that already match (`keywords`, `city`, `headline`) pass through.
pub fn exiftool_iptc_name(key: &str) -> &str {
    EXIFTOOL_IPTC_NAMES
        .iter()
        .find(|(tool, _)| *tool == key)
        .map_or(key, |(_, name)| *name)
}

type EnumTable = &'static [(&'static str, &'static str)];

const COMPONENTS_CONFIGURATION: EnumTable = &[
    ("0", "-"),
    ("1", "Y"),
    ("2", "Cb"),
    ("3", "Cr"),
    ("4", "R"),
    ("5", "G"),
    ("6", "B"),
];

const COMPRESSION: EnumTable = &[
    ("1", "Uncompressed"),
    ("2", "CCITT 1D"),
    ("3", "T4/Group 3 Fax"),
    ("4", "T6/Group 4 Fax"),
    ("5", "LZW"),
    ("6", "JPEG (old-style)"),
    ("7", "JPEG"),
    ("8", "Adobe Deflate"),
    ("9", "JBIG B&W"),
    ("10", "JBIG Color"),
    ("99", "JPEG"),
    ("262", "Kodak 262"),
    ("32766", "Next"),
    ("32767", "Sony ARW Compressed"),
    ("32769", "Packed RAW"),
    ("32770", "Samsung SRW Compressed"),
    ("32771", "CCIRLEW"),
    ("32773", "PackBits"),
    ("32809", "Thunderscan"),
    ("32867", "Kodak KDC Compressed"),
    ("32895", "IT8CTPAD"),
    ("32896", "IT8LW"),
    ("32897", "IT8MP"),
    ("32898", "IT8BL"),
    ("32908", "PixarFilm"),
    ("32909", "PixarLog"),
    ("32946", "Deflate"),
    ("32947", "DCS"),
    ("34661", "JBIG"),
    ("34676", "SGILog"),
    ("34677", "SGILog24"),
    ("34712", "JPEG 2000"),
    ("34713", "Nikon NEF Compressed"),
    ("34715", "JBIG2 TIFF FX"),
    ("34718", "Microsoft Document Imaging (MDI) Binary Level Codec"),
    ("34719", "Microsoft Document Imaging (MDI) Progressive Transform Codec"),
    ("34720", "Microsoft Document Imaging (MDI) Vector"),
    ("65000", "Kodak DCR Compressed"),
    ("65535", "Pentax PEF Compressed"),
];

const NORMAL_LOW_HIGH: EnumTable = &[("0", "Normal"), ("1", "Low"), ("2", "High")];

const EXPOSURE_MODE: EnumTable = &[("0", "Auto"), ("1", "Manual"), ("2", "Auto bracket")];

// 9 is not standard EXIF; the Canon EOS 7D writes it for bulb.
const EXPOSURE_PROGRAM: EnumTable = &[
    ("0", "Not Defined"),
    ("1", "Manual"),
    ("2", "Program AE"),
    ("3", "Aperture-priority AE"),
    ("4", "Shutter speed priority AE"),
    ("5", "Creative (Slow speed)"),
    ("6", "Action (High speed)"),
    ("7", "Portrait"),
    ("8", "Landscape"),
    ("9", "Bulb"),
];

const FLASH: EnumTable = &[
    ("0", "Flash did not fire"),
    ("1", "Flash fired"),
    ("5", "Strobe return light not detected"),
    ("7", "Strobe return light detected"),
    ("9", "Flash fired, compulsory flash mode"),
    ("13", "Flash fired, compulsory flash mode, return light not detected"),
    ("15", "Flash fired, compulsory flash mode, return light detected"),
    ("16", "Flash did not fire, compulsory flash mode"),
    ("24", "Flash did not fire, auto mode"),
    ("25", "Flash fired, auto mode"),
    ("29", "Flash fired, auto mode, return light not detected"),
    ("31", "Flash fired, auto mode, return light detected"),
    ("32", "No flash function"),
    ("65", "Flash fired, red-eye reduction mode"),
    ("69", "Flash fired, red-eye reduction mode, return light not detected"),
    ("71", "Flash fired, red-eye reduction mode, return light detected"),
    ("73", "Flash fired, compulsory flash mode, red-eye reduction mode"),
    (
        "77",
        "Flash fired, compulsory flash mode, red-eye reduction mode, return light not detected",
    ),
    (
        "79",
        "Flash fired, compulsory flash mode, red-eye reduction mode, return light detected",
    ),
    ("89", "Flash fired, auto mode, red-eye reduction mode"),
    (
        "93",
        "Flash fired, auto mode, return light not detected, red-eye reduction mode",
    ),
    (
        "95",
        "Flash fired, auto mode, return light detected, red-eye reduction mode",
    ),
];

// 1, 4 and 5 are not standard EXIF.
const FOCAL_PLANE_RESOLUTION_UNIT: EnumTable = &[
    ("1", "None"),
    ("2", "inches"),
    ("3", "cm"),
    ("4", "mm"),
    ("5", "um"),
];

const GAIN_CONTROL: EnumTable = &[
    ("0", "None"),
    ("1", "Low gain up"),
    ("2", "High gain up"),
    ("3", "Low gain down"),
    ("4", "High gain down"),
];

const LIGHT_SOURCE: EnumTable = &[
    ("0", "Unknown"),
    ("1", "Daylight"),
    ("2", "Fluorescent"),
    ("3", "Tungsten (Incandescent)"),
    ("4", "Flash"),
    ("9", "Fine Weather"),
    ("10", "Cloudy"),
    ("11", "Shade"),
    ("12", "Daylight Fluorescent"),
    ("13", "Day White Fluorescent"),
    ("14", "Cool White Fluorescent"),
    ("15", "White Fluorescent"),
    ("16", "Warm White Fluorescent"),
    ("17", "Standard Light A"),
    ("18", "Standard Light B"),
    ("19", "Standard Light C"),
    ("20", "D55"),
    ("21", "D65"),
    ("22", "D75"),
    ("23", "D50"),
    ("24", "ISO Studio Tungsten"),
    ("255", "Other"),
];

const METERING_MODE: EnumTable = &[
    ("0", "Unknown"),
    ("1", "Average"),
    ("2", "Center-weighted average"),
    ("3", "Spot"),
    ("4", "Multi-spot"),
    ("5", "Multi-segment"),
    ("6", "Partial"),
    ("255", "Other"),
];

const ORIENTATION: EnumTable = &[
    ("1", "Horizontal (normal)"),
    ("2", "Mirror horizontal"),
    ("3", "Rotate 180"),
    ("4", "Mirror vertical"),
    ("5", "Mirror horizontal and rotate 270 CW"),
    ("6", "Rotate 90 CW"),
    ("7", "Mirror horizontal and rotate 90 CW"),
    ("8", "Rotate 270 CW"),
];

// 1 is not standard EXIF.
const RESOLUTION_UNIT: EnumTable = &[("1", "None"), ("2", "inches"), ("3", "cm")];

const SCENE_CAPTURE_TYPE: EnumTable = &[
    ("0", "Standard"),
    ("1", "Landscape"),
    ("2", "Portrait"),
    ("3", "Night"),
];

// 1 and 6 are not standard EXIF.
const SENSING_METHOD: EnumTable = &[
    ("1", "Monochrome area"),
    ("2", "One-chip color area"),
    ("3", "Two-chip color area"),
    ("4", "Three-chip color area"),
    ("5", "Color sequential area"),
    ("6", "Monochrome linear"),
    ("7", "Trilinear"),
    ("8", "Color sequential linear"),
];

const SENSITIVITY_TYPE: EnumTable = &[
    ("0", "Unknown"),
    ("1", "Standard Output Sensitivity"),
    ("2", "Recommended Exposure Index"),
    ("3", "ISO Speed"),
    ("4", "Standard Output Sensitivity and Recommended Exposure Index"),
    ("5", "Standard Output Sensitivity and ISO Speed"),
    ("6", "Recommended Exposure Index and ISO Speed"),
    (
        "7",
        "Standard Output Sensitivity, Recommended Exposure Index and ISO Speed",
    ),
];

const SHARPNESS: EnumTable = &[("0", "Normal"), ("1", "Soft"), ("2", "Hard")];

const SUBJECT_DISTANCE_RANGE: EnumTable = &[
    ("0", "Unknown"),
    ("1", "Macro"),
    ("2", "Close"),
    ("3", "Distant"),
];

const WHITE_BALANCE: EnumTable = &[("0", "Auto"), ("1", "Manual")];

fn enum_table(tag: &str) -> Option<EnumTable> {
    let table = match tag {
        "componentsconfiguration" => COMPONENTS_CONFIGURATION,
        "compression" => COMPRESSION,
        "contrast" | "saturation" => NORMAL_LOW_HIGH,
        "exposuremode" => EXPOSURE_MODE,
        "exposureprogram" => EXPOSURE_PROGRAM,
        "flash" => FLASH,
        "focalplaneresolutionunit" => FOCAL_PLANE_RESOLUTION_UNIT,
        "gaincontrol" => GAIN_CONTROL,
        "lightsource" => LIGHT_SOURCE,
        "meteringmode" => METERING_MODE,
        "orientation" => ORIENTATION,
        "resolutionunit" => RESOLUTION_UNIT,
        "scenecapturetype" => SCENE_CAPTURE_TYPE,
        "sensingmethod" => SENSING_METHOD,
        "sensitivitytype" => SENSITIVITY_TYPE,
        "sharpness" => SHARPNESS,
        "subjectdistancerange" => SUBJECT_DISTANCE_RANGE,
        "whitebalance" => WHITE_BALANCE,
        _ => return None,
    };
    Some(table)
}

/// Whether `tag` carries an enumerated code with a label table.
pub fn is_enum_tag(tag: &str) -> bool {
    enum_table(tag).is_some()
}

/// Descriptive label for an enumerated EXIF code, e.g. `("flash", "16")`.
///
/// Returns `None` for tags without a table and for unknown codes.
pub fn enum_label(tag: &str, code: &str) -> Option<&'static str> {
    enum_table(tag)?
        .iter()
        .find(|(c, _)| *c == code.trim())
        .map(|(_, label)| *label)
}

/// Map a lowercased codec tag name to the historic key used by field names.
pub fn codec_key_alias(name: &str) -> &str {
    match name {
        "photographicsensitivity" => "isospeedratings",
        "pixelxdimension" => "exifimagewidth",
        "pixelydimension" => "exifimagelength",
        "exififdpointer" => "exif_ifd_pointer",
        "gpsinfoifdpointer" => "gps_ifd_pointer",
        "interopifdpointer" => "interoperabilityoffset",
        "gpsversionid" => "gpsversion",
        other => other,
    }
}

/// Windows XP tags (IFD0, UCS-2LE bytes) and their `winxp` keys.
pub fn winxp_key(tag_number: u16) -> Option<&'static str> {
    match tag_number {
        0x9C9B => Some("title"),
        0x9C9C => Some("comments"),
        0x9C9D => Some("author"),
        0x9C9E => Some("keywords"),
        0x9C9F => Some("subject"),
        _ => None,
    }
}

/// Key assigned to a tag the codec has no name for.
pub fn undefined_tag_key(tag_number: u16) -> String {
    format!("undefinedtag:0x{tag_number:04x}")
}

const COMMON_KEYS: &[&str] = &[
    "filename",
    "filedatetime",
    "filesize",
    "filetype",
    "mimetype",
    "sectionsfound",
    "html",
    "height",
    "width",
    "iscolor",
    "byteordermotorola",
    "ccdwidth",
    "aperturefnumber",
    "usercomment",
    "usercommentencoding",
    "thumbnail.filetype",
    "thumbnail.mimetype",
];

const IFD0_KEYS: &[&str] = &[
    "imagedescription",
    "make",
    "model",
    "orientation",
    "xresolution",
    "yresolution",
    "resolutionunit",
    "software",
    "datetime",
    "artist",
    "ycbcrpositioning",
    "title",
    "comments",
    "author",
    "subject",
    "exif_ifd_pointer",
    "gps_ifd_pointer",
];

const THUMBNAIL_KEYS: &[&str] = &[
    "compression",
    "jpeginterchangeformat",
    "jpeginterchangeformatlength",
];

const EXIF_KEYS: &[&str] = &[
    "lens",
    "lensid",
    "lensmake",
    "lensmodel",
    "exposuretime",
    "fnumber",
    "exposureprogram",
    "isospeedratings",
    "sensitivitytype",
    "exifversion",
    "datetimeoriginal",
    "datetimedigitized",
    "componentsconfiguration",
    "shutterspeedvalue",
    "aperturevalue",
    "exposurebiasvalue",
    "meteringmode",
    "lightsource",
    "flash",
    "focallength",
    "flashpixversion",
    "colorspace",
    "exifimagewidth",
    "exifimagelength",
    "interoperabilityoffset",
    "focalplanexresolution",
    "focalplaneyresolution",
    "focalplaneresolutionunit",
    "sensingmethod",
    "exposuremode",
    "whitebalance",
    "digitalzoomratio",
    "focallengthin35mmfilm",
    "scenecapturetype",
    "gaincontrol",
    "contrast",
    "saturation",
    "sharpness",
    "subjectdistancerange",
    "imageuniqueid",
];

const GPS_KEYS: &[&str] = &[
    "gpsversion",
    "gpslatituderef",
    "gpslatitude",
    "gpslongituderef",
    "gpslongitude",
    "gpsaltituderef",
    "gpsaltitude",
    "gpsimgdirectionref",
    "gpsimgdirection",
];

const INTEROP_KEYS: &[&str] = &["interoperabilityindex", "interoperabilityversion"];

const FILE_KEYS: &[&str] = &[
    "filename",
    "filedatetime",
    "filesize",
    "filetype",
    "mimetype",
    "sectionsfound",
];

type KeyGroups = &'static [&'static [&'static str]];

const FILE_GROUPS: KeyGroups = &[FILE_KEYS];
const COMPUTED_GROUPS: KeyGroups = &[COMMON_KEYS, &["copyright"]];
const IFD0_GROUPS: KeyGroups = &[COMMON_KEYS, IFD0_KEYS];
const THUMBNAIL_GROUPS: KeyGroups = &[COMMON_KEYS, IFD0_KEYS, THUMBNAIL_KEYS];
const EXIF_GROUPS: KeyGroups = &[COMMON_KEYS, IFD0_KEYS, THUMBNAIL_KEYS, EXIF_KEYS];
const GPS_GROUPS: KeyGroups = &[COMMON_KEYS, IFD0_KEYS, THUMBNAIL_KEYS, EXIF_KEYS, GPS_KEYS];
const INTEROP_GROUPS: KeyGroups = &[
    COMMON_KEYS,
    IFD0_KEYS,
    THUMBNAIL_KEYS,
    EXIF_KEYS,
    GPS_KEYS,
    INTEROP_KEYS,
];
const WINXP_GROUPS: KeyGroups = &[
    COMMON_KEYS,
    IFD0_KEYS,
    THUMBNAIL_KEYS,
    EXIF_KEYS,
    GPS_KEYS,
    INTEROP_KEYS,
    &["keywords"],
];

/// Key groups offered for each EXIF-derived section. Later sections carry
/// the keys of the earlier groups too, as the historic key list does.
fn section_key_groups(section: Section) -> KeyGroups {
    match section {
        Section::File => FILE_GROUPS,
        Section::Computed => COMPUTED_GROUPS,
        Section::Ifd0 => IFD0_GROUPS,
        Section::Thumbnail => THUMBNAIL_GROUPS,
        Section::Exif => EXIF_GROUPS,
        Section::Gps => GPS_GROUPS,
        Section::Interop => INTEROP_GROUPS,
        Section::Winxp => WINXP_GROUPS,
        Section::Iptc | Section::Xmp => &[],
    }
}

/// Every known `<section>_<tag>` field key, sorted and de-duplicated.
///
/// This describes the schema for callers building field pickers; it says
/// nothing about what a particular file contains.
pub fn known_field_keys() -> Vec<String> {
    let mut keys: Vec<String> = Section::ALL
        .into_iter()
        .flat_map(|section| {
            section_key_groups(section)
                .iter()
                .flat_map(|group| group.iter())
                .map(move |tag| format!("{section}_{tag}"))
        })
        .chain(iptc_names().map(|name| format!("iptc_{name}")))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
