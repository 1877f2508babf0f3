use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_meta::config::{Config, ExtractionStrategy, Granularity};
use exif_meta::model::{MetadataDocument, TagDescriptor};
use exif_meta::{dictionary, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exif-meta",
    version,
    about = "Read EXIF/IPTC metadata from JPEG images as normalized, section-qualified tags"
)]
struct Cli {
    /// Image files or directories to read
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: exif-meta.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default exif-meta.json and exit
    #[arg(long)]
    init: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Only report these tags, as field names (e.g. exif_model,iptc_keywords)
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    tags: Vec<String>,

    /// Keep empty values in the output
    #[arg(long = "write-empty")]
    write_empty: bool,

    /// Truncate dates to the day (time becomes 00:00:00)
    #[arg(long = "day-granularity")]
    day_granularity: bool,

    /// Read tags with the exiftool binary instead of the built-in parser
    #[arg(long)]
    exiftool: bool,

    /// Print every known field key and exit
    #[arg(long = "list-keys")]
    list_keys: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --list-keys
    if cli.list_keys {
        for key in dictionary::known_field_keys() {
            println!("{key}");
        }
        return Ok(());
    }

    // Handle --init
    if cli.init {
        let config = Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config, then apply CLI overrides
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.write_empty {
        config.write_empty_values = true;
    }
    if cli.day_granularity {
        config.granularity = Granularity::Day;
    }
    if cli.exiftool {
        config.extraction = ExtractionStrategy::ExifTool;
    }

    let wanted = parse_tags(&cli.tags)?;

    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        bail!("No JPEG files found in the specified paths.");
    }
    log::info!("Found {} image(s) to read", images.len());

    let mut results = Vec::new();
    for image_path in &images {
        let mut document = pipeline::read_metadata(image_path, &config);
        if !wanted.is_empty() {
            document = pipeline::filter_metadata(&document, &wanted);
        }
        if !cli.json {
            print_document(image_path, &document);
        }
        results.push((image_path, document));
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, document)| {
                serde_json::json!({
                    "path": path.display().to_string(),
                    "metadata": document,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    let empty = results.iter().filter(|(_, d)| d.is_empty()).count();
    log::info!(
        "Done: {} with metadata, {empty} without, out of {} images",
        results.len() - empty,
        results.len()
    );

    Ok(())
}

/// Parse `--tags` field names into descriptors.
fn parse_tags(tags: &[String]) -> Result<Vec<TagDescriptor>> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| match TagDescriptor::from_field_name(t) {
            Some(d) => Ok(d),
            None => bail!("`{t}` is not a <section>_<tag> field name"),
        })
        .collect()
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Value column width (in characters) for the metadata table.
const VAL_WIDTH: usize = 44;
/// Indentation for continuation lines (aligns with value column).
const INDENT: &str = "                                 ";

/// Print one document as a `section_tag : value` table.
fn print_document(path: &Path, document: &MetadataDocument) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(78));

    let rows = document.flatten();
    if rows.is_empty() {
        println!("  {DIM}(no metadata found){RESET}");
        println!();
        return;
    }

    for (key, value) in &rows {
        print_row(key, value);
    }
    println!();
}

/// Print a single row in the metadata table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<30}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {tag_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}
