use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    engine::MissingSourcePolicy,
    writer::{DEFAULT_PLACEHOLDER_TAG, TypeRowPolicy},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Map client CSV exports onto the Parts template", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Map a local CSV export onto a template file
    Map(MapArgs),
    /// Convert one uploaded object from a local bucket root
    Run(RunArgs),
    /// Handle an object-created event notification against a local bucket root
    Event(EventArgs),
    /// List mapping rules and check them against a template
    Mapping(MappingArgs),
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Input CSV file to map ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Template CSV whose first two lines define the output header and type row
    #[arg(short = 't', long = "template")]
    pub template: PathBuf,
    /// Mapping YAML file (built-in Parts mapping if omitted)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// CSV delimiter character for reading input and template
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    /// Where the second output line comes from
    #[arg(long = "type-row", value_enum, default_value = "template")]
    pub type_row: TypeRowPolicy,
    /// Tag written for every column when --type-row placeholder is used
    #[arg(long = "placeholder-tag", default_value = DEFAULT_PLACEHOLDER_TAG)]
    pub placeholder_tag: String,
    /// What to emit when a mapped source column is missing from the input
    #[arg(long = "missing-source", value_enum, default_value = "column-name")]
    pub missing_source: MissingSourcePolicy,
    /// Render the first N mapped rows as a table instead of writing CSV
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory holding one sub-directory per bucket
    #[arg(long)]
    pub root: PathBuf,
    /// Bucket name
    #[arg(long)]
    pub bucket: String,
    /// Object key of the uploaded file, e.g. input/acme/export.csv
    #[arg(long)]
    pub key: String,
    /// Run configuration YAML
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Mapping YAML file (built-in Parts mapping if omitted)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EventArgs {
    /// Event notification JSON ('-' for stdin)
    #[arg(short, long)]
    pub event: PathBuf,
    /// Directory holding one sub-directory per bucket
    #[arg(long)]
    pub root: PathBuf,
    /// Run configuration YAML
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Mapping YAML file (built-in Parts mapping if omitted)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MappingArgs {
    /// Mapping YAML file (built-in Parts mapping if omitted)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
    /// Template CSV to check the mapping against
    #[arg(short = 't', long = "template")]
    pub template: Option<PathBuf>,
    /// CSV delimiter character for reading the template
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
