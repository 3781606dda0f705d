//! Template writer: renders mapped rows behind the template's two metadata lines.
//!
//! Output layout is the template header, then the type row, then one record
//! per row with cells in header order. An empty row set renders to zero bytes
//! with no metadata lines at all.

use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::{error::MapError, io_utils, rows::Row, template::Template};

pub const DEFAULT_PLACEHOLDER_TAG: &str = "text";

/// Source of the second metadata line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum TypeRowPolicy {
    /// Copy the template's own type row.
    #[default]
    Template,
    /// Tag every column with the placeholder tag.
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub type_row: TypeRowPolicy,
    pub placeholder_tag: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            type_row: TypeRowPolicy::Template,
            placeholder_tag: DEFAULT_PLACEHOLDER_TAG.to_string(),
        }
    }
}

pub fn render(
    rows: &[Row],
    template: &Template,
    options: &WriteOptions,
) -> Result<Vec<u8>, MapError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = io_utils::open_csv_writer(Vec::new(), options.delimiter);
    writer.write_record(template.header())?;
    match options.type_row {
        TypeRowPolicy::Template => writer.write_record(template.type_row())?,
        TypeRowPolicy::Placeholder => writer.write_record(
            std::iter::repeat_n(options.placeholder_tag.as_str(), template.width()),
        )?,
    }

    for row in rows {
        if row.columns() == template.header() {
            writer.write_record(row.values())?;
        } else {
            writer.write_record(
                template
                    .header()
                    .iter()
                    .map(|column| row.get(column).unwrap_or_default()),
            )?;
        }
    }

    let buffer = writer
        .into_inner()
        .map_err(|err| MapError::Csv(csv::Error::from(err.into_error())))?;
    if options.encoding == UTF_8 {
        return Ok(buffer);
    }
    let text = String::from_utf8(buffer).map_err(|_| MapError::Encode {
        encoding: options.encoding.name(),
    })?;
    io_utils::encode_text(&text, options.encoding)
}
