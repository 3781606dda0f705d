//! Target template: the column header plus its parallel type-tag row.

use std::sync::Arc;

use crate::{error::MapError, io_utils, reader::ReadOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    header: Arc<[String]>,
    type_row: Vec<String>,
}

impl Template {
    /// Builds a template, requiring one type tag per header column.
    pub fn new(header: Vec<String>, type_row: Vec<String>) -> Result<Self, MapError> {
        if header.len() != type_row.len() {
            return Err(MapError::TemplateShape {
                header: header.len(),
                type_row: type_row.len(),
            });
        }
        Ok(Self {
            header: header.into(),
            type_row,
        })
    }

    /// Reads the header from the first line and the type row from the second.
    /// Any further lines are sample rows and are ignored. A blank second line
    /// is a type row of one empty tag.
    pub fn load(bytes: &[u8], options: &ReadOptions) -> Result<Self, MapError> {
        let text = io_utils::decode_bytes(bytes, options.encoding)?;
        let mut lines = text.split_inclusive('\n');

        let header = match lines.next() {
            Some(line) => parse_line(line, options.delimiter)?,
            None => return Err(MapError::EmptyTemplate),
        };
        let type_row = match lines.next() {
            Some(line) => parse_line(line, options.delimiter)?,
            None => return Err(MapError::MissingTypeRow),
        };
        Self::new(header, type_row)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub(crate) fn shared_header(&self) -> &Arc<[String]> {
        &self.header
    }

    pub fn type_row(&self) -> &[String] {
        &self.type_row
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Parses one physical line as a single record.
fn parse_line(line: &str, delimiter: u8) -> Result<Vec<String>, MapError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut reader = io_utils::open_csv_reader(line.as_bytes(), delimiter);
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(vec![String::new()]),
    }
}
