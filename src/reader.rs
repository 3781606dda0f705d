//! Tabular reader: delimited bytes in, ordered rows out.
//!
//! The first record names the columns. Short records are padded with empty
//! cells; long records are rejected with [`MapError::MalformedRow`] carrying
//! the 1-based line on which the record starts. Blank lines are skipped.

use std::sync::Arc;

use csv::StringRecord;
use encoding_rs::{Encoding, UTF_8};

use crate::{
    error::MapError,
    io_utils,
    rows::{Row, Table},
};

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

/// Parses `bytes` into rows keyed by the header line.
pub fn parse(bytes: &[u8], options: &ReadOptions) -> Result<Vec<Row>, MapError> {
    read_table(bytes, options).map(|table| table.rows)
}

/// Parses `bytes`, keeping the header alongside the rows. Empty input yields
/// an empty table.
pub fn read_table(bytes: &[u8], options: &ReadOptions) -> Result<Table, MapError> {
    let text = io_utils::decode_bytes(bytes, options.encoding)?;
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), options.delimiter);
    let mut records = reader.records();

    let columns: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => return Ok(Table::default()),
    };
    let shared: Arc<[String]> = columns.clone().into();

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        check_width(&record, shared.len(), text.as_bytes())?;
        rows.push(Row::new(
            Arc::clone(&shared),
            record.iter().map(str::to_string).collect(),
        ));
    }
    Ok(Table { columns, rows })
}

fn check_width(record: &StringRecord, expected: usize, text: &[u8]) -> Result<(), MapError> {
    if record.len() > expected {
        let line = record
            .position()
            .map(|pos| line_at(text, pos.byte()))
            .unwrap_or_default();
        return Err(MapError::MalformedRow {
            line,
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

/// 1-based physical line of `offset`, counting blank lines the reader skipped.
fn line_at(text: &[u8], offset: u64) -> u64 {
    let end = usize::try_from(offset).unwrap_or(usize::MAX).min(text.len());
    let breaks = text[..end].iter().filter(|&&byte| byte == b'\n').count();
    breaks as u64 + 1
}
