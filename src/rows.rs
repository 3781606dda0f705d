//! Ordered row model shared by the reader, engine, and writer.
//!
//! A [`Row`] is an ordered column-name-to-value mapping. Rows produced from
//! the same header share one column list through an `Arc`, so a table of a
//! few thousand rows stores each header name once.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Pairs `values` with `columns`, padding missing trailing cells with
    /// empty strings. Surplus values are dropped; callers that must reject
    /// them check the count first.
    pub fn new(columns: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(columns.len(), String::new());
        Self { columns, values }
    }

    /// Builds a row from `(column, value)` pairs in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Looks up a cell by column name. When a header repeats a name, the
    /// right-most occurrence wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column).map(|idx| self.values[idx].as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn shared_columns(&self) -> &Arc<[String]> {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().rposition(|name| name == column)
    }
}

/// Rows read from one delimited file together with its header.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}
