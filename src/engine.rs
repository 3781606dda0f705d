//! Transformation engine: resolves every template column for every input row.
//!
//! Resolution is planned once per input header. For each template column the
//! plan records where its value comes from:
//!
//! - no rule → empty string
//! - `Literal(value)` → `value`
//! - `SourceField(name)` with `name` in the header → that cell, even when empty
//! - `SourceField(name)` with `name` absent → governed by [`MissingSourcePolicy`]
//!
//! Output rows always follow the template header order. Nothing here fails;
//! malformed input is rejected earlier by the reader and template loader.

use std::sync::Arc;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    mapping::{MappingTable, Resolution},
    rows::Row,
    template::Template,
};

/// What to emit when a rule names a source column the input does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum MissingSourcePolicy {
    /// Emit the referenced column name itself as a constant.
    #[default]
    ColumnName,
    /// Emit an empty cell.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Blank,
    Constant(String),
    Cell(usize),
}

#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    columns: Arc<[String]>,
    slots: Vec<Slot>,
    missing_sources: Vec<String>,
}

impl ResolutionPlan {
    pub fn build(
        input_columns: &[String],
        template: &Template,
        mapping: &MappingTable,
        policy: MissingSourcePolicy,
    ) -> Self {
        let mut missing_sources: Vec<String> = Vec::new();
        let slots = template
            .header()
            .iter()
            .map(|output_column| match mapping.get(output_column) {
                None => Slot::Blank,
                Some(Resolution::Literal(value)) => Slot::Constant(value.clone()),
                Some(Resolution::SourceField(name)) => {
                    match input_columns.iter().rposition(|column| column == name) {
                        Some(idx) => Slot::Cell(idx),
                        None => {
                            if !missing_sources.contains(name) {
                                missing_sources.push(name.clone());
                            }
                            match policy {
                                MissingSourcePolicy::ColumnName => Slot::Constant(name.clone()),
                                MissingSourcePolicy::Empty => Slot::Blank,
                            }
                        }
                    }
                }
            })
            .collect::<Vec<_>>();
        debug!(
            "Resolved {} template column(s) against {} input column(s); {} source(s) missing",
            slots.len(),
            input_columns.len(),
            missing_sources.len()
        );
        Self {
            columns: Arc::clone(template.shared_header()),
            slots,
            missing_sources,
        }
    }

    /// Source columns referenced by the mapping but absent from the input header.
    pub fn missing_sources(&self) -> &[String] {
        &self.missing_sources
    }

    /// Produces one output row. `values` must be laid out in the header order
    /// the plan was built against.
    pub fn apply(&self, values: &[String]) -> Row {
        let cells = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Blank => String::new(),
                Slot::Constant(value) => value.clone(),
                Slot::Cell(idx) => values.get(*idx).cloned().unwrap_or_default(),
            })
            .collect();
        Row::new(Arc::clone(&self.columns), cells)
    }
}

/// Maps every input row onto the template. Rows sharing a header reuse one plan.
pub fn transform(
    rows: &[Row],
    template: &Template,
    mapping: &MappingTable,
    policy: MissingSourcePolicy,
) -> Vec<Row> {
    let mut current: Option<(&Arc<[String]>, ResolutionPlan)> = None;
    let mut output = Vec::with_capacity(rows.len());
    for row in rows {
        let columns = row.shared_columns();
        let reuse = matches!(&current, Some((planned, _)) if Arc::ptr_eq(planned, columns));
        if !reuse {
            current = Some((
                columns,
                ResolutionPlan::build(row.columns(), template, mapping, policy),
            ));
        }
        if let Some((_, plan)) = &current {
            output.push(plan.apply(row.values()));
        }
    }
    output
}
