//! End-to-end conversion of one input buffer against one template buffer.
//!
//! This is the entry point run adapters call: it never touches storage and
//! holds no state between calls.

use crate::{
    engine::{self, MissingSourcePolicy, ResolutionPlan},
    error::MapError,
    mapping::MappingTable,
    reader::{self, ReadOptions},
    template::Template,
    writer::{self, WriteOptions},
};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input: ReadOptions,
    pub template: ReadOptions,
    pub output: WriteOptions,
    pub missing_source: MissingSourcePolicy,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    /// Rendered output; empty when there were no data rows.
    pub bytes: Vec<u8>,
    pub rows: usize,
    /// Mapped source columns the input header does not contain.
    pub missing_sources: Vec<String>,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

pub fn convert(
    input: &[u8],
    template: &[u8],
    mapping: &MappingTable,
    options: &ConvertOptions,
) -> Result<Conversion, MapError> {
    let template = Template::load(template, &options.template)?;
    let table = reader::read_table(input, &options.input)?;

    let missing_sources = if table.columns.is_empty() {
        Vec::new()
    } else {
        ResolutionPlan::build(&table.columns, &template, mapping, options.missing_source)
            .missing_sources()
            .to_vec()
    };
    let rows = engine::transform(&table.rows, &template, mapping, options.missing_source);
    let bytes = writer::render(&rows, &template, &options.output)?;

    Ok(Conversion {
        bytes,
        rows: rows.len(),
        missing_sources,
    })
}
