//! Local batch mapping of one CSV export onto a template file.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::MapArgs,
    convert::{self, ConvertOptions},
    engine::{self, ResolutionPlan},
    io_utils,
    mapping::MappingTable,
    reader::{self, ReadOptions},
    table,
    template::Template,
    writer::WriteOptions,
};

pub fn execute(args: &MapArgs) -> Result<()> {
    let input_delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let template_delimiter = io_utils::resolve_input_delimiter(&args.template, args.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    let output_delimiter =
        io_utils::resolve_output_delimiter(output_path, args.output_delimiter, input_delimiter);

    let mapping = crate::load_mapping(args.mapping.as_deref())?;
    info!(
        "Mapping '{}' onto template '{}' (delimiter '{}', output '{}', {} rule(s))",
        args.input.display(),
        args.template.display(),
        crate::printable_delimiter(input_delimiter),
        crate::printable_delimiter(output_delimiter),
        mapping.len()
    );

    let options = ConvertOptions {
        input: ReadOptions {
            delimiter: input_delimiter,
            encoding: input_encoding,
        },
        template: ReadOptions {
            delimiter: template_delimiter,
            ..ReadOptions::default()
        },
        output: WriteOptions {
            delimiter: output_delimiter,
            encoding: output_encoding,
            type_row: args.type_row,
            placeholder_tag: args.placeholder_tag.clone(),
        },
        missing_source: args.missing_source,
    };

    let input_bytes = io_utils::read_source(&args.input)?;
    let template_bytes = std::fs::read(&args.template)
        .with_context(|| format!("Opening template file {:?}", args.template))?;

    if let Some(limit) = args.preview {
        return preview(&input_bytes, &template_bytes, &mapping, &options, limit);
    }

    let conversion = convert::convert(&input_bytes, &template_bytes, &mapping, &options)
        .with_context(|| format!("Mapping {:?}", args.input))?;
    for name in &conversion.missing_sources {
        warn!("Source column '{name}' not found in input; mapped columns fall back");
    }
    if conversion.is_empty() {
        info!("No rows to map in {:?}; nothing written", args.input);
        return Ok(());
    }
    io_utils::write_sink(output_path, &conversion.bytes)?;

    let destination = output_path
        .filter(|path| !io_utils::is_dash(path))
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    info!("Wrote {} mapped row(s) to {destination}", conversion.rows);
    Ok(())
}

fn preview(
    input: &[u8],
    template: &[u8],
    mapping: &MappingTable,
    options: &ConvertOptions,
    limit: usize,
) -> Result<()> {
    let template = Template::load(template, &options.template).context("Loading template")?;
    let input_table = reader::read_table(input, &options.input).context("Reading input")?;
    let plan = ResolutionPlan::build(
        &input_table.columns,
        &template,
        mapping,
        options.missing_source,
    );
    for name in plan.missing_sources() {
        warn!("Source column '{name}' not found in input; mapped columns fall back");
    }
    let shown = &input_table.rows[..input_table.rows.len().min(limit)];
    let rows = engine::transform(shown, &template, mapping, options.missing_source)
        .into_iter()
        .map(|row| row.values().to_vec())
        .collect::<Vec<_>>();
    table::print_table(template.header(), &rows);
    info!(
        "Displayed {} of {} mapped row(s)",
        rows.len(),
        input_table.rows.len()
    );
    Ok(())
}
