//! Mapping rule listing.
//!
//! Renders the active mapping table as a text table and, when a template is
//! given, reports template columns without a rule and rules that target
//! columns the template does not have.

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};

use crate::{
    cli::MappingArgs,
    io_utils,
    mapping::{MappingTable, Resolution},
    reader::ReadOptions,
    table,
    template::Template,
};

pub fn execute(args: &MappingArgs) -> Result<()> {
    let mapping = crate::load_mapping(args.mapping.as_deref())?;
    let source = args
        .mapping
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in Parts mapping".to_string());

    if mapping.is_empty() {
        info!("{source} does not define any rules");
        return Ok(());
    }

    let template = match &args.template {
        Some(path) => {
            let delimiter = io_utils::resolve_input_delimiter(path, args.delimiter);
            let bytes = std::fs::read(path)
                .with_context(|| format!("Opening template file {path:?}"))?;
            let options = ReadOptions {
                delimiter,
                ..ReadOptions::default()
            };
            Some(
                Template::load(&bytes, &options)
                    .with_context(|| format!("Loading template {path:?}"))?,
            )
        }
        None => None,
    };

    let rows = rule_rows(&mapping, template.as_ref());
    table::print_table(&["#", "column", "kind", "value"], &rows);
    info!("Listed {} rule(s) from {source}", mapping.len());

    if let Some(template) = &template {
        let coverage = mapping.coverage(template);
        if !coverage.unmapped_columns.is_empty() {
            info!(
                "{} template column(s) have no rule and stay empty: {}",
                coverage.unmapped_columns.len(),
                coverage.unmapped_columns.iter().join(", ")
            );
        }
        if !coverage.unknown_columns.is_empty() {
            warn!(
                "{} rule(s) target columns missing from the template: {}",
                coverage.unknown_columns.len(),
                coverage.unknown_columns.iter().join(", ")
            );
        }
    }
    Ok(())
}

/// Rules in template order when a template is given, declaration order otherwise.
/// Rules for columns the template lacks follow the template-ordered ones.
fn rule_rows(mapping: &MappingTable, template: Option<&Template>) -> Vec<Vec<String>> {
    let ordered = match template {
        Some(template) => template
            .header()
            .iter()
            .filter_map(|column| mapping.get(column).map(|rule| (column.as_str(), rule)))
            .chain(
                mapping
                    .rules()
                    .iter()
                    .filter(|rule| !template.header().contains(&rule.output_column))
                    .map(|rule| (rule.output_column.as_str(), &rule.resolution)),
            )
            .collect_vec(),
        None => mapping
            .rules()
            .iter()
            .map(|rule| (rule.output_column.as_str(), &rule.resolution))
            .collect_vec(),
    };
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, (column, resolution))| {
            let (kind, value) = match resolution {
                Resolution::SourceField(name) => ("source", name),
                Resolution::Literal(value) => ("literal", value),
            };
            vec![
                (idx + 1).to_string(),
                column.to_string(),
                kind.to_string(),
                value.clone(),
            ]
        })
        .collect()
}
