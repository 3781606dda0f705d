//! Run configuration for storage-driven conversions.
//!
//! Loaded from YAML; every field is optional and falls back to the defaults
//! used for the Parts upload bucket:
//!
//! ```yaml
//! template_key: templates/Parts_Template.csv
//! input_prefix: input
//! output_prefix: output
//! output_file_name: Parts_Output.csv   # omit to keep the uploaded file name
//! delimiter: ","
//! input_encoding: utf-8                # templates are always read as utf-8
//! output_encoding: utf-8
//! type_row: template                   # or placeholder
//! placeholder_tag: text
//! missing_source: column-name          # or empty
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    cli::parse_delimiter,
    convert::ConvertOptions,
    engine::MissingSourcePolicy,
    event::KeyLayout,
    io_utils,
    reader::ReadOptions,
    writer::{DEFAULT_PLACEHOLDER_TAG, TypeRowPolicy, WriteOptions},
};

pub const DEFAULT_TEMPLATE_KEY: &str = "templates/Parts_Template.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub template_key: String,
    pub input_prefix: String,
    pub output_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file_name: Option<String>,
    pub delimiter: String,
    pub input_encoding: String,
    pub output_encoding: String,
    pub type_row: TypeRowPolicy,
    pub placeholder_tag: String,
    pub missing_source: MissingSourcePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        let layout = KeyLayout::default();
        Self {
            template_key: DEFAULT_TEMPLATE_KEY.to_string(),
            input_prefix: layout.input_prefix,
            output_prefix: layout.output_prefix,
            output_file_name: layout.output_file_name,
            delimiter: ",".to_string(),
            input_encoding: "utf-8".to_string(),
            output_encoding: "utf-8".to_string(),
            type_row: TypeRowPolicy::default(),
            placeholder_tag: DEFAULT_PLACEHOLDER_TAG.to_string(),
            missing_source: MissingSourcePolicy::default(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: RunConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(input).context("Parsing config YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("template_key", &self.template_key),
            ("input_prefix", &self.input_prefix),
            ("output_prefix", &self.output_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("Config field '{field}' must not be empty"));
            }
        }
        if self.input_prefix.contains('/') || self.output_prefix.contains('/') {
            return Err(anyhow!("Key prefixes must be a single path segment"));
        }
        if self.input_prefix == self.output_prefix {
            return Err(anyhow!(
                "output_prefix must differ from input_prefix '{}'",
                self.input_prefix
            ));
        }
        self.convert_options().map(|_| ())
    }

    pub fn key_layout(&self) -> KeyLayout {
        KeyLayout {
            input_prefix: self.input_prefix.clone(),
            output_prefix: self.output_prefix.clone(),
            output_file_name: self.output_file_name.clone(),
        }
    }

    pub fn convert_options(&self) -> Result<ConvertOptions> {
        let delimiter = parse_delimiter(&self.delimiter)
            .map_err(|err| anyhow!("Invalid delimiter '{}': {err}", self.delimiter))?;
        let input_encoding = io_utils::resolve_encoding(Some(&self.input_encoding))?;
        let output_encoding = io_utils::resolve_encoding(Some(&self.output_encoding))?;
        Ok(ConvertOptions {
            input: ReadOptions {
                delimiter,
                encoding: input_encoding,
            },
            template: ReadOptions {
                delimiter,
                ..ReadOptions::default()
            },
            output: WriteOptions {
                delimiter,
                encoding: output_encoding,
                type_row: self.type_row,
                placeholder_tag: self.placeholder_tag.clone(),
            },
            missing_source: self.missing_source,
        })
    }
}
