//! Declarative column mapping from client exports onto the target template.
//!
//! A [`MappingTable`] pairs each output column with a [`Resolution`]: either a
//! source column to copy or a literal constant. Tables are immutable once
//! built and carry no ordering of their own; output order always comes from
//! the template header.
//!
//! Mapping documents are YAML:
//!
//! ```yaml
//! rules:
//!   - column: Part Code
//!     source: Sku
//!   - column: Vend Code
//!     literal: _GEN
//! legacy:
//!   Cust Ctry: CA
//! ```
//!
//! Entries under `legacy` are bare names in the older dictionary style. They
//! load as source fields, so a name that does not exist in the input header
//! falls back to being emitted verbatim.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{error::MappingError, template::Template};

const BUILTIN_PARTS_MAPPING: &str = include_str!("../assets/parts_mapping.yml");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Copy the named column from the input row.
    SourceField(String),
    /// Emit a fixed value.
    Literal(String),
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::SourceField(name) => write!(f, "source '{name}'"),
            Resolution::Literal(value) => write!(f, "literal '{value}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub output_column: String,
    pub resolution: Resolution,
}

impl MappingRule {
    pub fn source(output_column: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            output_column: output_column.into(),
            resolution: Resolution::SourceField(name.into()),
        }
    }

    pub fn literal(output_column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_column: output_column.into(),
            resolution: Resolution::Literal(value.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
    by_column: HashMap<String, usize>,
}

impl MappingTable {
    /// Builds a table, rejecting blank or repeated output columns.
    pub fn new(rules: Vec<MappingRule>) -> Result<Self, MappingError> {
        let mut by_column = HashMap::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            if rule.output_column.trim().is_empty() {
                return Err(MappingError::BlankColumn);
            }
            if by_column.insert(rule.output_column.clone(), idx).is_some() {
                return Err(MappingError::DuplicateColumn {
                    column: rule.output_column.clone(),
                });
            }
        }
        Ok(Self { rules, by_column })
    }

    /// The mapping used for vendor product exports when no document is supplied.
    pub fn builtin_parts() -> Result<Self, MappingError> {
        Self::from_yaml_str(BUILTIN_PARTS_MAPPING)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, MappingError> {
        let document: MappingDocument = serde_yaml::from_str(input)?;
        document.into_table()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
        let document: MappingDocument = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing mapping YAML {path:?}"))?;
        let table = document
            .into_table()
            .with_context(|| format!("Validating mapping rules in {path:?}"))?;
        Ok(table)
    }

    pub fn get(&self, output_column: &str) -> Option<&Resolution> {
        self.by_column
            .get(output_column)
            .map(|idx| &self.rules[*idx].resolution)
    }

    /// Rules in declaration order. Declaration order never drives output order.
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compares the table against a template header.
    pub fn coverage(&self, template: &Template) -> Coverage {
        let unmapped_columns = template
            .header()
            .iter()
            .filter(|column| !self.by_column.contains_key(column.as_str()))
            .cloned()
            .collect();
        let unknown_columns = self
            .rules
            .iter()
            .filter(|rule| !template.header().contains(&rule.output_column))
            .map(|rule| rule.output_column.clone())
            .collect();
        Coverage {
            unmapped_columns,
            unknown_columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    /// Template columns with no rule; these are always emitted empty.
    pub unmapped_columns: Vec<String>,
    /// Rules whose output column is not part of the template; never emitted.
    pub unknown_columns: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    rules: Vec<RuleDocument>,
    #[serde(default)]
    legacy: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RuleDocument {
    column: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    literal: Option<String>,
}

impl MappingDocument {
    fn into_table(self) -> Result<MappingTable, MappingError> {
        let mut rules = Vec::with_capacity(self.rules.len() + self.legacy.len());
        for rule in self.rules {
            let resolution = match (rule.source, rule.literal) {
                (Some(name), None) => Resolution::SourceField(name),
                (None, Some(value)) => Resolution::Literal(value),
                (Some(_), Some(_)) => {
                    return Err(MappingError::AmbiguousRule {
                        column: rule.column,
                    });
                }
                (None, None) => {
                    return Err(MappingError::EmptyRule {
                        column: rule.column,
                    });
                }
            };
            rules.push(MappingRule {
                output_column: rule.column,
                resolution,
            });
        }
        rules.extend(
            self.legacy
                .into_iter()
                .map(|(column, name)| MappingRule::source(column, name)),
        );
        MappingTable::new(rules)
    }
}
