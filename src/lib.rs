pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod event;
pub mod io_utils;
mod map_cmd;
pub mod mapping;
mod mapping_cmd;
pub mod reader;
pub mod rows;
pub mod run;
pub mod storage;
pub mod table;
pub mod template;
pub mod writer;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands},
    config::RunConfig,
    mapping::MappingTable,
    run::{RunAdapter, RunOutcome},
    storage::{LocalStore, ObjectRef},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("parts_mapper", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Map(args) => map_cmd::execute(&args),
        Commands::Run(args) => handle_run(&args),
        Commands::Event(args) => handle_event(&args),
        Commands::Mapping(args) => mapping_cmd::execute(&args),
    }
}

fn handle_run(args: &cli::RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mapping = load_mapping(args.mapping.as_deref())?;
    let store = LocalStore::new(&args.root);
    let adapter = RunAdapter::new(&store, &mapping, &config)?;
    info!("Running {} from store root {:?}", args.key, store.root());
    let outcome = adapter.process(&ObjectRef::new(&args.bucket, &args.key));
    report_outcomes(&[outcome])
}

fn handle_event(args: &cli::EventArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mapping = load_mapping(args.mapping.as_deref())?;
    let store = LocalStore::new(&args.root);
    let adapter = RunAdapter::new(&store, &mapping, &config)?;
    let payload = io_utils::read_source(&args.event)
        .with_context(|| format!("Reading event {:?}", args.event))?;
    let text = String::from_utf8(payload).context("Event payload is not UTF-8")?;
    let outcomes = adapter.handle_event_json(&text);
    report_outcomes(&outcomes)
}

fn report_outcomes(outcomes: &[RunOutcome]) -> Result<()> {
    for outcome in outcomes {
        let rendered =
            serde_json::to_string_pretty(outcome).context("Serializing run outcome")?;
        println!("{rendered}");
    }
    let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();
    if failed > 0 {
        return Err(anyhow!("{failed} of {} run(s) failed", outcomes.len()));
    }
    Ok(())
}

pub(crate) fn load_mapping(path: Option<&Path>) -> Result<MappingTable> {
    match path {
        Some(path) => MappingTable::load(path),
        None => {
            debug!("No mapping file given; using the built-in Parts mapping");
            MappingTable::builtin_parts().context("Loading built-in Parts mapping")
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::load(path),
        None => Ok(RunConfig::default()),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
