//! Run adapter: fetches input and template objects, converts, and stores the result.
//!
//! Each object is one independent run. Failures never escape as errors; they
//! are classified into a [`RunOutcome::Failed`] so callers can report a status
//! per run without unwinding the whole batch.

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::{
    config::RunConfig,
    convert::{self, ConvertOptions},
    error::MapError,
    event::{KeyLayout, StorageEvent},
    mapping::MappingTable,
    storage::{ObjectRef, ObjectStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidEvent,
    InvalidKey,
    Storage,
    MalformedInput,
    TemplateShape,
    Encoding,
}

impl FailureKind {
    fn of(err: &MapError) -> Self {
        match err {
            MapError::MalformedRow { .. } | MapError::Csv(_) => FailureKind::MalformedInput,
            MapError::TemplateShape { .. }
            | MapError::MissingTypeRow
            | MapError::EmptyTemplate => FailureKind::TemplateShape,
            MapError::Decode { .. } | MapError::Encode { .. } => FailureKind::Encoding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: String,
    /// Where the result was (or would have been) stored.
    pub output: String,
    pub rows_written: usize,
    /// False when the input had no data rows and nothing was stored.
    pub written: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

impl RunFailure {
    fn new(input: Option<&ObjectRef>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            input: input.map(ObjectRef::to_string),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(RunReport),
    Failed(RunFailure),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RunOutcome::Completed(_) => 200,
            RunOutcome::Failed(_) => 500,
        }
    }

    pub fn body(&self) -> String {
        match self {
            RunOutcome::Completed(report) => format!("Successfully processed {}", report.input),
            RunOutcome::Failed(failure) => format!("Error processing file: {}", failure.message),
        }
    }
}

pub struct RunAdapter<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    mapping: &'a MappingTable,
    template_key: String,
    layout: KeyLayout,
    options: ConvertOptions,
}

impl<'a, S: ObjectStore + ?Sized> RunAdapter<'a, S> {
    pub fn new(
        store: &'a S,
        mapping: &'a MappingTable,
        config: &RunConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            mapping,
            template_key: config.template_key.clone(),
            layout: config.key_layout(),
            options: config.convert_options()?,
        })
    }

    /// Runs every record of an event independently.
    pub fn handle_event(&self, event: &StorageEvent) -> Vec<RunOutcome> {
        if event.records.is_empty() {
            let failure =
                RunFailure::new(None, FailureKind::InvalidEvent, "Event has no records");
            error!("Error processing event: {}", failure.message);
            return vec![RunOutcome::Failed(failure)];
        }
        event
            .records
            .iter()
            .map(|record| {
                debug!(
                    "Handling {} for {}/{}",
                    record.event_name.as_deref().unwrap_or("event"),
                    record.s3.bucket.name,
                    record.s3.object.key
                );
                self.process(&ObjectRef::new(&record.s3.bucket.name, &record.s3.object.key))
            })
            .collect()
    }

    pub fn handle_event_json(&self, json: &str) -> Vec<RunOutcome> {
        match StorageEvent::from_json(json) {
            Ok(event) => self.handle_event(&event),
            Err(err) => {
                let failure =
                    RunFailure::new(None, FailureKind::InvalidEvent, format!("{err:#}"));
                error!("Error processing event: {}", failure.message);
                vec![RunOutcome::Failed(failure)]
            }
        }
    }

    /// Converts one uploaded object.
    pub fn process(&self, input: &ObjectRef) -> RunOutcome {
        match self.try_process(input) {
            Ok(report) => RunOutcome::Completed(report),
            Err(failure) => {
                error!("Error processing file {input}: {}", failure.message);
                RunOutcome::Failed(failure)
            }
        }
    }

    fn try_process(&self, input: &ObjectRef) -> Result<RunReport, RunFailure> {
        let tenant_key = self.layout.parse(&input.key).map_err(|err| {
            RunFailure::new(Some(input), FailureKind::InvalidKey, err.to_string())
        })?;
        let output = input.sibling(self.layout.output_key(&tenant_key));
        let template = input.sibling(self.template_key.clone());
        info!("Processing {input} for tenant '{}' -> {output}", tenant_key.tenant);

        let storage_failure = |err: anyhow::Error| {
            RunFailure::new(Some(input), FailureKind::Storage, format!("{err:#}"))
        };
        let input_bytes = self.store.get(input).map_err(storage_failure)?;
        let template_bytes = self.store.get(&template).map_err(storage_failure)?;

        let conversion =
            convert::convert(&input_bytes, &template_bytes, self.mapping, &self.options)
                .map_err(|err| {
                    RunFailure::new(Some(input), FailureKind::of(&err), err.to_string())
                })?;
        for name in &conversion.missing_sources {
            warn!("Source column '{name}' not found in {input}; mapped columns fall back");
        }

        let location = self.store.locate(&output);
        if conversion.is_empty() {
            info!("No rows to map in {input}; nothing written");
        } else {
            self.store
                .put(&output, &conversion.bytes)
                .map_err(|err| storage_failure(err.context(format!("Storing {output}"))))?;
            info!("Processed and saved {} row(s): {location}", conversion.rows);
        }

        Ok(RunReport {
            input: input.to_string(),
            output: location,
            rows_written: conversion.rows,
            written: !conversion.is_empty(),
            missing_sources: conversion.missing_sources,
        })
    }
}
