//! Batch surface: variableize a set of flow files into an output directory
//!
//! Each file is read, transformed on its own copy and written independently.
//! A failing file is reported and skipped; the rest of the batch carries on
//! unless `fail_fast` is set.

mod inputs;

pub use inputs::{collect_inputs, output_path_for};

use crate::error::{common, ErrorCode, FlowError, Result};
use crate::variableize::{FlowVariableizer, VariableizeReport};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a batch is run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    /// Scanned directory; subdirectories below it are kept under `output_dir`
    pub source_root: Option<PathBuf>,
    pub suffix: String,
    /// Files processed concurrently (at least one)
    pub parallel: usize,
    pub fail_fast: bool,
    /// Report substitutions without writing output files
    pub dry_run: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputted/flows"),
            source_root: None,
            suffix: "_variableized".to_string(),
            parallel: 1,
            fail_fast: false,
            dry_run: false,
        }
    }
}

/// Outcome for one input file
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<VariableizeReport>,
}

impl FileReport {
    /// Single status line for this file
    pub fn status_line(&self, dry_run: bool) -> String {
        match &self.result {
            Ok(report) if dry_run => format!(
                "Dry run: {} -> {} ({} placeholders)",
                self.input.display(),
                self.output.display(),
                report.placeholder_count()
            ),
            Ok(report) => format!(
                "Processed: {} -> {} ({} placeholders)",
                self.input.display(),
                self.output.display(),
                report.placeholder_count()
            ),
            Err(e) => format!("Error processing {}: {}", self.input.display(), e.user_message()),
        }
    }
}

/// Totals for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub placeholders: usize,
}

/// Runs the transformer over many files
pub struct BatchRunner {
    variableizer: FlowVariableizer,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(variableizer: FlowVariableizer, options: BatchOptions) -> Self {
        Self {
            variableizer,
            options,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Create the output directory (and parents)
    pub async fn prepare_output_dir(&self) -> Result<()> {
        if self.options.dry_run {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.options.output_dir)
            .await
            .map_err(|e| {
                FlowError::output_with_code(
                    ErrorCode::OUTPUT_DIR_CREATE_FAILED,
                    "Failed to create output directory",
                    Some(self.options.output_dir.clone()),
                )
                .with_source(e)
            })
    }

    /// Pair each input with its output path
    ///
    /// An input whose output path was already claimed by an earlier input
    /// carries an error instead of being processed.
    fn plan_outputs(&self, inputs: Vec<PathBuf>) -> Vec<(PathBuf, PathBuf, Option<FlowError>)> {
        let mut claimed = HashSet::new();
        inputs
            .into_iter()
            .map(|input| {
                let output = output_path_for(
                    &input,
                    self.options.source_root.as_deref(),
                    &self.options.output_dir,
                    &self.options.suffix,
                );
                let conflict = (!claimed.insert(output.clone())).then(|| {
                    FlowError::output_with_code(
                        ErrorCode::OUTPUT_PATH_CONFLICT,
                        format!("Output {} is already written by another input", output.display()),
                        Some(output.clone()),
                    )
                });
                (input, output, conflict)
            })
            .collect()
    }

    /// Process `inputs`, printing one status line per file in input order
    ///
    /// Returns the first per-file error when `fail_fast` is set.
    pub async fn run(&self, inputs: Vec<PathBuf>) -> Result<BatchSummary> {
        self.prepare_output_dir().await?;

        let parallel = self.options.parallel.max(1);
        info!("Processing {} file(s), {} at a time", inputs.len(), parallel);

        let planned = self.plan_outputs(inputs);
        let mut reports = stream::iter(planned.into_iter().map(|(input, output, conflict)| {
            let variableizer = self.variableizer.clone();
            let dry_run = self.options.dry_run;
            async move {
                let result = match conflict {
                    Some(e) => Err(e),
                    None => process_file(&variableizer, &input, &output, dry_run).await,
                };
                FileReport {
                    input,
                    output,
                    result,
                }
            }
        }))
        .buffered(parallel);

        let mut summary = BatchSummary::default();
        while let Some(report) = reports.next().await {
            println!("{}", report.status_line(self.options.dry_run));
            match report.result {
                Ok(file_report) => {
                    summary.processed += 1;
                    summary.placeholders += file_report.placeholder_count();
                    if self.options.dry_run {
                        for substitution in &file_report.substitutions {
                            println!("  {} = {}", substitution.location, substitution.value);
                        }
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("{}", e.developer_message());
                    if self.options.fail_fast {
                        return Err(e);
                    }
                }
            }
        }

        info!(
            "Batch finished: {} processed, {} failed, {} placeholders",
            summary.processed, summary.failed, summary.placeholders
        );
        Ok(summary)
    }
}

/// Read, transform and write one flow file
pub async fn process_file(
    variableizer: &FlowVariableizer,
    input: &Path,
    output: &Path,
    dry_run: bool,
) -> Result<VariableizeReport> {
    debug!("Reading {}", input.display());
    let content = tokio::fs::read_to_string(input).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            common::input_not_found(input)
        } else {
            FlowError::input_with_code(
                ErrorCode::INPUT_READ_FAILED,
                format!("Failed to read {}", input.display()),
                Some(input.to_path_buf()),
            )
            .with_source(e)
        }
    })?;
    let flow: Value =
        serde_json::from_str(&content).map_err(|e| common::input_invalid_json(input, e))?;

    let variableized = variableizer
        .variableize(&flow)
        .map_err(|e| e.with_path(input))?;

    if dry_run {
        return Ok(variableized.report);
    }

    let rendered = serde_json::to_string_pretty(&variableized.flow).map_err(|e| {
        FlowError::output_with_code(
            ErrorCode::OUTPUT_SERIALIZATION_FAILED,
            "Failed to serialize flow",
            Some(output.to_path_buf()),
        )
        .with_source(e)
    })?;
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            FlowError::output_with_code(
                ErrorCode::OUTPUT_DIR_CREATE_FAILED,
                "Failed to create output directory",
                Some(parent.to_path_buf()),
            )
            .with_source(e)
        })?;
    }
    tokio::fs::write(output, rendered)
        .await
        .map_err(|e| common::output_write_failed(output, e))?;
    debug!("Wrote {}", output.display());

    Ok(variableized.report)
}
