//! CLI argument structures

use crate::config::Settings;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Largest accepted `--parallel` value
pub const MAX_PARALLEL: usize = 100;

/// Replace literal values in contact flow exports with template placeholders
#[derive(Parser, Debug)]
#[command(name = "flow-variableizer")]
#[command(about = "flow-variableizer - Replace contact flow values with template placeholders", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "all", "single"])
))]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Flow file, or directory of flow files, to variableize
    pub input: Option<PathBuf>,

    /// Process every matching file in the sample directory
    #[arg(long)]
    pub all: bool,

    /// Process the configured single sample file
    #[arg(long)]
    pub single: bool,

    /// Block definitions file
    #[arg(short = 'r', long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Directory variableized flows are written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to a settings file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Appended to each output file name stem
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// File name pattern used when processing a directory
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Descend into subdirectories
    #[arg(long)]
    pub recursive: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "1", value_parser = parse_parallel)]
    pub parallel: usize,

    /// Stop at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Show the placeholders that would be written without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(rules) = &self.rules {
            settings.rules_path = rules.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
        if let Some(suffix) = &self.suffix {
            settings.output_suffix = suffix.clone();
        }
        if let Some(pattern) = &self.pattern {
            settings.file_pattern = pattern.clone();
        }
    }

    /// The file or directory to process
    pub fn source(&self, settings: &Settings) -> PathBuf {
        match &self.input {
            Some(input) => input.clone(),
            None if self.all => settings.sample_dir.clone(),
            None => settings.single_file.clone(),
        }
    }
}

fn parse_parallel(value: &str) -> Result<usize, String> {
    let parallel: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    match parallel {
        0 => Err("Parallel count must be greater than 0".to_string()),
        n if n > MAX_PARALLEL => Err(format!(
            "Parallel count of {n} is too high (max: {MAX_PARALLEL})"
        )),
        n => Ok(n),
    }
}
