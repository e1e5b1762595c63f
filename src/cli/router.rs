//! Command execution
//!
//! Settings are resolved in order: defaults, settings file, environment,
//! command-line flags.

use crate::batch::{collect_inputs, BatchOptions, BatchRunner, BatchSummary};
use crate::cli::args::Cli;
use crate::config::{load_reverse_map, ReverseMap, Settings};
use crate::variableize::FlowVariableizer;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Run the tool for parsed arguments
pub async fn execute(cli: Cli) -> Result<BatchSummary> {
    let mut settings = Settings::load(cli.config.as_deref()).await?;
    cli.apply_overrides(&mut settings);
    debug!("Effective settings: {:?}", settings);

    println!("Output directory: {}", settings.output_dir.display());
    println!("Loading block definitions...");
    let reverse_map = load_reverse_map(&settings.rules_path).await?;
    print_reverse_map_summary(&reverse_map);

    let source = cli.source(&settings);
    let inputs = collect_inputs(&source, &settings.file_pattern, cli.recursive)?;
    let source_root = source.is_dir().then(|| source.clone());
    if source_root.is_some() {
        println!("\nProcessing {} flow files...", inputs.len());
    } else {
        println!("\nProcessing single flow file: {}", source.display());
    }

    let options = BatchOptions {
        output_dir: settings.output_dir.clone(),
        source_root,
        suffix: settings.output_suffix.clone(),
        parallel: cli.parallel,
        fail_fast: cli.fail_fast,
        dry_run: cli.dry_run,
    };
    let runner = BatchRunner::new(FlowVariableizer::new(Arc::new(reverse_map)), options);
    let summary = runner.run(inputs).await?;

    if summary.failed > 0 {
        println!(
            "\n{} of {} files failed",
            summary.failed,
            summary.failed + summary.processed
        );
    }
    println!("\nDone!");
    Ok(summary)
}

/// `Found N exported block types:` followed by one line per type
pub fn reverse_map_summary(reverse_map: &ReverseMap) -> Vec<String> {
    let mut lines = vec![format!(
        "Found {} exported block types:",
        reverse_map.len()
    )];
    lines.extend(
        reverse_map
            .iter()
            .map(|(action_type, rules)| format!("  {}: {} variables", action_type, rules.len())),
    );
    lines
}

fn print_reverse_map_summary(reverse_map: &ReverseMap) {
    reverse_map.log_summary();
    for line in reverse_map_summary(reverse_map) {
        println!("{line}");
    }
}
