//! Subcommand bodies. Each returns whether every unit succeeded.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;

use stratguard_analysis::issues::ValidationReport;
use stratguard_analysis::parsers::SourceParser;
use stratguard_analysis::pipeline::io::{discover_sources, load_sources, write_fixed, write_report};
use stratguard_analysis::pipeline::{BatchReport, LoadedInput, PipelineOrchestrator};
use stratguard_analysis::runner::ProcessRunner;
use stratguard_analysis::validator::Validator;
use stratguard_core::StratguardConfig;

use crate::output;

/// One `validate` result line: a report, or why the file could not be read.
#[derive(Debug, Serialize)]
pub struct ValidateEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn discover(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let sources = discover_sources(paths);
    if sources.is_empty() {
        bail!("no Python sources found under the given paths");
    }
    tracing::debug!(count = sources.len(), "sources discovered");
    Ok(sources)
}

pub fn validate(config: &StratguardConfig, paths: &[PathBuf], json: bool) -> anyhow::Result<bool> {
    let parser = SourceParser::without_cache();
    let validator = Validator::new(config.validator.clone());

    let entries: Vec<ValidateEntry> = load_sources(&discover(paths)?)
        .into_iter()
        .map(|input| match input {
            LoadedInput::Source(source) => {
                let unit = parser.parse_unit(&source.name, &source.text);
                ValidateEntry {
                    name: source.name,
                    report: Some(Validator::report(&validator.validate(&unit))),
                    error: None,
                }
            }
            LoadedInput::Unreadable { name, message } => ValidateEntry {
                name,
                report: None,
                error: Some(message),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", output::render_validation(&entries));
    }

    let blocking = config.pipeline.blocking_severity;
    Ok(entries
        .iter()
        .all(|e| e.report.as_ref().is_some_and(|r| r.blocking_count(blocking) == 0)))
}

pub fn fix(config: &StratguardConfig, paths: &[PathBuf]) -> anyhow::Result<bool> {
    let loaded = load_sources(&discover(paths)?);
    let report = PipelineOrchestrator::new(config).process_loaded(&loaded);

    print!("{}", output::render_fixes(&report));
    write_outputs(config, &report)?;
    Ok(report.all_succeeded())
}

pub fn pipeline(config: &StratguardConfig, paths: &[PathBuf], report_path: Option<&Path>) -> anyhow::Result<bool> {
    let loaded = load_sources(&discover(paths)?);

    let mut orchestrator = PipelineOrchestrator::new(config);
    if config.pipeline.execute {
        orchestrator = orchestrator.with_runner(Box::new(ProcessRunner::from_config(&config.runner)));
    }
    let report = orchestrator.process_loaded(&loaded);

    write_outputs(config, &report)?;
    if let Some(path) = report_path {
        write_report(&report, path).with_context(|| format!("writing report {}", path.display()))?;
    }
    print!("{}", output::render_batch(&report));
    Ok(report.all_succeeded())
}

/// Write `.fixed` files for every changed unit, when enabled.
fn write_outputs(config: &StratguardConfig, report: &BatchReport) -> anyhow::Result<()> {
    if !config.pipeline.write_fixed {
        return Ok(());
    }
    for result in &report.results {
        if let Some(text) = &result.fixed_text {
            write_fixed(Path::new(&result.name), text)?;
        }
    }
    Ok(())
}
