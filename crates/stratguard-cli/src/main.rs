//! `stratguard`: validate and repair generated strategy classes.
//!
//! Exit codes: 0 when every unit succeeds, 1 when any unit fails, 2 when
//! the run itself cannot proceed (bad arguments, bad config, write errors).

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use stratguard_core::observability::init_tracing;
use stratguard_core::StratguardConfig;

#[derive(Parser)]
#[command(name = "stratguard")]
#[command(about = "Validate and auto-repair generated trading-strategy classes")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tracing filter directives, e.g. `debug` or `stratguard_analysis=trace`
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report structural defects without changing anything
    Validate {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate fixes and apply the safe ones
    Fix {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Minimum confidence for an AUTO fix to be applied
        #[arg(long)]
        threshold: Option<f64>,
        /// Write `<stem>.fixed.py` next to each changed source
        #[arg(long)]
        write: bool,
    },
    /// Parse, validate, fix and optionally execute every source
    Pipeline(PipelineArgs),
}

#[derive(Args)]
struct PipelineArgs {
    /// Files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Minimum confidence for an AUTO fix to be applied
    #[arg(long)]
    threshold: Option<f64>,
    /// Propose fixes without applying them
    #[arg(long)]
    no_apply: bool,
    /// Run each candidate through the configured interpreter
    #[arg(long)]
    execute: bool,
    /// Attempt text-level repair of units that fail to parse
    #[arg(long)]
    recover: bool,
    /// Process units on the rayon pool
    #[arg(long)]
    parallel: bool,
    /// Write the batch report as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write `<stem>.fixed.py` next to each changed source
    #[arg(long)]
    write_fixed: bool,
}

impl PipelineArgs {
    fn apply(&self, config: &mut StratguardConfig) {
        let pipeline = &mut config.pipeline;
        if let Some(threshold) = self.threshold {
            pipeline.confidence_threshold = threshold;
        }
        pipeline.auto_apply &= !self.no_apply;
        pipeline.execute |= self.execute;
        pipeline.recover_syntax_errors |= self.recover;
        pipeline.parallel |= self.parallel;
        pipeline.write_fixed |= self.write_fixed;
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref());

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run aborted");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => StratguardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StratguardConfig::default(),
    };

    match cli.command {
        Commands::Validate { paths, json } => commands::validate(&config, &paths, json),
        Commands::Fix {
            paths,
            threshold,
            write,
        } => {
            if let Some(threshold) = threshold {
                config.pipeline.confidence_threshold = threshold;
            }
            config.pipeline.auto_apply = true;
            config.pipeline.execute = false;
            config.pipeline.write_fixed |= write;
            config.validate().context("invalid option")?;
            commands::fix(&config, &paths)
        }
        Commands::Pipeline(args) => {
            args.apply(&mut config);
            config.validate().context("invalid option")?;
            commands::pipeline(&config, &args.paths, args.report.as_deref())
        }
    }
}
