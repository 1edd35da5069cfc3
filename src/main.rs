mod cli;
mod convert;
mod extractors;
mod options;
mod output;
mod parse;

use crate::convert::{convert, Summary};
use crate::output::OutputDir;
use crate::parse::get_raw_records;
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::Cli;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let opts = cli.options()?;
    let content = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let records = get_raw_records(&content)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    // Nothing below here reads the clock, so every missing date gets the same stand-in
    let conversion = convert(&records, &opts, Local::now().fixed_offset());

    let dirs = OutputDir::prepare(&cli.output, &opts)?;
    let outline = dirs.write_document(&opts.outline_file, &conversion.outline)?;
    let archive = conversion
        .archive
        .as_deref()
        .map(|doc| dirs.write_document(&opts.archive_file, doc))
        .transpose()?;
    let written = dirs.write_notes(&conversion.notes);

    let report = FinalReport {
        summary: conversion.summary,
        outline,
        archive,
        notes_dir: dirs.notes_dir,
        notes_written: written.written,
        notes_failed: written.failed,
    };
    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        report.print();
    }

    Ok(())
}

/// What a run did, printed once everything has been written.
#[derive(Serialize)]
struct FinalReport {
    #[serde(flatten)]
    summary: Summary,
    outline: PathBuf,
    archive: Option<PathBuf>,
    notes_dir: PathBuf,
    notes_written: usize,
    notes_failed: usize,
}
impl FinalReport {
    fn print(&self) {
        println!(
            "Outline: {} tasks -> {}",
            self.summary.active_tasks,
            self.outline.display()
        );
        if let Some(archive) = &self.archive {
            println!(
                "Archive: {} tasks -> {}",
                self.summary.archived_tasks,
                archive.display()
            );
        }
        println!(
            "Notes: {} of {} files written -> {} ({} notes, {} checklists with {} items)",
            self.notes_written,
            self.notes_written + self.notes_failed,
            self.notes_dir.display(),
            self.summary.notes,
            self.summary.checklists,
            self.summary.checklist_items,
        );
        if self.notes_failed > 0 {
            eprintln!("Warning: {} notes could not be written", self.notes_failed);
        }
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,tick2org=info",
        1 => "info,tick2org=debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
