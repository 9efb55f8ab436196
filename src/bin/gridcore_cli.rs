//! CLI tool for gridcore - loads a TSV/CSV file into a grid and prints the
//! clipboard encoding of a range as JSON
//!
//! Usage:
//!   gridcore_cli <input.tsv>                        # whole table to stdout
//!   gridcore_cli <input.tsv> --range B2:D5          # only that range
//!   gridcore_cli <input.csv> --config grid.json -o out.json

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use gridcore::cell_ref::parse_cell_range;
use gridcore::clipboard::{encode_native, encode_text};
use gridcore::csv::{parse_delimited, Delimiter};
use gridcore::{Grid, GridConfig, TableHandle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: gridcore_cli <input.tsv> [--range A1:C3] [--config grid.json] [-o output.json]";

#[derive(Debug, Default)]
struct Args {
    input: String,
    range: Option<String>,
    config: Option<String>,
    output: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let mut out = Args {
        input: args.next()?,
        ..Args::default()
    };
    while let Some(flag) = args.next() {
        let value = args.next()?;
        match flag.as_str() {
            "--range" | "-r" => out.range = Some(value),
            "--config" | "-c" => out.config = Some(value),
            "-o" | "--output" => out.output = Some(value),
            _ => return None,
        }
    }
    Some(out)
}

fn run(args: &Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => GridConfig::from_path(path).map_err(|e| format!("Error reading {path}: {e}"))?,
        None => GridConfig::default(),
    };
    let data = fs::read(&args.input).map_err(|e| format!("Error reading {}: {e}", args.input))?;
    let table = parse_delimited(&data, Delimiter::from_path(&args.input));
    let mut grid = Grid::with_table(config, TableHandle::owned(table));
    info!(rows = grid.number_rows(), cols = grid.number_cols(), "table loaded");

    match &args.range {
        Some(range) => {
            let block = parse_cell_range(range).ok_or_else(|| format!("Invalid range: {range}"))?;
            grid.select_block(block, false)
                .map_err(|e| format!("Cannot select {range}: {e}"))?;
        }
        None => {
            grid.select_all().map_err(|e| format!("Cannot select table: {e}"))?;
        }
    }

    let payload = grid.selection_payload();
    let delimiter = grid.config().text_delimiter;
    let json = serde_json::json!({
        "rows": grid.number_rows(),
        "cols": grid.number_cols(),
        "cells": payload.len(),
        "native": encode_native(&payload),
        "text": encode_text(&payload, delimiter),
    });
    serde_json::to_string_pretty(&json).map_err(|e| format!("Error serializing JSON: {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let Some(args) = parse_args(env::args().skip(1)) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let json = match run(&args) {
        Ok(json) => json,
        Err(message) => {
            error!(%message, "gridcore_cli failed");
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                return ExitCode::FAILURE;
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{json}") {
                eprintln!("Error writing output: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
