//! CLI tool for gridslice - lays out a grid config and outputs JSON or SVG
//!
//! Usage:
//!   gridslice_cli <config.json>                 # Geometry JSON to stdout
//!   gridslice_cli <config.json> -o out.json     # Geometry JSON to file
//!   gridslice_cli <config.json> --svg -o out.svg
//!
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gridslice::render::SvgBackend;
use gridslice::GridConfig;
use tracing_subscriber::EnvFilter;

struct Args {
    input: String,
    output: Option<String>,
    svg: bool,
}

fn usage() -> ! {
    eprintln!("Usage: gridslice_cli <config.json> [-o output] [--svg]");
    std::process::exit(1);
}

fn parse_args() -> Args {
    let mut input = None;
    let mut output = None;
    let mut svg = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => output = Some(args.next().unwrap_or_else(|| usage())),
            "--svg" => svg = true,
            _ if input.is_none() => input = Some(arg),
            _ => usage(),
        }
    }

    Args {
        input: input.unwrap_or_else(|| usage()),
        output,
        svg,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args();

    // Read config
    let json = match fs::read_to_string(&args.input) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    let config = match GridConfig::from_json(&json) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing config: {}", e);
            std::process::exit(1);
        }
    };

    let view = match config.build_view() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error building grid: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(cells = view.len(), "grid built");

    let rendered = if args.svg {
        let mut backend = SvgBackend::new();
        if let Err(e) = view.render(&mut backend) {
            eprintln!("Error rendering SVG: {}", e);
            std::process::exit(1);
        }
        backend.into_document()
    } else {
        match serde_json::to_string_pretty(&view.geometry()) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error serializing JSON: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Output
    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &rendered) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written to {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = writeln!(handle, "{}", rendered) {
                eprintln!("Error writing output: {}", e);
                std::process::exit(1);
            }
        }
    }
}
