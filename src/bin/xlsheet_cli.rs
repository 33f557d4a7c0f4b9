//! CLI tool for xlsheet - loads CSV/TSV into a worksheet and outputs the
//! worksheet XML
//!
//! Usage:
//!   xlsheet_cli <input.csv>                    # Worksheet XML to stdout
//!   xlsheet_cli <input.tsv> -o sheet1.xml      # Worksheet XML to file
//!   xlsheet_cli <input.csv> --stream           # Constant memory mode
//!   xlsheet_cli <input.csv> --options o.json   # WorksheetOptions as JSON
//!   xlsheet_cli <input.csv> --summary          # JSON summary instead of XML
//!   -v / -q                                    # More / less logging on stderr

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{LevelFilter, Log, Metadata, Record};
use xlsheet::csv::{load_delimited, Delimiter};
use xlsheet::{Worksheet, WorksheetOptions};

const USAGE: &str = "Usage: xlsheet_cli <input.csv|tsv> [-o sheet.xml] [--stream] \
                     [--options opts.json] [--summary] [-v|-q]";

/// Plain `level: message` lines on stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level().as_str().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

#[derive(Debug, Default)]
struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    options: Option<PathBuf>,
    stream: bool,
    summary: bool,
    level: Option<LevelFilter>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut input = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = args.next().ok_or("-o needs a file name")?;
                parsed.output = Some(PathBuf::from(path));
            }
            "--options" => {
                let path = args.next().ok_or("--options needs a file name")?;
                parsed.options = Some(PathBuf::from(path));
            }
            "--stream" => parsed.stream = true,
            "--summary" => parsed.summary = true,
            "-v" | "--verbose" => parsed.level = Some(LevelFilter::Debug),
            "-q" | "--quiet" => parsed.level = Some(LevelFilter::Error),
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag {flag}\n{USAGE}")),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return Err(USAGE.to_string()),
        }
    }
    parsed.input = input.ok_or(USAGE)?;
    Ok(parsed)
}

fn load_options(path: Option<&Path>, stream: bool) -> Result<WorksheetOptions, String> {
    let mut options = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
            WorksheetOptions::from_json(&json)
                .map_err(|e| format!("Error in {}: {e}", path.display()))?
        }
        None => WorksheetOptions::default(),
    };
    options.constant_memory |= stream;
    Ok(options)
}

fn run(args: &Args) -> Result<(), String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("Error reading {}: {e}", args.input.display()))?;
    let options = load_options(args.options.as_deref(), args.stream)?;

    let mut ws = Worksheet::new(options).map_err(|e| format!("Error creating worksheet: {e}"))?;
    let stats = load_delimited(&mut ws, &text, Delimiter::from_path(&args.input))
        .map_err(|e| format!("Error loading {}: {e}", args.input.display()))?;
    if stats.truncated > 0 {
        log::warn!("{} strings truncated to 32767 characters", stats.truncated);
    }

    let output = if args.summary {
        serde_json::to_string_pretty(&ws.summary())
            .map_err(|e| format!("Error serializing JSON: {e}"))?
    } else {
        ws.assemble_xml()
            .map_err(|e| format!("Error assembling worksheet: {e}"))?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
            log::info!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| writeln!(stdout))
                .map_err(|e| format!("Error writing output: {e}"))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(args.level.unwrap_or(LevelFilter::Warn));
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
