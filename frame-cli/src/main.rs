//! Frame CLI - Command line interface
//!
//! `frame read` loads frame text into an in-memory heap and reports the
//! top-level objects; `frame fingerprint` prints 64-bit fingerprints.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};

mod config;
mod logging;
mod platform;

use crate::config::LogConfig;
use crate::logging::LogFormat;
use crate::platform::print_error_with_source;
use frame_config::FrameConfig;
use frame_core::{fingerprint_cat, fingerprint_str, Handle, Heap, Lexer, Object, Reader};

#[derive(Parser)]
#[command(name = "frame", about = "Frame store text reader", version = "0.1.0")]
struct Cli {
    /// Global log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Per-phase log level override, e.g. `reader=trace` (repeatable)
    #[arg(long = "log-phase", value_name = "PHASE=LEVEL", global = true)]
    log_phase: Vec<String>,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read every top-level object of a frame text file
    Read {
        /// Frame text file
        file: PathBuf,

        /// Treat string frame keys as symbols (JSON-compatible mode)
        #[arg(long)]
        json: bool,

        /// Maximum nesting depth of frames and arrays
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print a JSON summary of every object instead of one line each
        #[arg(long)]
        dump: bool,
    },

    /// Print the fingerprint of each argument and, for several, their combination
    Fingerprint {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::new(cli.log_level);
    for directive in &cli.log_phase {
        if let Err(e) = log_config.apply_override(directive) {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
    logging::init(&log_config, cli.log_format);

    match cli.command {
        Command::Read {
            file,
            json,
            max_depth,
            config,
            dump,
        } => {
            let mut frame_config = match config.as_deref().map(read_config).transpose() {
                Ok(c) => c.unwrap_or_default(),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            };
            if json {
                frame_config.reader.json = true;
            }
            if let Some(depth) = max_depth {
                frame_config.reader.max_depth = depth;
            }
            handle_read(&file, &frame_config, dump);
        }
        Command::Fingerprint { texts } => handle_fingerprint(&texts),
    }
}

/// Read and parse a configuration file
fn read_config(path: &Path) -> Result<FrameConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config '{}': {}", path.display(), e))?;
    FrameConfig::from_json_str(&content)
        .map_err(|e| format!("Cannot parse config '{}': {}", path.display(), e))
}

fn handle_read(path: &Path, config: &FrameConfig, dump: bool) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Cannot read file '{}': {}", path.display(), e);
            process::exit(1);
        }
    };
    info!(target: "frame::cli", file = %path.display(), bytes = source.len(), "Reading frame text");

    let mut heap = Heap::with_config(&config.store);
    let result = Reader::new(&mut heap, Lexer::from_source(&source), &config.reader).read_all();
    let handles = match result {
        Ok(handles) => handles,
        Err(e) => {
            print_error_with_source(&e, &source);
            process::exit(1);
        }
    };
    debug!(target: "frame::cli", objects = handles.len(), heap = heap.len(), "Read complete");

    if dump {
        let summaries: Vec<ObjectSummary> =
            handles.iter().map(|h| ObjectSummary::new(&heap, *h)).collect();
        match serde_json::to_string_pretty(&summaries) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        for (i, handle) in handles.iter().enumerate() {
            println!("{:3} | {}", i, describe(&heap, *handle));
        }
    }
}

fn handle_fingerprint(texts: &[String]) {
    let fingerprints: Vec<u64> = texts.iter().map(|t| fingerprint_str(t)).collect();
    for (text, fp) in texts.iter().zip(&fingerprints) {
        println!("{fp:016x}  {text}");
    }
    if let Some((first, rest)) = fingerprints.split_first() {
        if !rest.is_empty() {
            let combined = rest.iter().fold(*first, |acc, fp| fingerprint_cat(acc, *fp));
            println!("{combined:016x}  (combined)");
        }
    }
}

/// One-line description of an object, without following references
fn describe(heap: &Heap, handle: Handle) -> String {
    match heap.get(handle) {
        Ok(Object::Nil) => "nil".to_string(),
        Ok(Object::Bool(b)) => b.to_string(),
        Ok(Object::Int(n)) => n.to_string(),
        Ok(Object::Float(x)) => x.to_string(),
        Ok(Object::String(s)) => format!("{s:?}"),
        Ok(Object::Symbol { name: Some(name) }) => name.clone(),
        Ok(Object::Symbol { name: None }) => format!("#<local {handle}>"),
        Ok(Object::Frame(slots)) => format!("frame {handle} ({} slots)", slots.len()),
        Ok(Object::Array(elems)) => format!("array {handle} ({} elements)", elems.len()),
        Err(e) => format!("<{e}>"),
    }
}

/// `--dump` output: an object and its direct children
#[derive(Serialize)]
struct ObjectSummary {
    handle: usize,
    kind: &'static str,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<SlotSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    elements: Vec<String>,
}

#[derive(Serialize)]
struct SlotSummary {
    role: String,
    value: String,
}

impl ObjectSummary {
    fn new(heap: &Heap, handle: Handle) -> Self {
        let kind = heap.get(handle).map(Object::kind_name).unwrap_or("invalid");
        let slots = heap
            .frame(handle)
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| SlotSummary {
                        role: describe(heap, slot.role),
                        value: describe(heap, slot.value),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let elements = heap
            .array(handle)
            .map(|elems| elems.iter().map(|h| describe(heap, *h)).collect())
            .unwrap_or_default();
        Self {
            handle: handle.index(),
            kind,
            text: describe(heap, handle),
            slots,
            elements,
        }
    }
}
