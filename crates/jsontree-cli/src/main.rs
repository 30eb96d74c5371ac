//! `jsontree` CLI — format, query, flatten and collapse JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Canonical (compact) form, stdin → stdout
//! echo '{ "a" : 1 }' | jsontree fmt
//!
//! # Indented form, file → file
//! jsontree fmt --indent 4 -i data.json -o pretty.json
//!
//! # Read one value by dotted path
//! jsontree get server.port -i config.json
//!
//! # Fold nested objects into dotted keys / prune null branches
//! jsontree flatten -i config.json
//! jsontree collapse -i sparse.json
//!
//! # Flat key=value listing
//! jsontree dump -i config.json
//! ```
//!
//! Diagnostics go through `env_logger`; set `RUST_LOG=debug` to see them.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jsontree_core::{DottedView, Node, ParseOptions, RenderOptions};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "jsontree",
    version,
    about = "Format, query and reshape JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nesting depth accepted by the parser (0 disables the limit)
    #[arg(long, global = true, default_value_t = jsontree_core::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Args)]
struct Io {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-serialize a document (canonical when --indent is 0)
    Fmt {
        #[command(flatten)]
        io: Io,
        /// Spaces per nesting level
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Print the value at a dotted path
    Get {
        /// Dotted path, e.g. `server.http.port`
        path: String,
        #[command(flatten)]
        io: Io,
    },
    /// Fold nested objects into dot-joined keys
    Flatten {
        #[command(flatten)]
        io: Io,
        /// Spaces per nesting level
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Remove null-only branches
    Collapse {
        #[command(flatten)]
        io: Io,
        /// Spaces per nesting level
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// List every string-convertible leaf as `key=value`
    Dump {
        #[command(flatten)]
        io: Io,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = ParseOptions {
        max_depth: (cli.max_depth > 0).then_some(cli.max_depth),
    };

    match run(cli.command, &options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    }
}

/// Execute one subcommand. `Ok(false)` signals a clean miss (e.g. absent path).
fn run(command: Commands, options: &ParseOptions) -> Result<bool> {
    match command {
        Commands::Fmt { io, indent } => {
            let node = read_document(&io, options)?;
            write_output(io.output.as_deref(), &render(&node, indent))?;
        }
        Commands::Get { path, io } => {
            let node = read_document(&io, options)?;
            let Some(found) = node.get(&path) else {
                log::info!("no value at `{path}`");
                return Ok(false);
            };
            let text = if found.is_simple() {
                found
                    .get_string()
                    .context("Failed to read value as text")?
                    .unwrap_or_else(|| "null".to_string())
            } else {
                found.to_json()
            };
            write_output(io.output.as_deref(), &text)?;
        }
        Commands::Flatten { io, indent } => {
            let mut node = read_document(&io, options)?;
            node.flatten();
            write_output(io.output.as_deref(), &render(&node, indent))?;
        }
        Commands::Collapse { io, indent } => {
            let mut node = read_document(&io, options)?;
            node.collapse();
            write_output(io.output.as_deref(), &render(&node, indent))?;
        }
        Commands::Dump { io } => {
            let node = read_document(&io, options)?;
            let lines: Vec<String> = node
                .dump()
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write_output(io.output.as_deref(), &lines.join("\n"))?;
        }
    }
    Ok(true)
}

fn render(node: &Node, indent: usize) -> String {
    node.to_json_with(&RenderOptions::with_indent(indent))
}

fn read_document(io: &Io, options: &ParseOptions) -> Result<Node> {
    let text = read_input(io.input.as_deref())?;
    log::debug!("read {} bytes", text.len());
    jsontree_core::parse_with(&text, options).context("Failed to parse JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
