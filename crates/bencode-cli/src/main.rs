//! `bencode` CLI — decode, encode, and check Bencode files from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Show a .torrent file as pretty-printed JSON
//! bencode decode -i ubuntu.torrent
//!
//! # Reject documents whose dictionary keys are not UTF-8
//! bencode decode --keys-as-text -i ubuntu.torrent
//!
//! # Encode JSON to Bencode (stdin → stdout), sorting dictionary keys
//! echo '{"spam":"eggs","cow":"moo"}' | bencode encode --sort-keys
//!
//! # Validate a file and print a one-line summary
//! bencode check -i ubuntu.torrent
//! ```

use anyhow::{Context, Result};
use bencode_core::{DecodeOptions, Value, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(name = "bencode", version, about = "Bencode decoder/encoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode Bencode to pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Encode JSON to Bencode
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Sort dictionary keys by raw bytes before encoding
        #[arg(long)]
        sort_keys: bool,
    },
    /// Validate a Bencode document and print a summary
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Require dictionary keys to be valid UTF-8
    #[arg(long)]
    keys_as_text: bool,
    /// Maximum nesting of lists and dictionaries
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
            .range(0..=MAX_DEPTH_LIMIT as u64)
    )]
    max_depth: usize,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        DecodeOptions::new()
            .keys_as_text(self.keys_as_text)
            .max_depth(self.max_depth)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            output,
            decode,
        } => {
            let raw = read_input(input.as_deref())?;
            let value = bencode_core::decode_with(&raw, &decode.options())
                .context("Failed to decode bencode")?;
            let json = bencode_core::to_json(&value).context("Failed to render JSON")?;
            let pretty = serde_json::to_string_pretty(&json)?;
            write_output(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Encode {
            input,
            output,
            sort_keys,
        } => {
            let raw = read_input(input.as_deref())?;
            let json: serde_json::Value =
                serde_json::from_slice(&raw).context("Failed to parse JSON input")?;
            let mut value =
                bencode_core::from_json(&json).context("Failed to encode JSON to bencode")?;
            if sort_keys {
                value = value.into_canonical();
            }
            write_output(output.as_deref(), &bencode_core::encode(&value))?;
        }
        Commands::Check { input, decode } => {
            let raw = read_input(input.as_deref())?;
            let value = bencode_core::decode_with(&raw, &decode.options())
                .context("Failed to decode bencode")?;
            println!("{}", summarize(&value, raw.len()));
        }
    }

    Ok(())
}

/// One-line description of a valid document, e.g.
/// `ok: dictionary with 2 keys, 24 bytes, keys sorted`.
fn summarize(value: &Value, len: usize) -> String {
    let shape = match value {
        Value::ByteString(b) => format!("byte string of {} bytes", b.len()),
        Value::Integer(n) => format!("integer {}", n),
        Value::List(items) => format!("list of {} items", items.len()),
        Value::Map(dict) => format!("dictionary with {} keys", dict.len()),
    };
    let order = if value.is_canonical() {
        "keys sorted"
    } else {
        "keys not sorted"
    };
    format!("ok: {}, {} bytes, {}", shape, len, order)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
