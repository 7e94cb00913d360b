//! Command-line tools for jsonb containers.
//!
//! Provides the logic behind the binary entry points:
//! - `jsonb-pack`: JSON text (stdin) to a container (stdout)
//! - `jsonb-unpack`: a container (stdin) to JSON text (stdout)
//! - `jsonb-cmp`: order two containers read from files

use std::cmp::Ordering;

use anyhow::{Context, Result};
use clap::Args;
use jsonb_core::{compare, BuilderOptions, Jsonb};

/// Flags shared by every tool.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Containers are hex text instead of raw bytes
    #[arg(long)]
    pub hex: bool,

    /// Log to stderr (honours RUST_LOG, defaults to debug)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Installs the stderr log subscriber. Logging is off unless `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Encodes JSON text into container bytes.
pub fn pack(json: &str, options: BuilderOptions) -> Result<Vec<u8>> {
    let doc: serde_json::Value = serde_json::from_str(json).context("input is not valid JSON")?;
    let jb = Jsonb::from_json(&doc, options)?;
    tracing::debug!(bytes = jb.len(), "packed document");
    Ok(jb.into_bytes())
}

/// Decodes container bytes into JSON text.
pub fn unpack(bytes: Vec<u8>, pretty: bool) -> Result<String> {
    let jb = Jsonb::from_bytes(bytes).context("input is not a jsonb container")?;
    let doc = jb.to_json()?;
    let text = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(text)
}

/// Orders two encoded containers.
pub fn cmp(a: Vec<u8>, b: Vec<u8>) -> Result<Ordering> {
    let a = Jsonb::from_bytes(a).context("left input is not a jsonb container")?;
    let b = Jsonb::from_bytes(b).context("right input is not a jsonb container")?;
    Ok(compare(&a.as_container(), &b.as_container())?)
}

/// Reads container bytes, decoding hex text when `hex` is set.
pub fn decode_input(raw: Vec<u8>, hex: bool) -> Result<Vec<u8>> {
    if !hex {
        return Ok(raw);
    }
    let text = std::str::from_utf8(&raw).context("hex input is not text")?;
    hex::decode(text.trim()).context("invalid hex input")
}

/// Writes container bytes, as hex text when `hex` is set.
pub fn encode_output(bytes: Vec<u8>, hex: bool) -> Vec<u8> {
    if hex {
        let mut text = hex::encode(bytes).into_bytes();
        text.push(b'\n');
        text
    } else {
        bytes
    }
}
