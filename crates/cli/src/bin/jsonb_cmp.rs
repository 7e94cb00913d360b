//! `jsonb-cmp`: order two jsonb containers.
//!
//! Prints `-1`, `0` or `1` as the left container sorts before, equal to or
//! after the right one.

use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jsonb_cli::{cmp, decode_input, init_tracing, CommonArgs};

#[derive(Debug, Parser)]
#[command(name = "jsonb-cmp", about = "Compare two jsonb containers")]
struct Cli {
    left: PathBuf,
    right: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn read(path: &PathBuf, hex: bool) -> Result<Vec<u8>> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_input(raw, hex)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let left = read(&cli.left, cli.common.hex)?;
    let right = read(&cli.right, cli.common.hex)?;
    let code = match cmp(left, right)? {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    println!("{code}");
    Ok(())
}
