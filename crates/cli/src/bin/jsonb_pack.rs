//! `jsonb-pack`: encode JSON (stdin) to a jsonb container (stdout).

use std::io::{self, Read, Write};

use anyhow::Result;
use clap::Parser;
use jsonb_cli::{encode_output, init_tracing, pack, CommonArgs};
use jsonb_core::BuilderOptions;

#[derive(Debug, Parser)]
#[command(name = "jsonb-pack", about = "Encode JSON from stdin as a jsonb container")]
struct Cli {
    /// Fail on duplicate object keys instead of keeping the last one
    #[arg(long)]
    unique_keys: bool,

    /// Drop object members whose value is null
    #[arg(long)]
    skip_nulls: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let options = BuilderOptions {
        unique_keys: cli.unique_keys,
        skip_nulls: cli.skip_nulls,
        ..Default::default()
    };
    let bytes = pack(&input, options)?;
    io::stdout().write_all(&encode_output(bytes, cli.common.hex))?;
    Ok(())
}
