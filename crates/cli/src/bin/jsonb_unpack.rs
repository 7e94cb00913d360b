//! `jsonb-unpack`: decode a jsonb container (stdin) to JSON (stdout).

use std::io::{self, Read, Write};

use anyhow::Result;
use clap::Parser;
use jsonb_cli::{decode_input, init_tracing, unpack, CommonArgs};

#[derive(Debug, Parser)]
#[command(name = "jsonb-unpack", about = "Decode a jsonb container from stdin as JSON")]
struct Cli {
    /// Indent the output
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let mut raw = Vec::new();
    io::stdin().read_to_end(&mut raw)?;

    let text = unpack(decode_input(raw, cli.common.hex)?, cli.pretty)?;
    writeln!(io::stdout(), "{text}")?;
    Ok(())
}
