use anyhow::Result;
use clap::Parser;
use knobs_cli::{Cli, run};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}
