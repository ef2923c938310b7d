// src/bin/cli.rs
use color_eyre::eyre::Result;
use race_results::cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let summary = cli::run()?;
    if summary.appended == 0 {
        eprintln!("No club results found.");
    }
    Ok(())
}
