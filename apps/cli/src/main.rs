//! Gazette CLI: company-notice analyzer for Monitorul Oficial Partea a IV-a.
//!
//! Reads gazette issues, classifies each company notice, ranks the companies
//! against the largest-companies registry, and writes a report or alert
//! summary.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
