//! copyref - copy workspace selections as AI chat file references
//!
//! copyref provides:
//! - Expansion of files, folders, projects and the workspace root into files
//! - Root-relative `#file:'<path>'` reference formatting
//! - Clipboard delivery, or printed output (text/json/jsonl)

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
