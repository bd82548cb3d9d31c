//! searchweb CLI — answer a question with a cited web-search summary.
//!
//! Codex CLI changelog questions are answered straight from the GitHub
//! releases listing; everything else goes through OpenRouter.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::Cli;

/// Exit status for every fatal error.
const FATAL_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(report) = color_eyre::install() {
        eprintln!("{report:?}");
        return ExitCode::from(FATAL_EXIT);
    }

    let cli = Cli::parse();
    commands::init_tracing(&cli);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}
