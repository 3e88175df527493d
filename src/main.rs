//! conflict-pr binary

mod cli;

use clap::Parser;
use cli::{Cli, annotate_error, run_action};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    match run_action(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", annotate_error(&e.message()));
            ExitCode::FAILURE
        }
    }
}
