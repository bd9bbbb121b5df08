//! Storefront CLI

use std::process;

use clap::Parser;

mod commands;
mod config;
mod observability;
mod shell;

use config::Cli;
use shell::Shell;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let shell = Shell::open(&cli.settings)?;

    let result = cli.command.run(&shell).await;

    shell.finish();

    result
}
