pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "amplify",
    about = "Amplify operator CLI",
    long_about = "Price campaign files offline, inspect configuration, apply migrations, and check runtime readiness.",
    after_help = "Examples:\n  amplify price campaign.toml\n  amplify config\n  amplify doctor"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a TOML or JSON campaign file and print the breakdown and commission")]
    Price {
        #[arg(help = "Path to the campaign file (.toml or .json)")]
        file: PathBuf,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Validate config, email and generator readiness, and DB connectivity")]
    Doctor,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Price { file } => commands::price::run(&file),
        Command::Config => commands::config::run(),
        Command::Migrate => commands::migrate::run(),
        Command::Doctor => commands::doctor::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
