pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use washdesk_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "washdesk",
    about = "Washdesk operator CLI",
    long_about = "Operate the power-washing admin store: migrations, demo seeds, \
                  config inspection, and a live price-calculator preview.",
    after_help = "Examples:\n  washdesk migrate\n  washdesk calc --house-sqft 1000 --gutter\n  washdesk doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo dataset (rate card, customers, quotes)")]
    Seed,
    #[command(about = "Preview a quote total against the resolved pricing configuration")]
    Calc(commands::calc::CalcArgs),
    #[command(about = "Inspect effective configuration values")]
    Config,
    #[command(about = "Validate config and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn init_logging(config: &AppConfig) {
    use washdesk_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);

    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Calc(args) => commands::calc::run(args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
