use clap::Parser;
use owo_colors::{OwoColorize, Style};
use recur_core::error::CoreError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

fn main() {
    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        eprintln!("{} {:#}; using defaults", "Warning:".yellow().bold(), e);
        config::Config::default()
    });
    init_tracing(&config.log_level);

    let result = match cli.command {
        cli::Commands::Next(command) => commands::next::next_occurrence(command, &config),
        cli::Commands::Preview(command) => {
            commands::preview::preview_occurrences(command, &config)
        }
        cli::Commands::Describe(command) => commands::describe::describe_rule(command),
        cli::Commands::Complete(command) => commands::complete::complete_task(command, &config),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; RUST_LOG wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        Some(CoreError::InvalidRule(s)) => {
            eprintln!("{} Invalid rule: {}", "Error:".style(error_style), s.yellow());
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
