//! `catalog` entry point.
//!
//! Parses arguments, loads settings, installs logging and hands the command
//! to `commands::run`. Logs go to stderr so tables on stdout stay clean.

mod cli;
mod commands;
mod settings;
mod view;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::settings::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }

    init_tracing(&settings.log.filter);
    tracing::debug!(
        base_url = %settings.api.base_url,
        update_method = ?settings.api.update_method,
        price_policy = ?settings.validation.price_policy,
        "settings loaded"
    );

    commands::run(cli.command, &settings)
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
