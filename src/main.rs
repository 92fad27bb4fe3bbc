//! Gantry - deploy app.yml services with secrets injected from the environment.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gantry::cli::output;
use gantry::cli::{execute, Cli};
use gantry::error::{CommandError, ConfigError, Error, KeyFileError, SecretError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("GANTRY_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("gantry=debug")
        } else {
            EnvFilter::new("gantry=warn")
        }
    });
    let json = std::env::var("GANTRY_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr)
        }))
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::MissingPluginConfig) => {
            Some("add a [[plugins]] entry with name = \"gantry\" to build.toml")
        }
        Error::Secret(SecretError::MissingVariable(_)) => {
            Some("export every name listed in the plugin's secrets before deploying")
        }
        Error::KeyFile(KeyFileError::Unspecified) => Some("pass --key-file <path>"),
        Error::Command(CommandError::Spawn { .. }) => {
            Some("install the Google Cloud SDK or pass --tool <program>")
        }
        _ => None,
    }
}
