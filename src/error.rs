//! Error types for gantry.
//!
//! Each pipeline concern has its own error enum; they are unified under
//! [`Error`]. Every error is terminal for a deployment run.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::constants;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    KeyFile(#[from] KeyFileError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Host configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "no `{}` entry in the plugin list; see {}",
        constants::PLUGIN_NAME,
        constants::DOCS_URL
    )]
    MissingPluginConfig,

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid host config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application descriptor errors.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("app descriptor not found or unreadable: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to serialize app descriptor: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Secret resolution errors.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("environment variable {0} is not set")]
    MissingVariable(String),
}

/// Credential key file errors.
#[derive(Error, Debug)]
pub enum KeyFileError {
    #[error("key file not specified")]
    Unspecified,

    #[error("key file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// External deploy tool errors.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}{}", status_label(.code), stderr_suffix(.stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn status_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
