//! Error types for the agent.
//!
//! None of these ever terminate the process: readers record their error in
//! the sample, the emitter and reporter log and drop.

use thiserror::Error;

/// An OS-level metric query failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("system metrics are not supported on this platform")]
    Unsupported,

    #[error("{0}")]
    Unavailable(String),
}

/// The sample could not be encoded as JSON.
#[derive(Debug, Error)]
#[error("failed to serialize sample: {0}")]
pub struct SerializationError(#[from] pub serde_json::Error);

/// Sending a sample to the destination failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("no .env file found")]
    EnvFileMissing,

    #[error("failed to load .env file: {0}")]
    EnvFile(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl From<dotenvy::Error> for ConfigLoadError {
    fn from(err: dotenvy::Error) -> Self {
        if err.not_found() {
            Self::EnvFileMissing
        } else {
            Self::EnvFile(err.to_string())
        }
    }
}
