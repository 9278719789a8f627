use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while ingesting the feed.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// The transport reported an error. Surfaced to the user as a banner.
    #[error("connection error: {0}")]
    Connection(String),

    /// An inbound frame did not match the wire schema. Dropped per frame.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::MalformedFrame(err.to_string())
    }
}

/// Failures raised while building [`crate::config::Settings`] at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Args(#[from] pico_args::Error),

    #[error("unexpected arguments: {0}")]
    UnexpectedArgs(String),

    #[error("no feed uri configured (use --uri, NOTIFY_HUD_URI or the config file)")]
    MissingUri,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T, E = FeedError> = std::result::Result<T, E>;
