use std::{io, path::PathBuf};

use thiserror::Error;
use tokio::task::JoinError;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The site configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] config::Error),

    /// The engine rejected the configuration or failed while replaying.
    #[error(transparent)]
    Engine(#[from] marquee_engine::Error),

    /// A replay script could not be read or parsed.
    #[error("script {}: {message}", path.display())]
    Script {
        /// Script path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Building the runtime failed.
    #[error("runtime: {0}")]
    Io(#[from] io::Error),

    /// Serializing output failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// The effect printer task panicked.
    #[error("printer: {0}")]
    Join(#[from] JoinError),
}

impl Error {
    /// Human-oriented rendering; configuration errors carry source excerpts.
    pub fn pretty(&self) -> String {
        match self {
            Self::Config(e) => e.pretty(),
            other => other.to_string(),
        }
    }
}
