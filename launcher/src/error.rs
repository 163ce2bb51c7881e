use ml::EnvError;
use rl::{ConfigError, TrainError};
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the launch pipeline, one variant per step.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("environment not found")]
    EnvironmentNotFound(#[source] EnvError),
    #[error("invalid configuration")]
    Configuration(#[from] ConfigError),
    #[error("cannot prepare output directory {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot snapshot configuration")]
    Snapshot(#[from] serde_json::Error),
    #[error("training failed")]
    Training(#[from] TrainError),
}
