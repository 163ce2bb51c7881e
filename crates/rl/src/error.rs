use ml::EnvError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration preset for environment '{env_name}'")]
    UnknownPreset { env_name: String },
    #[error("unknown algorithm '{0}' (expected 'pg' or 'ppo')")]
    UnknownAlgorithm(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("environment error")]
    Env(#[from] EnvError),
    #[error("environment '{env}' is not supported: {reason}")]
    UnsupportedEnv { env: String, reason: String },
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize training output")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to render score plot")]
    Plot(#[from] image::ImageError),
    #[error("{batch} actions given to a {head} policy")]
    ActionMismatch { head: &'static str, batch: &'static str },
    #[error("non-finite {what} at iteration {iteration}")]
    NonFinite { what: &'static str, iteration: usize },
}

impl TrainError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
