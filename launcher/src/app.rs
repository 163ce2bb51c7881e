//! # Launch Pipeline
//!
//! Builds the environment, the configuration and the output directory, then
//! hands them to a trainer and runs it. Every step propagates its error
//! untouched; nothing is retried.

use crate::error::LaunchError;
use ml::Env;
use rl::{Algorithm, Config, ConfigBuilder, TrainError, Trainer, TrainingReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_SNAPSHOT: &str = "config.json";

/// Options recognised by the launcher.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchOptions {
    pub env_name: String,
    pub use_baseline: bool,
    pub algorithm: Algorithm,
    pub seed: u64,
    pub results_root: PathBuf,
    pub num_batches: Option<usize>,
    pub batch_size: Option<usize>,
    pub max_ep_len: Option<usize>,
}

impl Default for LaunchOptions {
    /// The reference experiment: PPO with a baseline on the inverted pendulum.
    fn default() -> Self {
        Self {
            env_name: "InvertedPendulum-v4".to_string(),
            use_baseline: true,
            algorithm: Algorithm::Ppo,
            seed: 3,
            results_root: PathBuf::from(rl::config::DEFAULT_RESULTS_ROOT),
            num_batches: None,
            batch_size: None,
            max_ep_len: None,
        }
    }
}

impl LaunchOptions {
    fn config_builder(&self) -> ConfigBuilder {
        let mut builder = ConfigBuilder::new(&self.env_name)
            .use_baseline(self.use_baseline)
            .algorithm(self.algorithm)
            .seed(self.seed)
            .results_root(&self.results_root);
        if let Some(n) = self.num_batches {
            builder = builder.num_batches(n);
        }
        if let Some(n) = self.batch_size {
            builder = builder.batch_size(n);
        }
        if let Some(n) = self.max_ep_len {
            builder = builder.max_ep_len(n);
        }
        builder
    }
}

/// Creates `path` (and its parents) unless it already is a directory.
/// Returns whether anything was created.
///
/// # Errors
///
/// Returns [`LaunchError::Filesystem`] when the directory cannot be created,
/// including when `path` exists as a file.
pub fn ensure_output_dir(path: &Path) -> Result<bool, LaunchError> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)
        .map_err(|source| LaunchError::Filesystem { path: path.to_path_buf(), source })?;
    Ok(true)
}

fn write_snapshot(config: &Config) -> Result<(), LaunchError> {
    let path = config.output_path.join(CONFIG_SNAPSHOT);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).map_err(|source| LaunchError::Filesystem { path, source })
}

/// Runs one experiment.
///
/// `make_trainer` receives the environment, the configuration and the seed
/// once the output directory exists; the trainer it returns is run exactly
/// once.
///
/// # Errors
///
/// The first failing step's error, see [`LaunchError`].
pub fn launch<T, F>(options: &LaunchOptions, make_trainer: F) -> Result<TrainingReport, LaunchError>
where
    T: Trainer,
    F: FnOnce(Box<dyn Env>, Config, u64) -> Result<T, TrainError>,
{
    let env = rl::make(&options.env_name).map_err(LaunchError::EnvironmentNotFound)?;
    info!(env = env.name(), "environment ready");

    let config = options.config_builder().build()?;

    if ensure_output_dir(&config.output_path)? {
        info!(path = %config.output_path.display(), "created output directory");
    } else {
        info!(path = %config.output_path.display(), "output directory already exists");
    }
    write_snapshot(&config)?;

    let mut trainer = make_trainer(env, config, options.seed)?;
    let report = trainer.run()?;
    info!(
        iterations = report.scores.len(),
        final_average = report.final_average,
        "training finished"
    );
    Ok(report)
}
