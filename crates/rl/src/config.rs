//! # Experiment Configuration
//!
//! Per-environment presets and the [`ConfigBuilder`] that turns a preset plus
//! the experiment options (baseline, algorithm, seed) into an immutable
//! [`Config`]. The builder also derives every output path of a run from the
//! results root and the experiment options, so two runs with different options
//! never share a directory.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_RESULTS_ROOT: &str = "results";

/// Policy-optimization variant run by the trainer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Vanilla policy gradient (REINFORCE with optional baseline).
    #[serde(rename = "pg")]
    PolicyGradient,
    /// Proximal policy optimization with a clipped surrogate.
    Ppo,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::PolicyGradient => f.write_str("pg"),
            Algorithm::Ppo => f.write_str("ppo"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pg" | "policy-gradient" | "policy_gradient" => Ok(Algorithm::PolicyGradient),
            "ppo" => Ok(Algorithm::Ppo),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Hyper-parameters shipped with each supported environment.
#[derive(Clone, Debug)]
struct Preset {
    num_batches: usize,
    batch_size: usize,
    max_ep_len: usize,
    learning_rate: f32,
    gamma: f32,
    n_layers: usize,
    layer_size: usize,
}

fn preset(env_name: &str) -> Option<Preset> {
    match env_name {
        "CartPole-v0" => Some(Preset {
            num_batches: 100,
            batch_size: 2000,
            max_ep_len: 200,
            learning_rate: 3e-2,
            gamma: 1.0,
            n_layers: 1,
            layer_size: 64,
        }),
        "InvertedPendulum-v4" => Some(Preset {
            num_batches: 100,
            batch_size: 10_000,
            max_ep_len: 1000,
            learning_rate: 3e-2,
            gamma: 1.0,
            n_layers: 1,
            layer_size: 64,
        }),
        _ => None,
    }
}

/// Immutable record describing one training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub env_name: String,
    pub use_baseline: bool,
    pub algorithm: Algorithm,
    pub seed: u64,

    pub output_path: PathBuf,
    pub model_output: PathBuf,
    pub log_path: PathBuf,
    pub scores_output: PathBuf,
    pub plot_output: PathBuf,
    /// Log a summary line every `summary_freq` iterations.
    pub summary_freq: usize,

    pub num_batches: usize,
    /// Transitions collected per iteration.
    pub batch_size: usize,
    pub max_ep_len: usize,
    pub learning_rate: f32,
    pub gamma: f32,
    pub normalize_advantage: bool,

    pub n_layers: usize,
    pub layer_size: usize,

    pub eps_clip: f32,
    /// PPO epochs over each batch.
    pub update_freq: usize,
}

/// Name of the run directory: `<env>-<baseline|no_baseline>-<pg|ppo>-seed=<seed>`.
fn run_name(env_name: &str, use_baseline: bool, algorithm: Algorithm, seed: u64) -> String {
    let baseline = if use_baseline { "baseline" } else { "no_baseline" };
    format!("{env_name}-{baseline}-{algorithm}-seed={seed}")
}

/// Builds a [`Config`] from an environment preset.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    env_name: String,
    use_baseline: bool,
    algorithm: Algorithm,
    seed: u64,
    results_root: PathBuf,
    summary_freq: usize,
    num_batches: Option<usize>,
    batch_size: Option<usize>,
    max_ep_len: Option<usize>,
    learning_rate: Option<f32>,
    gamma: Option<f32>,
    normalize_advantage: bool,
    n_layers: Option<usize>,
    layer_size: Option<usize>,
    eps_clip: f32,
    update_freq: usize,
}

impl ConfigBuilder {
    pub fn new(env_name: impl Into<String>) -> Self {
        Self {
            env_name: env_name.into(),
            use_baseline: true,
            algorithm: Algorithm::PolicyGradient,
            seed: 0,
            results_root: PathBuf::from(DEFAULT_RESULTS_ROOT),
            summary_freq: 1,
            num_batches: None,
            batch_size: None,
            max_ep_len: None,
            learning_rate: None,
            gamma: None,
            normalize_advantage: true,
            n_layers: None,
            layer_size: None,
            eps_clip: 0.2,
            update_freq: 5,
        }
    }

    #[must_use]
    pub fn use_baseline(mut self, use_baseline: bool) -> Self {
        self.use_baseline = use_baseline;
        self
    }

    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn results_root(mut self, root: impl AsRef<Path>) -> Self {
        self.results_root = root.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn summary_freq(mut self, freq: usize) -> Self {
        self.summary_freq = freq;
        self
    }

    #[must_use]
    pub fn num_batches(mut self, n: usize) -> Self {
        self.num_batches = Some(n);
        self
    }

    #[must_use]
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    /// Episode length cap; 0 means "use the batch size".
    #[must_use]
    pub fn max_ep_len(mut self, n: usize) -> Self {
        self.max_ep_len = Some(n);
        self
    }

    #[must_use]
    pub fn learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = Some(lr);
        self
    }

    #[must_use]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    #[must_use]
    pub fn normalize_advantage(mut self, on: bool) -> Self {
        self.normalize_advantage = on;
        self
    }

    #[must_use]
    pub fn n_layers(mut self, n: usize) -> Self {
        self.n_layers = Some(n);
        self
    }

    #[must_use]
    pub fn layer_size(mut self, n: usize) -> Self {
        self.layer_size = Some(n);
        self
    }

    #[must_use]
    pub fn eps_clip(mut self, eps: f32) -> Self {
        self.eps_clip = eps;
        self
    }

    #[must_use]
    pub fn update_freq(mut self, n: usize) -> Self {
        self.update_freq = n;
        self
    }

    /// Resolves the preset, applies overrides, validates the combination and
    /// derives the output paths.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownPreset`] when no preset exists for the
    /// environment, [`ConfigError::Invalid`] for inconsistent options.
    pub fn build(self) -> Result<Config, ConfigError> {
        let preset = preset(&self.env_name).ok_or_else(|| ConfigError::UnknownPreset {
            env_name: self.env_name.clone(),
        })?;

        let batch_size = self.batch_size.unwrap_or(preset.batch_size);
        let max_ep_len = match self.max_ep_len.unwrap_or(preset.max_ep_len) {
            0 => batch_size,
            n => n,
        };
        let num_batches = self.num_batches.unwrap_or(preset.num_batches);
        let learning_rate = self.learning_rate.unwrap_or(preset.learning_rate);
        let gamma = self.gamma.unwrap_or(preset.gamma);
        let n_layers = self.n_layers.unwrap_or(preset.n_layers);
        let layer_size = self.layer_size.unwrap_or(preset.layer_size);

        if batch_size == 0 {
            return Err(ConfigError::invalid("batch_size", "must be positive"));
        }
        if num_batches == 0 {
            return Err(ConfigError::invalid("num_batches", "must be positive"));
        }
        if max_ep_len > batch_size {
            return Err(ConfigError::invalid(
                "max_ep_len",
                format!("{max_ep_len} exceeds batch_size {batch_size}"),
            ));
        }
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ConfigError::invalid(
                "learning_rate",
                format!("{learning_rate} is not a positive number"),
            ));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(ConfigError::invalid("gamma", format!("{gamma} is outside [0, 1]")));
        }
        if n_layers == 0 || layer_size == 0 {
            return Err(ConfigError::invalid("network", "n_layers and layer_size must be positive"));
        }
        if self.summary_freq == 0 {
            return Err(ConfigError::invalid("summary_freq", "must be positive"));
        }
        if self.algorithm == Algorithm::Ppo {
            if !(self.eps_clip.is_finite() && self.eps_clip > 0.0) {
                return Err(ConfigError::invalid("eps_clip", "PPO needs a positive clip range"));
            }
            if self.update_freq == 0 {
                return Err(ConfigError::invalid("update_freq", "PPO needs at least one epoch"));
            }
        }

        let output_path = self
            .results_root
            .join(run_name(&self.env_name, self.use_baseline, self.algorithm, self.seed));

        Ok(Config {
            model_output: output_path.join("model.weights"),
            log_path: output_path.join("log.txt"),
            scores_output: output_path.join("scores.json"),
            plot_output: output_path.join("scores.png"),
            output_path,
            env_name: self.env_name,
            use_baseline: self.use_baseline,
            algorithm: self.algorithm,
            seed: self.seed,
            summary_freq: self.summary_freq,
            num_batches,
            batch_size,
            max_ep_len,
            learning_rate,
            gamma,
            normalize_advantage: self.normalize_advantage,
            n_layers,
            layer_size,
            eps_clip: self.eps_clip,
            update_freq: self.update_freq,
        })
    }
}
