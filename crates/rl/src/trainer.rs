//! # Policy-Gradient Trainer
//!
//! [`PolicyGradient`] owns an environment, a [`Config`] and the networks, and
//! runs the full training loop through [`Trainer::run`]. Each iteration:
//!
//! 1. samples exactly `batch_size` transitions with the current policy;
//! 2. computes discounted reward-to-go returns per path;
//! 3. turns them into advantages (minus the baseline's value estimate when
//!    enabled, then normalized when configured);
//! 4. updates the baseline and the policy, once for vanilla policy gradient or
//!    `update_freq` times against the frozen behaviour log-probabilities for
//!    PPO;
//! 5. records the average episode reward and persists the scores.
//!
//! When the loop finishes the score curve is plotted and the weights are
//! written under the configured model directory.

use crate::baseline::BaselineNetwork;
use crate::config::{Algorithm, Config};
use crate::error::TrainError;
use crate::output::{save_scores, save_weights, RunLog};
use crate::pg::policy_gradient_objective;
use crate::plot::export_plot;
use crate::policy::{ActionBatch, Policy};
use crate::ppo::{clip_fraction, clipped_surrogate};
use crate::rollout::{discounted_returns, normalize, reward_summary, sample_paths};
use ml::{Env, Tensor};
use tracing::{debug, info};

/// Anything that owns a training loop.
pub trait Trainer {
    /// Runs training to completion.
    ///
    /// # Errors
    ///
    /// Returns the first environment, numerical or output failure.
    fn run(&mut self) -> Result<TrainingReport, TrainError>;
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingReport {
    /// Average episode reward of every iteration.
    pub scores: Vec<f32>,
    pub final_average: f32,
}

/// Per-iteration statistics.
#[derive(Clone, Debug)]
pub struct IterationStats {
    pub average_reward: f32,
    pub sigma_reward: f32,
    pub episodes: usize,
    pub policy_loss: f32,
    pub baseline_loss: Option<f32>,
}

pub struct PolicyGradient {
    env: Box<dyn Env>,
    config: Config,
    policy: Policy,
    baseline: Option<BaselineNetwork>,
    rng: fastrand::Rng,
    obs_dim: usize,
}

impl PolicyGradient {
    /// Seeds the trainer RNG with `seed`, seeds the environment from that RNG
    /// and initializes the networks.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::UnsupportedEnv`] when the environment's spaces
    /// cannot be handled by the policy.
    pub fn new(mut env: Box<dyn Env>, config: Config, seed: u64) -> Result<Self, TrainError> {
        let mut rng = fastrand::Rng::with_seed(seed);
        env.seed(rng.u64(..));
        let observation_space = env.observation_space();
        let policy = Policy::new(
            &observation_space,
            &env.action_space(),
            config.n_layers,
            config.layer_size,
            config.learning_rate,
            &mut rng,
        )
        .map_err(|e| match e {
            TrainError::UnsupportedEnv { reason, .. } => {
                TrainError::UnsupportedEnv { env: env.name().to_string(), reason }
            }
            other => other,
        })?;
        let obs_dim = observation_space.flat_dim();
        let baseline = config.use_baseline.then(|| {
            BaselineNetwork::new(
                obs_dim,
                config.n_layers,
                config.layer_size,
                config.learning_rate,
                &mut rng,
            )
        });
        Ok(Self { env, config, policy, baseline, rng, obs_dim })
    }

    /// Advantages for `returns` observed at `observations`.
    pub fn calculate_advantage(&self, returns: &[f32], observations: &Tensor) -> Vec<f32> {
        let mut advantages = match &self.baseline {
            Some(baseline) => baseline.advantages(returns, observations),
            None => returns.to_vec(),
        };
        if self.config.normalize_advantage {
            normalize(&mut advantages);
        }
        advantages
    }

    /// Samples one batch and applies the configured update.
    ///
    /// # Errors
    ///
    /// Propagates environment failures and reports non-finite losses.
    pub fn train_iteration(&mut self, iteration: usize) -> Result<IterationStats, TrainError> {
        let batch = sample_paths(
            self.env.as_mut(),
            &self.policy,
            &mut self.rng,
            self.config.batch_size,
            self.config.max_ep_len,
        )?;
        let observations = batch.observations(self.obs_dim);
        let actions = batch.actions()?;
        let returns = discounted_returns(&batch.paths, self.config.gamma);
        let advantages = self.calculate_advantage(&returns, &observations);

        let (policy_loss, baseline_loss) = match self.config.algorithm {
            Algorithm::PolicyGradient => {
                let baseline_loss = self.update_baseline(&observations, &returns);
                let loss = self.policy.update(&observations, &actions, |lp| {
                    policy_gradient_objective(lp, &advantages)
                })?;
                (loss, baseline_loss)
            }
            Algorithm::Ppo => {
                let old_log_probs = batch.log_probs();
                let mut losses = (0.0, None);
                for epoch in 0..self.config.update_freq {
                    let baseline_loss = self.update_baseline(&observations, &returns);
                    let loss = self.update_ppo(
                        &observations,
                        &actions,
                        &old_log_probs,
                        &advantages,
                        epoch,
                    )?;
                    losses = (loss, baseline_loss);
                }
                losses
            }
        };

        if !policy_loss.is_finite() {
            return Err(TrainError::NonFinite { what: "policy loss", iteration });
        }
        if baseline_loss.is_some_and(|l| !l.is_finite()) {
            return Err(TrainError::NonFinite { what: "baseline loss", iteration });
        }

        let (average_reward, sigma_reward) = reward_summary(&batch.episode_rewards);
        Ok(IterationStats {
            average_reward,
            sigma_reward,
            episodes: batch.episode_rewards.len(),
            policy_loss,
            baseline_loss,
        })
    }

    fn update_baseline(&mut self, observations: &Tensor, returns: &[f32]) -> Option<f32> {
        self.baseline.as_mut().map(|b| b.update(observations, returns))
    }

    fn update_ppo(
        &mut self,
        observations: &Tensor,
        actions: &ActionBatch,
        old_log_probs: &[f32],
        advantages: &[f32],
        epoch: usize,
    ) -> Result<f32, TrainError> {
        let eps = self.config.eps_clip;
        let mut clipped = 0.0;
        let loss = self.policy.update(observations, actions, |lp| {
            clipped = clip_fraction(lp, old_log_probs, eps);
            clipped_surrogate(lp, old_log_probs, advantages, eps)
        })?;
        debug!(epoch, loss, clip_fraction = clipped, "ppo epoch");
        Ok(loss)
    }

    fn save_weights(&self) -> Result<(), TrainError> {
        let dir = &self.config.model_output;
        save_weights(dir, "policy", &self.policy.weights())?;
        if let Some(baseline) = &self.baseline {
            save_weights(dir, "baseline", &baseline.weights())?;
        }
        Ok(())
    }
}

impl Trainer for PolicyGradient {
    fn run(&mut self) -> Result<TrainingReport, TrainError> {
        let mut log = RunLog::open(&self.config.log_path)?;
        info!(
            env = %self.config.env_name,
            algorithm = %self.config.algorithm,
            baseline = self.config.use_baseline,
            seed = self.config.seed,
            "starting training"
        );

        let mut scores = Vec::with_capacity(self.config.num_batches);
        for t in 0..self.config.num_batches {
            let stats = self.train_iteration(t)?;
            scores.push(stats.average_reward);
            debug!(
                iteration = t,
                episodes = stats.episodes,
                policy_loss = stats.policy_loss,
                baseline_loss = ?stats.baseline_loss,
                action_std = ?self.policy.action_std(),
                "iteration complete"
            );
            if t % self.config.summary_freq == 0 {
                let msg = format!(
                    "[ITERATION {t}]: Average reward: {:04.2} +/- {:04.2}",
                    stats.average_reward, stats.sigma_reward
                );
                info!("{msg}");
                log.line(&msg)?;
            }
            save_scores(&self.config.scores_output, &scores)?;
        }

        info!("- Training done.");
        log.line("- Training done.")?;
        export_plot(&scores, &self.config.plot_output)?;
        self.save_weights()?;

        let final_average = scores.last().copied().unwrap_or(0.0);
        Ok(TrainingReport { scores, final_average })
    }
}
