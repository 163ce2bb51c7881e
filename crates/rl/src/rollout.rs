//! Trajectory sampling and return computation.

use crate::error::TrainError;
use crate::policy::{ActionBatch, Policy};
use ml::{Action, Env, Tensor};

/// One (possibly truncated) episode.
#[derive(Clone, Debug, Default)]
pub struct Path {
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<Action>,
    pub rewards: Vec<f32>,
    /// Log-probabilities of `actions` under the policy that sampled them.
    pub log_probs: Vec<f32>,
}

impl Path {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// The transitions of one training iteration.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub paths: Vec<Path>,
    /// Total reward of every episode that finished (terminated or hit the
    /// length cap) inside the batch.
    pub episode_rewards: Vec<f32>,
}

impl Batch {
    pub fn transitions(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    /// All observations stacked as `[transitions, obs_dim]`.
    pub fn observations(&self, obs_dim: usize) -> Tensor {
        let rows: Vec<Vec<f32>> =
            self.paths.iter().flat_map(|p| p.observations.iter().cloned()).collect();
        Tensor::from_rows(&rows, obs_dim)
    }

    /// # Errors
    ///
    /// Propagates [`ActionBatch::collect`] failures.
    pub fn actions(&self) -> Result<ActionBatch, TrainError> {
        let actions: Vec<Action> =
            self.paths.iter().flat_map(|p| p.actions.iter().cloned()).collect();
        ActionBatch::collect(&actions)
    }

    pub fn log_probs(&self) -> Vec<f32> {
        self.paths.iter().flat_map(|p| p.log_probs.iter().copied()).collect()
    }
}

/// Runs episodes until exactly `batch_size` transitions are collected. Each
/// episode lasts at most `max_ep_len` steps (0 means `batch_size`); the last
/// one may be cut short by the batch boundary, in which case its reward is not
/// recorded.
///
/// # Errors
///
/// Propagates environment step failures.
pub fn sample_paths(
    env: &mut dyn Env,
    policy: &Policy,
    rng: &mut fastrand::Rng,
    batch_size: usize,
    max_ep_len: usize,
) -> Result<Batch, TrainError> {
    let max_ep_len = if max_ep_len == 0 { batch_size } else { max_ep_len };
    let mut batch = Batch::default();
    let mut t = 0;
    while t < batch_size {
        let mut obs = env.reset();
        let mut path = Path::default();
        let mut episode_reward = 0.0;
        for step in 0..max_ep_len {
            let (action, log_prob) = policy.act(&obs, rng);
            let outcome = env.step(&action)?;
            path.observations.push(obs);
            path.actions.push(action);
            path.log_probs.push(log_prob);
            path.rewards.push(outcome.reward);
            obs = outcome.observation;
            episode_reward += outcome.reward;
            t += 1;
            if outcome.done || step + 1 == max_ep_len {
                batch.episode_rewards.push(episode_reward);
                break;
            }
            if t == batch_size {
                break;
            }
        }
        batch.paths.push(path);
    }
    Ok(batch)
}

/// Discounted reward-to-go `G_t = r_t + gamma * G_{t+1}` for every step of
/// every path, flattened in path order.
pub fn discounted_returns(paths: &[Path], gamma: f32) -> Vec<f32> {
    let mut all = Vec::with_capacity(paths.iter().map(Path::len).sum());
    for path in paths {
        let mut returns = vec![0.0; path.len()];
        let mut running = 0.0;
        for (t, r) in path.rewards.iter().enumerate().rev() {
            running = r + gamma * running;
            returns[t] = running;
        }
        all.extend(returns);
    }
    all
}

/// Shifts to zero mean and scales to unit (population) standard deviation.
pub fn normalize(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n).sqrt();
    for v in values.iter_mut() {
        *v = (*v - mean) / (std + 1e-8);
    }
}

/// Mean and standard error of episode rewards.
pub fn reward_summary(episode_rewards: &[f32]) -> (f32, f32) {
    if episode_rewards.is_empty() {
        return (0.0, 0.0);
    }
    let n = episode_rewards.len() as f32;
    let mean = episode_rewards.iter().sum::<f32>() / n;
    let var = episode_rewards.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n;
    (mean, (var / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(rewards: &[f32]) -> Path {
        Path { rewards: rewards.to_vec(), ..Path::default() }
    }

    #[test]
    fn returns_are_discounted_reward_to_go() {
        let returns = discounted_returns(&[path(&[1.0, 1.0, 1.0]), path(&[2.0])], 0.5);
        assert_eq!(returns, vec![1.75, 1.5, 1.0, 2.0]);
    }

    #[test]
    fn undiscounted_returns_count_remaining_steps() {
        let returns = discounted_returns(&[path(&[1.0; 4])], 1.0);
        assert_eq!(returns, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn normalize_gives_zero_mean_unit_std() {
        let mut v = vec![1.0, 2.0, 3.0, 4.0];
        normalize(&mut v);
        let mean: f32 = v.iter().sum::<f32>() / 4.0;
        let var: f32 = v.iter().map(|x| x * x).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-6);
        assert!((var - 1.0).abs() < 1e-4);
    }

    #[test]
    fn normalize_constant_values_does_not_produce_nan() {
        let mut v = vec![5.0; 3];
        normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn reward_summary_reports_standard_error() {
        let (mean, sigma) = reward_summary(&[1.0, 3.0]);
        assert!((mean - 2.0).abs() < 1e-6);
        assert!((sigma - (0.5f32).sqrt()).abs() < 1e-6);
    }
}
