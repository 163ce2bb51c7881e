//! Stochastic policies over an MLP.
//!
//! The network maps observations to distribution parameters: logits for
//! discrete action spaces, means for continuous ones (with a learned,
//! state-independent `log_std`). Updates take a surrogate objective as a
//! closure from log-probabilities to `(loss, dL/dlogp)`, so vanilla policy
//! gradient and PPO share the same backward pass.

use crate::error::TrainError;
use ml::distributions::{categorical, gaussian};
use ml::{mlp, Action, Adam, Sequential, Space, Tensor};
use serde::{Deserialize, Serialize};

/// A batch of actions laid out for the log-probability computations.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionBatch {
    Discrete(Vec<usize>),
    Continuous(Tensor),
}

impl ActionBatch {
    /// Packs per-step actions; all actions must be of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::UnsupportedEnv`] for mixed or ragged actions.
    pub fn collect(actions: &[Action]) -> Result<Self, TrainError> {
        let mismatch = || TrainError::UnsupportedEnv {
            env: "batch".to_string(),
            reason: "actions of mixed kinds or sizes".to_string(),
        };
        match actions.first() {
            None => Ok(ActionBatch::Discrete(Vec::new())),
            Some(Action::Discrete(_)) => actions
                .iter()
                .map(|a| match a {
                    Action::Discrete(i) => Ok(*i),
                    Action::Continuous(_) => Err(mismatch()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ActionBatch::Discrete),
            Some(Action::Continuous(first)) => {
                let width = first.len();
                let mut data = Vec::with_capacity(actions.len() * width);
                for a in actions {
                    match a {
                        Action::Continuous(v) if v.len() == width => data.extend_from_slice(v),
                        _ => return Err(mismatch()),
                    }
                }
                let shape = vec![actions.len(), width];
                Ok(ActionBatch::Continuous(Tensor::from_vec(shape, data)))
            }
        }
    }
}

enum Head {
    Categorical,
    Gaussian { log_std: Tensor },
}

/// Serializable snapshot of a network's parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Weights {
    pub params: Vec<Tensor>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub log_std: Option<Tensor>,
}

pub struct Policy {
    net: Sequential,
    head: Head,
    obs_dim: usize,
    optimizer: Adam,
}

impl Policy {
    /// Builds a policy for the given spaces.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::UnsupportedEnv`] for a discrete observation
    /// space, which the MLP cannot consume.
    pub fn new(
        observation_space: &Space,
        action_space: &Space,
        n_layers: usize,
        layer_size: usize,
        learning_rate: f32,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, TrainError> {
        if observation_space.is_discrete() {
            return Err(TrainError::UnsupportedEnv {
                env: format!("{observation_space:?}"),
                reason: "observations must be real vectors".to_string(),
            });
        }
        let obs_dim = observation_space.flat_dim();
        let act_dim = action_space.flat_dim();
        let net = mlp(obs_dim, act_dim, n_layers, layer_size, rng);
        let head = match action_space {
            Space::Discrete(_) => Head::Categorical,
            Space::Box { .. } => Head::Gaussian { log_std: Tensor::zeros(vec![act_dim]) },
        };
        Ok(Self { net, head, obs_dim, optimizer: Adam::new(learning_rate) })
    }

    /// Samples an action for one observation, returning it with its
    /// log-probability under the current policy.
    pub fn act(&self, obs: &[f32], rng: &mut fastrand::Rng) -> (Action, f32) {
        let x = Tensor::from_vec(vec![1, self.obs_dim], obs.to_vec());
        let out = self.net.predict(&x);
        match &self.head {
            Head::Categorical => {
                let a = categorical::sample(&out, rng)[0];
                let lp = categorical::log_prob(&out, &[a])[0];
                (Action::Discrete(a), lp)
            }
            Head::Gaussian { log_std } => {
                let a = gaussian::sample(&out, log_std, rng);
                let lp = gaussian::log_prob(&out, log_std, &a)[0];
                (Action::Continuous(a.data), lp)
            }
        }
    }

    /// Log-probabilities of `actions` taken in `observations`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::ActionMismatch`] when `actions` are not of the
    /// kind this policy emits.
    pub fn log_prob(
        &self,
        observations: &Tensor,
        actions: &ActionBatch,
    ) -> Result<Vec<f32>, TrainError> {
        let out = self.net.predict(observations);
        self.head_log_prob(&out, actions)
    }

    fn head_log_prob(&self, out: &Tensor, actions: &ActionBatch) -> Result<Vec<f32>, TrainError> {
        match (&self.head, actions) {
            (Head::Categorical, ActionBatch::Discrete(a)) => Ok(categorical::log_prob(out, a)),
            (Head::Gaussian { log_std }, ActionBatch::Continuous(a)) => {
                Ok(gaussian::log_prob(out, log_std, a))
            }
            _ => Err(self.mismatch(actions)),
        }
    }

    fn mismatch(&self, actions: &ActionBatch) -> TrainError {
        let (head, batch) = match (&self.head, actions) {
            (Head::Categorical, _) => ("categorical", "continuous"),
            (Head::Gaussian { .. }, _) => ("gaussian", "discrete"),
        };
        TrainError::ActionMismatch { head, batch }
    }

    /// One optimizer step on the surrogate returned by `objective`, which maps
    /// the current log-probabilities to `(loss, dL/dlogp)`. Returns the loss.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::ActionMismatch`] when `actions` are not of the
    /// kind this policy emits; the parameters are left untouched.
    pub fn update(
        &mut self,
        observations: &Tensor,
        actions: &ActionBatch,
        objective: impl FnOnce(&[f32]) -> (f32, Vec<f32>),
    ) -> Result<f32, TrainError> {
        let (out, activations) = self.net.forward(observations);
        let log_probs = self.head_log_prob(&out, actions)?;
        let (loss, upstream) = objective(&log_probs);

        let (d_out, d_log_std) = match (&self.head, actions) {
            (Head::Categorical, ActionBatch::Discrete(a)) => {
                (categorical::log_prob_grad(&out, a, &upstream), None)
            }
            (Head::Gaussian { log_std }, ActionBatch::Continuous(a)) => {
                let (d_mean, d_std) = gaussian::log_prob_grad(&out, log_std, a, &upstream);
                (d_mean, Some(d_std))
            }
            _ => return Err(self.mismatch(actions)),
        };
        let (_, grads) = self.net.backward(&activations, &d_out);

        let mut pairs: Vec<(&mut Tensor, &Tensor)> =
            self.net.params_mut().into_iter().zip(grads.iter()).collect();
        if let (Head::Gaussian { log_std }, Some(g)) = (&mut self.head, d_log_std.as_ref()) {
            pairs.push((log_std, g));
        }
        self.optimizer.step(&mut pairs);
        Ok(loss)
    }

    /// Standard deviation of the Gaussian head, `None` for discrete policies.
    pub fn action_std(&self) -> Option<Vec<f32>> {
        match &self.head {
            Head::Categorical => None,
            Head::Gaussian { log_std } => Some(log_std.data.iter().map(|s| s.exp()).collect()),
        }
    }

    pub fn weights(&self) -> Weights {
        Weights {
            params: self.net.params().into_iter().cloned().collect(),
            log_std: match &self.head {
                Head::Categorical => None,
                Head::Gaussian { log_std } => Some(log_std.clone()),
            },
        }
    }
}
