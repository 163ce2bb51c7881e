use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("no environment registered under '{name}'")]
    NotFound { name: String },
    #[error("invalid action for {env}: {reason}")]
    InvalidAction { env: &'static str, reason: String },
    #[error("simulation failed")]
    Physics(#[from] PhysicsError),
}

/// Shape of an observation or action space.
#[derive(Clone, Debug, PartialEq)]
pub enum Space {
    /// `n` mutually exclusive choices `0..n`.
    Discrete(usize),
    /// Real vectors with per-dimension bounds.
    Box { low: Vec<f32>, high: Vec<f32> },
}

impl Space {
    /// Number of scalars a value of this space occupies when fed to a
    /// network: `n` logits for discrete spaces, the vector length otherwise.
    #[must_use]
    pub fn flat_dim(&self) -> usize {
        match self {
            Space::Discrete(n) => *n,
            Space::Box { low, .. } => low.len(),
        }
    }

    #[must_use]
    pub fn is_discrete(&self) -> bool {
        matches!(self, Space::Discrete(_))
    }
}

/// An action drawn from an environment's action space.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Discrete(usize),
    Continuous(Vec<f32>),
}

/// Result of advancing an environment by one action.
#[derive(Clone, Debug)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, and whether the episode has terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Registered identifier, e.g. `"CartPole-v0"`.
    fn name(&self) -> &'static str;

    /// Reset the environment to a (randomly perturbed) starting state and
    /// return the initial observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Fails when the action does not belong to the action space or the
    /// simulation rejects it.
    fn step(&mut self, action: &Action) -> Result<Step, EnvError>;

    fn observation_space(&self) -> Space;

    fn action_space(&self) -> Space;

    /// Reseeds the noise used by [`Env::reset`].
    fn seed(&mut self, seed: u64);
}
