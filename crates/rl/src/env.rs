//! Registered control environments.
//!
//! [`make`] maps an environment id to a boxed [`Env`] backed by the
//! `physics` crate. Reset noise comes from a per-environment RNG so a seeded
//! trainer reproduces the same episodes.

use ml::{Action, Env, EnvError, Space, Step};
use physics::{CartPole, CartPoleConfig, CartState, InvertedPendulum, InvertedPendulumConfig};

pub const CART_POLE: &str = "CartPole-v0";
pub const INVERTED_PENDULUM: &str = "InvertedPendulum-v4";

/// Ids accepted by [`make`].
#[must_use]
pub fn registered() -> &'static [&'static str] {
    &[CART_POLE, INVERTED_PENDULUM]
}

/// Instantiates the environment registered under `name`.
///
/// # Errors
///
/// Returns [`EnvError::NotFound`] for unregistered ids and
/// [`EnvError::Physics`] if the built-in parameters are rejected.
pub fn make(name: &str) -> Result<Box<dyn Env>, EnvError> {
    match name {
        CART_POLE => Ok(Box::new(CartPoleEnv::new()?)),
        INVERTED_PENDULUM => Ok(Box::new(InvertedPendulumEnv::new()?)),
        _ => Err(EnvError::NotFound { name: name.to_string() }),
    }
}

fn uniform_state(rng: &mut fastrand::Rng, scale: f32) -> CartState {
    let mut noise = || (rng.f32() * 2.0 - 1.0) * scale;
    CartState::new(noise(), noise(), noise(), noise())
}

/// Balance a pole by pushing the cart left (`0`) or right (`1`).
pub struct CartPoleEnv {
    cartpole: CartPole,
    rng: fastrand::Rng,
}

impl CartPoleEnv {
    /// # Errors
    ///
    /// Propagates [`CartPole::new`] validation failures.
    pub fn new() -> Result<Self, EnvError> {
        Ok(Self {
            cartpole: CartPole::new(CartPoleConfig::default())?,
            rng: fastrand::Rng::new(),
        })
    }

    fn observation(&self) -> Vec<f32> {
        self.cartpole.state().to_array().to_vec()
    }
}

impl Env for CartPoleEnv {
    fn name(&self) -> &'static str {
        CART_POLE
    }

    fn reset(&mut self) -> Vec<f32> {
        let state = uniform_state(&mut self.rng, 0.05);
        self.cartpole.reset_to(state);
        self.observation()
    }

    fn step(&mut self, action: &Action) -> Result<Step, EnvError> {
        let push_right = match action {
            Action::Discrete(0) => false,
            Action::Discrete(1) => true,
            other => {
                return Err(EnvError::InvalidAction {
                    env: CART_POLE,
                    reason: format!("expected 0 or 1, got {other:?}"),
                })
            }
        };
        self.cartpole.push(push_right)?;
        let done = self.cartpole.check_failure();
        Ok(Step { observation: self.observation(), reward: 1.0, done })
    }

    fn observation_space(&self) -> Space {
        let c = &self.cartpole.config;
        Space::Box {
            low: vec![-c.position_limit * 2.0, -f32::MAX, -c.failure_angle * 2.0, -f32::MAX],
            high: vec![c.position_limit * 2.0, f32::MAX, c.failure_angle * 2.0, f32::MAX],
        }
    }

    fn action_space(&self) -> Space {
        Space::Discrete(2)
    }

    fn seed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }
}

/// Keep a hinged rod upright with a continuous cart motor command in `[-3, 3]`.
///
/// Observations are `[x, theta, x_dot, theta_dot]`. The episode ends when the
/// rod leans more than 0.2 rad or the state stops being finite.
pub struct InvertedPendulumEnv {
    pendulum: InvertedPendulum,
    rng: fastrand::Rng,
}

impl InvertedPendulumEnv {
    const FAILURE_ANGLE: f32 = 0.2;

    /// # Errors
    ///
    /// Propagates [`InvertedPendulum::new`] validation failures.
    pub fn new() -> Result<Self, EnvError> {
        Ok(Self {
            pendulum: InvertedPendulum::new(InvertedPendulumConfig::default())?,
            rng: fastrand::Rng::new(),
        })
    }

    fn observation(&self) -> Vec<f32> {
        let s = self.pendulum.state();
        vec![s.x, s.theta, s.x_dot, s.theta_dot]
    }
}

impl Env for InvertedPendulumEnv {
    fn name(&self) -> &'static str {
        INVERTED_PENDULUM
    }

    fn reset(&mut self) -> Vec<f32> {
        let state = uniform_state(&mut self.rng, 0.01);
        self.pendulum.reset_to(state);
        self.observation()
    }

    fn step(&mut self, action: &Action) -> Result<Step, EnvError> {
        let ctrl = match action {
            Action::Continuous(v) if v.len() == 1 => v[0],
            other => {
                return Err(EnvError::InvalidAction {
                    env: INVERTED_PENDULUM,
                    reason: format!("expected a 1-dimensional continuous action, got {other:?}"),
                })
            }
        };
        self.pendulum.step(ctrl)?;
        let state = self.pendulum.state();
        let done = !state.is_finite() || state.theta.abs() > Self::FAILURE_ANGLE;
        Ok(Step { observation: self.observation(), reward: 1.0, done })
    }

    fn observation_space(&self) -> Space {
        Space::Box {
            low: vec![f32::NEG_INFINITY; 4],
            high: vec![f32::INFINITY; 4],
        }
    }

    fn action_space(&self) -> Space {
        let r = self.pendulum.config.ctrl_range;
        Space::Box { low: vec![-r], high: vec![r] }
    }

    fn seed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }
}
