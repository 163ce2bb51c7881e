//! CartPole system for reinforcement learning environments
//!
//! The classic cart-pole balancing benchmark: a pole hinged on a cart that
//! is pushed left or right along a frictionless track. The update order and
//! constants match the widely used benchmark so learning curves stay
//! comparable.

use crate::error::PhysicsError;
use crate::integrator::euler_step;
use crate::types::CartState;

/// Configuration for a CartPole system
#[derive(Clone, Debug)]
pub struct CartPoleConfig {
    /// Gravitational acceleration in m/s^2
    pub gravity: f32,
    /// Cart mass in kg
    pub cart_mass: f32,
    /// Pole mass in kg
    pub pole_mass: f32,
    /// Half the pole length in meters
    pub half_pole_length: f32,
    /// Force magnitude applied to the cart for a push
    pub force_magnitude: f32,
    /// Integration step in seconds
    pub tau: f32,
    /// Angle threshold for failure detection (radians)
    pub failure_angle: f32,
    /// Position threshold for failure detection (meters)
    pub position_limit: f32,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            half_pole_length: 0.5,
            force_magnitude: 10.0,
            tau: 0.02,
            failure_angle: 12.0 * 2.0 * std::f32::consts::PI / 360.0,
            position_limit: 2.4,
        }
    }
}

impl CartPoleConfig {
    /// Checks that masses, lengths and the step size are positive.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.cart_mass <= 0.0 || self.pole_mass <= 0.0 {
            return Err(PhysicsError::InvalidConfig("masses must be positive"));
        }
        if self.half_pole_length <= 0.0 {
            return Err(PhysicsError::InvalidConfig("pole length must be positive"));
        }
        if self.tau <= 0.0 {
            return Err(PhysicsError::InvalidConfig("time step must be positive"));
        }
        Ok(())
    }

    fn total_mass(&self) -> f32 {
        self.cart_mass + self.pole_mass
    }

    fn pole_mass_length(&self) -> f32 {
        self.pole_mass * self.half_pole_length
    }
}

/// A CartPole system
pub struct CartPole {
    /// Configuration for this cartpole
    pub config: CartPoleConfig,
    state: CartState,
    /// Whether the cartpole has failed (fallen over or out of bounds)
    pub failed: bool,
}

impl CartPole {
    /// Create a new CartPole resting upright at the origin
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails
    /// [`CartPoleConfig::validate`].
    pub fn new(config: CartPoleConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config, state: CartState::default(), failed: false })
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.state
    }

    /// Reset the cartpole to the given state and clear the failure flag
    pub fn reset_to(&mut self, state: CartState) {
        self.state = state;
        self.failed = false;
    }

    /// Push the cart: `true` pushes right, `false` pushes left.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed push forces; kept fallible to share the
    /// signature of [`CartPole::apply_force`].
    pub fn push(&mut self, right: bool) -> Result<(), PhysicsError> {
        let force = if right {
            self.config.force_magnitude
        } else {
            -self.config.force_magnitude
        };
        self.apply_force(force)
    }

    /// Apply a horizontal force (Newtons) to the cart for one time step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFiniteInput`] if `force` is NaN or infinite.
    pub fn apply_force(&mut self, force: f32) -> Result<(), PhysicsError> {
        if !force.is_finite() {
            return Err(PhysicsError::NonFiniteInput(force));
        }
        let c = &self.config;
        let s = &self.state;
        let (sin_t, cos_t) = s.theta.sin_cos();

        let temp =
            (force + c.pole_mass_length() * s.theta_dot * s.theta_dot * sin_t) / c.total_mass();
        let theta_acc = (c.gravity * sin_t - cos_t * temp)
            / (c.half_pole_length * (4.0 / 3.0 - c.pole_mass * cos_t * cos_t / c.total_mass()));
        let x_acc = temp - c.pole_mass_length() * theta_acc * cos_t / c.total_mass();

        euler_step(&mut self.state, x_acc, theta_acc, c.tau);
        Ok(())
    }

    /// Check if the cartpole has failed (fallen over or out of bounds)
    pub fn check_failure(&mut self) -> bool {
        if self.failed {
            return true;
        }
        let s = &self.state;
        if s.x.abs() > self.config.position_limit || s.theta.abs() > self.config.failure_angle {
            self.failed = true;
        }
        self.failed
    }

    /// Get the current pole angle from vertical (radians)
    #[must_use]
    pub fn pole_angle(&self) -> f32 {
        self.state.theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_right_accelerates_cart_right() {
        let mut cp = CartPole::new(CartPoleConfig::default()).unwrap();
        cp.push(true).unwrap();
        cp.push(true).unwrap();
        assert!(cp.state().x_dot > 0.0);
        assert!(cp.state().x > 0.0);
    }

    #[test]
    fn pushing_cart_tilts_pole_backwards() {
        let mut cp = CartPole::new(CartPoleConfig::default()).unwrap();
        for _ in 0..5 {
            cp.push(true).unwrap();
        }
        assert!(cp.pole_angle() < 0.0, "angle {}", cp.pole_angle());
    }

    #[test]
    fn rejects_nan_force() {
        let mut cp = CartPole::new(CartPoleConfig::default()).unwrap();
        assert_eq!(
            cp.apply_force(f32::NAN).unwrap_err().to_string(),
            "non-finite control input: NaN"
        );
    }

    #[test]
    fn constructor_rejects_negative_cart_mass() {
        let config = CartPoleConfig { cart_mass: -0.1, pole_mass: 0.1, ..Default::default() };
        assert!(matches!(CartPole::new(config), Err(PhysicsError::InvalidConfig(_))));
    }
}
