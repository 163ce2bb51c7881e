//! Inverted pendulum on a motorised slider
//!
//! A cart rides a slider joint limited to `[-slider_range, slider_range]` and
//! carries a rod on a hinge. A motor with a symmetric control range and a
//! gear ratio pushes the cart. Both joints are viscously damped. One call to
//! [`InvertedPendulum::step`] advances `frame_skip` RK4 substeps of
//! `timestep` seconds.

use crate::error::PhysicsError;
use crate::integrator::rk4_step;
use crate::types::CartState;

/// Physical parameters of the pendulum and its actuator
#[derive(Clone, Debug)]
pub struct InvertedPendulumConfig {
    pub gravity: f32,
    /// Cart mass in kg
    pub cart_mass: f32,
    /// Rod mass in kg
    pub pole_mass: f32,
    /// Rod length in meters; the center of mass sits at half length
    pub pole_length: f32,
    /// Force per unit of control
    pub gear: f32,
    /// Controls are clipped to `[-ctrl_range, ctrl_range]`
    pub ctrl_range: f32,
    /// Viscous damping on both joints
    pub joint_damping: f32,
    pub timestep: f32,
    pub frame_skip: usize,
    /// Slider limit in meters
    pub slider_range: f32,
}

impl Default for InvertedPendulumConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            cart_mass: 10.47,
            pole_mass: 5.02,
            pole_length: 0.6,
            gear: 100.0,
            ctrl_range: 3.0,
            joint_damping: 1.0,
            timestep: 0.02,
            frame_skip: 2,
            slider_range: 1.0,
        }
    }
}

impl InvertedPendulumConfig {
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] for non-positive masses, lengths,
    /// step sizes or a zero frame skip.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.cart_mass <= 0.0 || self.pole_mass <= 0.0 {
            return Err(PhysicsError::InvalidConfig("masses must be positive"));
        }
        if self.pole_length <= 0.0 {
            return Err(PhysicsError::InvalidConfig("pole length must be positive"));
        }
        if self.timestep <= 0.0 || self.frame_skip == 0 {
            return Err(PhysicsError::InvalidConfig("time step must be positive"));
        }
        if self.ctrl_range <= 0.0 || self.slider_range <= 0.0 {
            return Err(PhysicsError::InvalidConfig("ranges must be positive"));
        }
        Ok(())
    }

    /// Seconds simulated by one control step.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn control_dt(&self) -> f32 {
        self.timestep * self.frame_skip as f32
    }
}

pub struct InvertedPendulum {
    pub config: InvertedPendulumConfig,
    state: CartState,
}

impl InvertedPendulum {
    /// Creates a pendulum resting upright at the center of the slider.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] if `config` fails
    /// [`InvertedPendulumConfig::validate`].
    pub fn new(config: InvertedPendulumConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self { config, state: CartState::default() })
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.state
    }

    pub fn reset_to(&mut self, state: CartState) {
        self.state = state;
    }

    /// Applies `ctrl` (clipped to the control range) for one control step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFiniteInput`] if `ctrl` is NaN or infinite.
    pub fn step(&mut self, ctrl: f32) -> Result<(), PhysicsError> {
        if !ctrl.is_finite() {
            return Err(PhysicsError::NonFiniteInput(ctrl));
        }
        let range = self.config.ctrl_range;
        let force = ctrl.clamp(-range, range) * self.config.gear;

        for _ in 0..self.config.frame_skip {
            self.state = rk4_step(self.state, self.config.timestep, |y| self.derivative(y, force));
            self.enforce_slider_limit();
        }
        Ok(())
    }

    /// Time derivative of `[x, x_dot, theta, theta_dot]` under a cart force.
    fn derivative(&self, y: [f32; 4], force: f32) -> [f32; 4] {
        let c = &self.config;
        let [_, x_dot, theta, theta_dot] = y;
        let (sin_t, cos_t) = theta.sin_cos();

        let lc = c.pole_length * 0.5;
        let inertia = c.pole_mass * c.pole_length * c.pole_length / 12.0;

        // M(q) q'' = b(q, q')
        let a11 = c.cart_mass + c.pole_mass;
        let a12 = c.pole_mass * lc * cos_t;
        let a22 = inertia + c.pole_mass * lc * lc;
        let b1 = force - c.joint_damping * x_dot + c.pole_mass * lc * sin_t * theta_dot * theta_dot;
        let b2 = -c.joint_damping * theta_dot + c.pole_mass * c.gravity * lc * sin_t;

        let det = a11 * a22 - a12 * a12;
        let x_acc = (b1 * a22 - a12 * b2) / det;
        let theta_acc = (a11 * b2 - a12 * b1) / det;
        [x_dot, x_acc, theta_dot, theta_acc]
    }

    fn enforce_slider_limit(&mut self) {
        let limit = self.config.slider_range;
        if self.state.x > limit {
            self.state.x = limit;
            self.state.x_dot = self.state.x_dot.min(0.0);
        } else if self.state.x < -limit {
            self.state.x = -limit;
            self.state.x_dot = self.state.x_dot.max(0.0);
        }
    }
}
