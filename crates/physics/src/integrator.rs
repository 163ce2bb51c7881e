//! # Numerical Integration
//!
//! Fixed-step integrators over the packed `[x, x_dot, theta, theta_dot]`
//! state. The derivative callback maps a state to its time derivative.

use crate::types::CartState;

/// One explicit Euler step using the classic cart-pole update order: positions
/// advance with the old velocities, velocities with the accelerations.
pub fn euler_step(state: &mut CartState, x_acc: f32, theta_acc: f32, dt: f32) {
    state.x += dt * state.x_dot;
    state.x_dot += dt * x_acc;
    state.theta += dt * state.theta_dot;
    state.theta_dot += dt * theta_acc;
}

/// One classic fourth-order Runge-Kutta step.
pub fn rk4_step(state: CartState, dt: f32, derivative: impl Fn([f32; 4]) -> [f32; 4]) -> CartState {
    let y = state.to_array();
    let k1 = derivative(y);
    let k2 = derivative(axpy(y, &k1, dt * 0.5));
    let k3 = derivative(axpy(y, &k2, dt * 0.5));
    let k4 = derivative(axpy(y, &k3, dt));

    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = y[i] + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    CartState::from_array(out)
}

fn axpy(y: [f32; 4], k: &[f32; 4], h: f32) -> [f32; 4] {
    [y[0] + h * k[0], y[1] + h * k[1], y[2] + h * k[2], y[3] + h * k[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rk4_integrates_constant_acceleration_exactly() {
        // x'' = 2 → x(t) = t^2 from rest
        let state = CartState::default();
        let next = rk4_step(state, 0.5, |y| [y[1], 2.0, 0.0, 0.0]);
        assert!((next.x - 0.25).abs() < 1e-6);
        assert!((next.x_dot - 1.0).abs() < 1e-6);
    }

    #[test]
    fn euler_uses_old_velocity_for_position() {
        let mut state = CartState::new(0.0, 1.0, 0.0, 0.0);
        euler_step(&mut state, 10.0, 0.0, 0.1);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.x_dot - 2.0).abs() < 1e-6);
    }
}
