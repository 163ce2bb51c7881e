//! Tests for the inverted pendulum dynamics
//!
//! These cover the behaviours the balancing task depends on:
//! - an upright pole at rest stays put
//! - a tilted pole falls further without control
//! - the motor moves the cart and the slider limit holds it

use approx::assert_relative_eq;
use physics::{CartState, InvertedPendulum, InvertedPendulumConfig, PhysicsError};

#[test]
fn upright_pole_at_rest_is_an_equilibrium() {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    for _ in 0..50 {
        pendulum.step(0.0).unwrap();
    }
    let s = pendulum.state();
    assert_relative_eq!(s.theta, 0.0, epsilon = 1e-6);
    assert_relative_eq!(s.x, 0.0, epsilon = 1e-6);
}

#[test]
fn tilted_pole_falls_without_control() {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    pendulum.reset_to(CartState::new(0.0, 0.0, 0.05, 0.0));
    let mut steps = 0;
    while pendulum.state().theta.abs() <= 0.2 {
        pendulum.step(0.0).unwrap();
        steps += 1;
        assert!(steps < 200, "pole never fell");
    }
    assert!(pendulum.state().theta > 0.2, "pole should fall toward its tilt");
}

#[test]
fn positive_control_moves_cart_right_and_tilts_pole_back() {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    for _ in 0..3 {
        pendulum.step(1.0).unwrap();
    }
    let s = pendulum.state();
    assert!(s.x > 0.0);
    assert!(s.x_dot > 0.0);
    assert!(s.theta < 0.0);
}

#[test]
fn control_is_clipped_to_range() {
    let mut clipped = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    let mut saturated = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    clipped.step(100.0).unwrap();
    saturated.step(3.0).unwrap();
    assert_relative_eq!(clipped.state().x, saturated.state().x, epsilon = 1e-6);
}

#[test]
fn slider_limit_holds_cart() {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    for _ in 0..100 {
        pendulum.step(3.0).unwrap();
    }
    assert!(pendulum.state().x <= 1.0);
}

#[test]
fn nan_control_is_rejected() {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    assert!(matches!(pendulum.step(f32::NAN), Err(PhysicsError::NonFiniteInput(_))));
}

#[test]
fn default_config_validates() {
    let config = InvertedPendulumConfig::default();
    assert!(config.validate().is_ok());
    assert_relative_eq!(config.control_dt(), 0.04);
    let bad = InvertedPendulumConfig { frame_skip: 0, ..config };
    assert!(bad.validate().is_err());
}

#[test]
fn constructor_rejects_invalid_config() {
    let config = InvertedPendulumConfig { pole_mass: -1.0, ..InvertedPendulumConfig::default() };
    assert!(matches!(InvertedPendulum::new(config), Err(PhysicsError::InvalidConfig(_))));
}
