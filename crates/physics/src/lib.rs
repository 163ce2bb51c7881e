#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Arena Physics
//!
//! Small, deterministic rigid-body dynamics for the control tasks used by the
//! reinforcement-learning crates.
//!
//! Two systems are provided:
//!
//! -   [`CartPole`]: the classic cart-pole balancing problem, integrated with
//!     explicit Euler exactly as the well-known benchmark does. The cart is
//!     pushed left or right by a fixed force.
//! -   [`InvertedPendulum`]: a cart on a limited slider carrying a hinged rod,
//!     driven by a continuous motor command. Joint damping is modelled and
//!     the equations of motion are integrated with fourth-order Runge-Kutta.
//!
//! Both share the generalized state [`CartState`] and the integrators in
//! [`integrator`].
//!
//! ## Usage
//!
//! ```rust
//! use physics::{InvertedPendulum, InvertedPendulumConfig};
//!
//! let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
//! pendulum.step(0.5).unwrap();
//! assert!(pendulum.state().x > 0.0);
//! ```

pub mod cartpole;
pub mod error;
pub mod integrator;
pub mod pendulum;
pub mod types;

pub use cartpole::{CartPole, CartPoleConfig};
pub use error::PhysicsError;
pub use pendulum::{InvertedPendulum, InvertedPendulumConfig};
pub use types::CartState;
