#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss, clippy::must_use_candidate)]
//! # Arena ML
//!
//! The numerical building blocks for policy-optimization experiments:
//!
//! -   [`Tensor`]: a dense row-major `f32` buffer with a shape.
//! -   [`nn`]: fully connected layers, activations and a [`Sequential`]
//!     container with explicit forward/backward passes over mini-batches.
//! -   [`optim`]: the Adam optimizer.
//! -   [`distributions`]: categorical and diagonal-Gaussian action
//!     distributions with analytic log-probability gradients.
//! -   [`env`]: the environment interface trainers interact with.

pub mod distributions;
pub mod env;
pub mod nn;
pub mod optim;
pub mod tensor;

pub use env::{Action, Env, EnvError, Space, Step};
pub use nn::{mlp, Dense, Layer, Relu, Sequential, TanhAct};
pub use optim::Adam;
pub use tensor::Tensor;
