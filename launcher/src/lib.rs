//! # Arena Launcher
//!
//! Entry point for running a policy-optimization experiment end to end.
//!
//! ## Overview
//!
//! The launcher composes three collaborators from the workspace:
//!
//! -   **Environment provider:** [`rl::make`] returns a simulated control task
//!     (backed by the `physics` crate) for a registered id.
//! -   **Configuration builder:** [`rl::ConfigBuilder`] turns the experiment
//!     options into an immutable [`rl::Config`], including the output
//!     directory of the run.
//! -   **Trainer:** anything implementing [`rl::Trainer`]; the binary uses
//!     [`rl::PolicyGradient`], which runs vanilla policy gradient or PPO on
//!     top of the [`ml`] crate's networks.
//!
//! ## Control Flow
//!
//! [`launch`] performs, in order and failing fast at the first error:
//!
//! 1.  instantiate the environment by name;
//! 2.  build the configuration;
//! 3.  make sure the output directory exists (a no-op if it already does)
//!     and snapshot the configuration into it;
//! 4.  construct the trainer from (environment, configuration, seed);
//! 5.  call [`rl::Trainer::run`] exactly once.
//!
//! Without command-line flags the binary reproduces the reference experiment:
//! `InvertedPendulum-v4` with a baseline, PPO, seed 3.

pub mod app;
pub mod cli;
pub mod error;

pub use app::{ensure_output_dir, launch, LaunchOptions};
pub use error::LaunchError;

pub use ml;
pub use rl;
