#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::missing_panics_doc
)]
//! # Arena RL
//!
//! Policy-gradient training for the arena control tasks.
//!
//! -   [`env`]: the environment registry ([`make`]).
//! -   [`config`]: per-environment presets and the [`ConfigBuilder`].
//! -   [`trainer`]: the [`PolicyGradient`] trainer (vanilla PG or PPO) behind
//!     the [`Trainer`] trait.
//!
//! ```rust,no_run
//! use rl::{make, Algorithm, ConfigBuilder, PolicyGradient, Trainer};
//!
//! let env = make("CartPole-v0")?;
//! let config = ConfigBuilder::new("CartPole-v0").algorithm(Algorithm::Ppo).seed(1).build()?;
//! std::fs::create_dir_all(&config.output_path)?;
//! let report = PolicyGradient::new(env, config, 1)?.run()?;
//! println!("final average reward {}", report.final_average);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod baseline;
pub mod config;
pub mod env;
pub mod error;
pub mod output;
pub mod pg;
pub mod plot;
pub mod policy;
pub mod ppo;
pub mod rollout;
pub mod trainer;

pub use config::{Algorithm, Config, ConfigBuilder};
pub use env::make;
pub use error::{ConfigError, TrainError};
pub use trainer::{PolicyGradient, Trainer, TrainingReport};
