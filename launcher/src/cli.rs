use clap::Parser;
use crate::app::LaunchOptions;
use rl::Algorithm;
use std::path::PathBuf;

/// Train a policy on a simulated control task.
#[derive(Parser, Debug)]
#[command(name = "launcher", version, about)]
pub struct Cli {
    /// Registered environment id
    #[arg(long, default_value = "InvertedPendulum-v4")]
    pub env: String,

    /// Optimizer variant: `pg` or `ppo`
    #[arg(long, default_value = "ppo")]
    pub algorithm: Algorithm,

    /// Train without a learned value baseline
    #[arg(long)]
    pub no_baseline: bool,

    #[arg(long, default_value_t = 3)]
    pub seed: u64,

    /// Directory that receives one sub-directory per run
    #[arg(long, default_value = rl::config::DEFAULT_RESULTS_ROOT)]
    pub results_dir: PathBuf,

    /// Override the preset's number of training iterations
    #[arg(long)]
    pub num_batches: Option<usize>,

    /// Override the preset's transitions per iteration
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Override the preset's episode length cap (0 = batch size)
    #[arg(long)]
    pub max_ep_len: Option<usize>,

    /// Print the registered environments and exit
    #[arg(long)]
    pub list_envs: bool,
}

impl Cli {
    #[must_use]
    pub fn options(&self) -> LaunchOptions {
        LaunchOptions {
            env_name: self.env.clone(),
            use_baseline: !self.no_baseline,
            algorithm: self.algorithm,
            seed: self.seed,
            results_root: self.results_dir.clone(),
            num_batches: self.num_batches,
            batch_size: self.batch_size,
            max_ep_len: self.max_ep_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_reproduce_reference_experiment() {
        let cli = Cli::parse_from(["launcher"]);
        assert_eq!(cli.options(), LaunchOptions::default());
    }

    #[test]
    fn flags_override_options() {
        let cli = Cli::parse_from([
            "launcher",
            "--env",
            "CartPole-v0",
            "--algorithm",
            "pg",
            "--no-baseline",
            "--seed",
            "9",
            "--batch-size",
            "500",
        ]);
        let options = cli.options();
        assert_eq!(options.env_name, "CartPole-v0");
        assert_eq!(options.algorithm, Algorithm::PolicyGradient);
        assert!(!options.use_baseline);
        assert_eq!(options.seed, 9);
        assert_eq!(options.batch_size, Some(500));
    }

    #[test]
    fn unknown_algorithm_is_a_parse_error() {
        assert!(Cli::try_parse_from(["launcher", "--algorithm", "dqn"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
