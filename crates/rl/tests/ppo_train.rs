use rl::output::load_scores;
use rl::{make, Algorithm, ConfigBuilder, PolicyGradient, Trainer};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arena-rl-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn short_ppo_run_writes_all_outputs() {
    let root = scratch_dir("ppo-outputs");
    let config = ConfigBuilder::new("CartPole-v0")
        .algorithm(Algorithm::Ppo)
        .use_baseline(true)
        .seed(3)
        .num_batches(2)
        .batch_size(200)
        .layer_size(16)
        .results_root(&root)
        .build()
        .unwrap();
    fs::create_dir_all(&config.output_path).unwrap();

    let mut trainer = PolicyGradient::new(make("CartPole-v0").unwrap(), config.clone(), 3).unwrap();
    let report = trainer.run().unwrap();

    assert_eq!(report.scores.len(), 2);
    assert_eq!(report.final_average, report.scores[1]);
    assert_eq!(load_scores(&config.scores_output).unwrap(), report.scores);

    let log = fs::read_to_string(&config.log_path).unwrap();
    assert!(log.contains("[ITERATION 0]: Average reward:"), "{log}");
    assert!(log.contains("[ITERATION 1]: Average reward:"), "{log}");
    assert!(log.trim_end().ends_with("- Training done."), "{log}");

    assert!(config.plot_output.exists());
    assert!(config.model_output.join("policy.json").exists());
    assert!(config.model_output.join("baseline.json").exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn pg_without_baseline_saves_only_policy() {
    let root = scratch_dir("pg-no-baseline");
    let config = ConfigBuilder::new("InvertedPendulum-v4")
        .algorithm(Algorithm::PolicyGradient)
        .use_baseline(false)
        .num_batches(1)
        .batch_size(100)
        .max_ep_len(100)
        .layer_size(8)
        .results_root(&root)
        .build()
        .unwrap();
    fs::create_dir_all(&config.output_path).unwrap();

    let report = PolicyGradient::new(make("InvertedPendulum-v4").unwrap(), config.clone(), 0)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.scores.len(), 1);
    assert!(report.final_average >= 1.0);

    let policy = fs::read_to_string(config.model_output.join("policy.json")).unwrap();
    assert!(policy.contains("log_std"));
    assert!(!config.model_output.join("baseline.json").exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn same_seed_reproduces_scores() {
    let run = |tag: &str| {
        let root = scratch_dir(tag);
        let config = ConfigBuilder::new("CartPole-v0")
            .algorithm(Algorithm::Ppo)
            .num_batches(2)
            .batch_size(200)
            .layer_size(8)
            .seed(7)
            .results_root(&root)
            .build()
            .unwrap();
        fs::create_dir_all(&config.output_path).unwrap();
        let scores = PolicyGradient::new(make("CartPole-v0").unwrap(), config, 7)
            .unwrap()
            .run()
            .unwrap()
            .scores;
        let _ = fs::remove_dir_all(&root);
        scores
    };
    assert_eq!(run("seed-a"), run("seed-b"));
}

#[test]
fn missing_output_directory_fails_the_run() {
    let root = scratch_dir("missing-dir");
    let config = ConfigBuilder::new("CartPole-v0")
        .num_batches(1)
        .batch_size(200)
        .results_root(&root)
        .build()
        .unwrap();
    let err = PolicyGradient::new(make("CartPole-v0").unwrap(), config, 0)
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, rl::TrainError::Io { .. }), "{err}");
}

#[test]
#[ignore]
fn ppo_learns_to_balance_cart_pole() {
    let root = scratch_dir("ppo-learns");
    let config = ConfigBuilder::new("CartPole-v0")
        .algorithm(Algorithm::Ppo)
        .num_batches(30)
        .seed(1)
        .results_root(&root)
        .build()
        .unwrap();
    fs::create_dir_all(&config.output_path).unwrap();
    let report = PolicyGradient::new(make("CartPole-v0").unwrap(), config, 1)
        .unwrap()
        .run()
        .unwrap();
    let first = report.scores[0];
    let best = report.scores.iter().copied().fold(f32::MIN, f32::max);
    assert!(best > first * 3.0, "first {first} best {best}");
    let _ = fs::remove_dir_all(&root);
}
