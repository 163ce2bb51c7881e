use approx::assert_relative_eq;
use ml::distributions::{categorical, gaussian};
use ml::Tensor;

const EPS: f32 = 1e-3;

#[test]
fn categorical_grad_matches_finite_difference() {
    let logits = Tensor::from_vec(vec![2, 3], vec![0.2, -0.5, 1.0, 0.0, 0.3, -0.7]);
    let actions = [2, 0];
    let upstream = [1.0, -0.5];
    let grad = categorical::log_prob_grad(&logits, &actions, &upstream);

    let objective = |l: &Tensor| -> f32 {
        categorical::log_prob(l, &actions)
            .iter()
            .zip(upstream)
            .map(|(lp, u)| lp * u)
            .sum()
    };
    for i in 0..logits.len() {
        let mut plus = logits.clone();
        plus.data[i] += EPS;
        let mut minus = logits.clone();
        minus.data[i] -= EPS;
        let numerical = (objective(&plus) - objective(&minus)) / (2.0 * EPS);
        assert_relative_eq!(grad.data[i], numerical, epsilon = 1e-2);
    }
}

#[test]
fn gaussian_grad_matches_finite_difference() {
    let mean = Tensor::from_vec(vec![3, 1], vec![0.1, -0.4, 0.9]);
    let log_std = Tensor::from_vec(vec![1], vec![-0.3]);
    let actions = Tensor::from_vec(vec![3, 1], vec![0.5, -0.1, 0.2]);
    let upstream = [0.7, -1.0, 0.4];
    let (d_mean, d_log_std) = gaussian::log_prob_grad(&mean, &log_std, &actions, &upstream);

    let objective = |m: &Tensor, s: &Tensor| -> f32 {
        gaussian::log_prob(m, s, &actions)
            .iter()
            .zip(upstream)
            .map(|(lp, u)| lp * u)
            .sum()
    };

    for i in 0..mean.len() {
        let mut plus = mean.clone();
        plus.data[i] += EPS;
        let mut minus = mean.clone();
        minus.data[i] -= EPS;
        let numerical = (objective(&plus, &log_std) - objective(&minus, &log_std)) / (2.0 * EPS);
        assert_relative_eq!(d_mean.data[i], numerical, epsilon = 1e-2);
    }

    let mut plus = log_std.clone();
    plus.data[0] += EPS;
    let mut minus = log_std.clone();
    minus.data[0] -= EPS;
    let numerical = (objective(&mean, &plus) - objective(&mean, &minus)) / (2.0 * EPS);
    assert_relative_eq!(d_log_std.data[0], numerical, epsilon = 1e-2);
}

#[test]
fn gaussian_samples_centre_on_mean() {
    let mut rng = fastrand::Rng::with_seed(11);
    let mean = Tensor::from_vec(vec![4000, 1], vec![2.0; 4000]);
    let log_std = Tensor::from_vec(vec![1], vec![(0.5f32).ln()]);
    let samples = gaussian::sample(&mean, &log_std, &mut rng);
    let avg = samples.data.iter().sum::<f32>() / samples.len() as f32;
    assert!((avg - 2.0).abs() < 0.05, "avg {avg}");
}
