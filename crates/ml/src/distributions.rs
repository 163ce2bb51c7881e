//! Action distributions with analytic log-probability gradients.
//!
//! Gradients are taken w.r.t. the distribution parameters produced by the
//! policy network, scaled by an upstream `dL/dlogp` per sample, so callers can
//! feed them straight into [`crate::Sequential::backward`].

use crate::tensor::Tensor;

const LN_2PI: f32 = 1.837_877_1;

/// Standard normal sample via the Box-Muller transform.
pub fn sample_standard_normal(rng: &mut fastrand::Rng) -> f32 {
    // 1 - f32() lies in (0, 1], keeping ln finite
    let u1 = 1.0 - rng.f32();
    let u2 = rng.f32();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

/// Categorical distribution parameterised by unnormalised logits.
pub mod categorical {
    use super::Tensor;

    fn log_softmax(row: &[f32]) -> Vec<f32> {
        let m = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let lse = m + row.iter().map(|&v| (v - m).exp()).sum::<f32>().ln();
        row.iter().map(|&v| v - lse).collect()
    }

    /// Samples one category per row of `logits`.
    pub fn sample(logits: &Tensor, rng: &mut fastrand::Rng) -> Vec<usize> {
        (0..logits.rows())
            .map(|n| {
                let probs: Vec<f32> = log_softmax(logits.row(n)).iter().map(|l| l.exp()).collect();
                let u = rng.f32();
                let mut acc = 0.0;
                for (i, p) in probs.iter().enumerate() {
                    acc += p;
                    if u < acc {
                        return i;
                    }
                }
                probs.len() - 1
            })
            .collect()
    }

    pub fn log_prob(logits: &Tensor, actions: &[usize]) -> Vec<f32> {
        actions
            .iter()
            .enumerate()
            .map(|(n, &a)| log_softmax(logits.row(n))[a])
            .collect()
    }

    /// `upstream[n] * d logp_n / d logits_n`.
    pub fn log_prob_grad(logits: &Tensor, actions: &[usize], upstream: &[f32]) -> Tensor {
        let k = logits.cols();
        let mut grad = vec![0.0; logits.len()];
        for (n, &a) in actions.iter().enumerate() {
            let ls = log_softmax(logits.row(n));
            for j in 0..k {
                let indicator = if j == a { 1.0 } else { 0.0 };
                grad[n * k + j] = upstream[n] * (indicator - ls[j].exp());
            }
        }
        Tensor::from_vec(logits.shape.clone(), grad)
    }
}

/// Diagonal Gaussian with per-sample means and a shared `log_std` vector.
pub mod gaussian {
    use super::{sample_standard_normal, Tensor, LN_2PI};

    pub fn sample(mean: &Tensor, log_std: &Tensor, rng: &mut fastrand::Rng) -> Tensor {
        let d = mean.cols();
        let data = mean
            .data
            .iter()
            .enumerate()
            .map(|(i, &mu)| mu + log_std.data[i % d].exp() * sample_standard_normal(rng))
            .collect();
        Tensor::from_vec(mean.shape.clone(), data)
    }

    pub fn log_prob(mean: &Tensor, log_std: &Tensor, actions: &Tensor) -> Vec<f32> {
        let d = mean.cols();
        (0..mean.rows())
            .map(|n| {
                let mu = mean.row(n);
                let a = actions.row(n);
                (0..d)
                    .map(|j| {
                        let s = log_std.data[j];
                        let z = (a[j] - mu[j]) / s.exp();
                        -0.5 * z * z - s - 0.5 * LN_2PI
                    })
                    .sum()
            })
            .collect()
    }

    /// Returns `(dL/dmean, dL/dlog_std)` given `upstream[n] = dL/dlogp_n`.
    pub fn log_prob_grad(
        mean: &Tensor,
        log_std: &Tensor,
        actions: &Tensor,
        upstream: &[f32],
    ) -> (Tensor, Tensor) {
        let d = mean.cols();
        let mut d_mean = vec![0.0; mean.len()];
        let mut d_log_std = vec![0.0; d];
        for n in 0..mean.rows() {
            let mu = mean.row(n);
            let a = actions.row(n);
            for j in 0..d {
                let var = (2.0 * log_std.data[j]).exp();
                let diff = a[j] - mu[j];
                d_mean[n * d + j] = upstream[n] * diff / var;
                d_log_std[j] += upstream[n] * (diff * diff / var - 1.0);
            }
        }
        (
            Tensor::from_vec(mean.shape.clone(), d_mean),
            Tensor::from_vec(log_std.shape.clone(), d_log_std),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_normal_moments() {
        let mut rng = fastrand::Rng::with_seed(7);
        let samples: Vec<f32> = (0..20_000).map(|_| sample_standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "var {var}");
    }

    #[test]
    fn categorical_probs_sum_to_one() {
        let logits = Tensor::from_vec(vec![1, 3], vec![0.3, -1.2, 2.0]);
        let total: f32 = (0..3).map(|a| categorical::log_prob(&logits, &[a])[0].exp()).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gaussian_log_prob_matches_closed_form() {
        let mean = Tensor::from_vec(vec![1, 1], vec![0.0]);
        let log_std = Tensor::from_vec(vec![1], vec![0.0]);
        let actions = Tensor::from_vec(vec![1, 1], vec![1.0]);
        let lp = gaussian::log_prob(&mean, &log_std, &actions)[0];
        assert!((lp - (-0.5 - 0.5 * LN_2PI)).abs() < 1e-5);
    }

    #[test]
    fn categorical_sampling_follows_logits() {
        let mut rng = fastrand::Rng::with_seed(1);
        let logits = Tensor::from_vec(vec![1, 2], vec![0.0, 3.0]);
        let ones = (0..2000).filter(|_| categorical::sample(&logits, &mut rng)[0] == 1).count();
        // p(1) = e^3 / (1 + e^3) ≈ 0.953
        assert!(ones > 1800, "ones {ones}");
    }
}
