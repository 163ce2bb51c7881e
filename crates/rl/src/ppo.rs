//! Proximal policy optimization surrogate.

/// Clipped surrogate `L = -mean(min(r A, clip(r, 1 - eps, 1 + eps) A))` with
/// `r = exp(logp - old_logp)`.
///
/// Returns the loss and `dL/dlogp` per sample. A sample whose clipped term is
/// the minimum contributes no gradient.
pub fn clipped_surrogate(
    log_probs: &[f32],
    old_log_probs: &[f32],
    advantages: &[f32],
    eps: f32,
) -> (f32, Vec<f32>) {
    let n = log_probs.len() as f32;
    let mut loss = 0.0;
    let grad = log_probs
        .iter()
        .zip(old_log_probs)
        .zip(advantages)
        .map(|((lp, old), a)| {
            let ratio = (lp - old).exp();
            let unclipped = ratio * a;
            let clipped = ratio.clamp(1.0 - eps, 1.0 + eps) * a;
            if unclipped <= clipped {
                loss -= unclipped / n;
                -unclipped / n
            } else {
                loss -= clipped / n;
                0.0
            }
        })
        .collect();
    (loss, grad)
}

/// Fraction of samples whose ratio left the trust region.
pub fn clip_fraction(log_probs: &[f32], old_log_probs: &[f32], eps: f32) -> f32 {
    if log_probs.is_empty() {
        return 0.0;
    }
    let clipped = log_probs
        .iter()
        .zip(old_log_probs)
        .filter(|(lp, old)| ((*lp - *old).exp() - 1.0).abs() > eps)
        .count();
    clipped as f32 / log_probs.len() as f32
}
