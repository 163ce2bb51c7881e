/// REINFORCE surrogate `L = -mean(logp * A)`.
///
/// Returns the loss and `dL/dlogp` per sample.
pub fn policy_gradient_objective(log_probs: &[f32], advantages: &[f32]) -> (f32, Vec<f32>) {
    let n = log_probs.len() as f32;
    let loss = -log_probs.iter().zip(advantages).map(|(l, a)| l * a).sum::<f32>() / n;
    let grad = advantages.iter().map(|a| -a / n).collect();
    (loss, grad)
}
