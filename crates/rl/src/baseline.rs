use crate::policy::Weights;
use ml::{mlp, Adam, Sequential, Tensor};

/// State-value network used to reduce the variance of policy-gradient
/// estimates.
pub struct BaselineNetwork {
    net: Sequential,
    optimizer: Adam,
}

impl BaselineNetwork {
    pub fn new(
        obs_dim: usize,
        n_layers: usize,
        layer_size: usize,
        learning_rate: f32,
        rng: &mut fastrand::Rng,
    ) -> Self {
        Self {
            net: mlp(obs_dim, 1, n_layers, layer_size, rng),
            optimizer: Adam::new(learning_rate),
        }
    }

    /// Predicted value for each row of `observations`.
    pub fn predict(&self, observations: &Tensor) -> Vec<f32> {
        self.net.predict(observations).data
    }

    /// Advantages `G - V(s)` of the given returns.
    pub fn advantages(&self, returns: &[f32], observations: &Tensor) -> Vec<f32> {
        returns.iter().zip(self.predict(observations)).map(|(g, v)| g - v).collect()
    }

    /// One Adam step on the mean squared error against `targets`; returns the
    /// loss before the step.
    pub fn update(&mut self, observations: &Tensor, targets: &[f32]) -> f32 {
        let (out, activations) = self.net.forward(observations);
        let n = targets.len() as f32;
        let mut loss = 0.0;
        let grad: Vec<f32> = out
            .data
            .iter()
            .zip(targets)
            .map(|(v, t)| {
                let diff = v - t;
                loss += diff * diff / n;
                2.0 * diff / n
            })
            .collect();
        let grad = Tensor::from_vec(out.shape.clone(), grad);
        let (_, grads) = self.net.backward(&activations, &grad);
        let mut pairs: Vec<(&mut Tensor, &Tensor)> =
            self.net.params_mut().into_iter().zip(grads.iter()).collect();
        self.optimizer.step(&mut pairs);
        loss
    }

    pub fn weights(&self) -> Weights {
        Weights { params: self.net.params().into_iter().cloned().collect(), log_std: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_linear_value_function() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut baseline = BaselineNetwork::new(1, 1, 16, 1e-2, &mut rng);
        let xs: Vec<f32> = (0..32).map(|i| i as f32 / 16.0 - 1.0).collect();
        let obs = Tensor::from_vec(vec![xs.len(), 1], xs.clone());
        let targets: Vec<f32> = xs.iter().map(|x| 3.0 * x + 1.0).collect();

        let first = baseline.update(&obs, &targets);
        let mut last = first;
        for _ in 0..500 {
            last = baseline.update(&obs, &targets);
        }
        assert!(last < first * 0.1, "first {first} last {last}");
    }
}
