use crate::tensor::Tensor;

/// A differentiable layer operating on `[batch, features]` tensors.
pub trait Layer {
    fn forward(&self, x: &Tensor) -> Tensor;
    /// Given the layer input `x` and the gradient w.r.t. its output, returns
    /// the gradient w.r.t. the input and the gradients of the parameters in
    /// [`Layer::params`] order.
    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>);
    fn params(&self) -> Vec<&Tensor> {
        Vec::new()
    }
    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}

/// A fully connected neural network layer.
#[derive(Clone)]
pub struct Dense {
    /// The weight matrix for the layer, `[out, in]`.
    pub w: Tensor,
    /// The bias vector for the layer.
    pub b: Tensor,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self {
            w: Tensor::from_vec(vec![out_dim, in_dim], weights),
            b: Tensor::from_vec(vec![out_dim], bias),
            in_dim,
            out_dim,
        }
    }

    /// Weights and biases drawn uniformly from `±1/sqrt(in_dim)`.
    pub fn random(in_dim: usize, out_dim: usize, rng: &mut fastrand::Rng) -> Self {
        let limit = 1.0 / (in_dim as f32).sqrt();
        let mut uniform = || rng.f32() * 2.0 * limit - limit;
        let weights = (0..in_dim * out_dim).map(|_| uniform()).collect();
        let bias = (0..out_dim).map(|_| uniform()).collect();
        Self::new(weights, bias, in_dim, out_dim)
    }
}

impl Layer for Dense {
    fn forward(&self, x: &Tensor) -> Tensor {
        assert_eq!(x.cols(), self.in_dim, "input width mismatch");
        let batch = x.rows();
        let mut y = vec![0f32; batch * self.out_dim];
        for n in 0..batch {
            let xr = x.row(n);
            for o in 0..self.out_dim {
                let w_row = &self.w.data[o * self.in_dim..(o + 1) * self.in_dim];
                let sum: f32 = w_row.iter().zip(xr).map(|(w, v)| w * v).sum();
                y[n * self.out_dim + o] = sum + self.b.data[o];
            }
        }
        Tensor::from_vec(vec![batch, self.out_dim], y)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let batch = x.rows();
        let mut grad_input = vec![0.0; batch * self.in_dim];
        let mut grad_w = vec![0.0; self.in_dim * self.out_dim];
        let mut grad_b = vec![0.0; self.out_dim];
        for n in 0..batch {
            let xr = x.row(n);
            let gr = grad.row(n);
            for o in 0..self.out_dim {
                let go = gr[o];
                if go == 0.0 {
                    continue;
                }
                for i in 0..self.in_dim {
                    grad_w[o * self.in_dim + i] += go * xr[i];
                    grad_input[n * self.in_dim + i] += self.w.data[o * self.in_dim + i] * go;
                }
                grad_b[o] += go;
            }
        }
        (
            Tensor::from_vec(vec![batch, self.in_dim], grad_input),
            vec![
                Tensor::from_vec(vec![self.out_dim, self.in_dim], grad_w),
                Tensor::from_vec(vec![self.out_dim], grad_b),
            ],
        )
    }

    fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }
    fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}

#[derive(Default)]
pub struct Relu;

impl Layer for Relu {
    fn forward(&self, x: &Tensor) -> Tensor {
        let data: Vec<f32> = x.data.iter().map(|&v| v.max(0.0)).collect();
        Tensor::from_vec(x.shape.clone(), data)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let data: Vec<f32> = x
            .data
            .iter()
            .zip(&grad.data)
            .map(|(&v, &g)| if v > 0.0 { g } else { 0.0 })
            .collect();
        (Tensor::from_vec(x.shape.clone(), data), Vec::new())
    }
}

#[derive(Default)]
pub struct TanhAct;

impl Layer for TanhAct {
    fn forward(&self, x: &Tensor) -> Tensor {
        let data: Vec<f32> = x.data.iter().map(|&v| v.tanh()).collect();
        Tensor::from_vec(x.shape.clone(), data)
    }

    fn backward(&self, x: &Tensor, grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let data: Vec<f32> = x
            .data
            .iter()
            .zip(&grad.data)
            .map(|(&v, &g)| {
                let t = v.tanh();
                g * (1.0 - t * t)
            })
            .collect();
        (Tensor::from_vec(x.shape.clone(), data), Vec::new())
    }
}

#[derive(Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    /// Runs the network and keeps every intermediate activation, starting with
    /// the input, for a later [`Sequential::backward`].
    pub fn forward(&self, x: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut out = x.clone();
        let mut activations = vec![out.clone()];
        for layer in &self.layers {
            out = layer.forward(&out);
            activations.push(out.clone());
        }
        (out, activations)
    }

    /// Output only; no activations are kept.
    pub fn predict(&self, x: &Tensor) -> Tensor {
        self.layers.iter().fold(x.clone(), |out, layer| layer.forward(&out))
    }

    /// Backpropagates `grad` (w.r.t. the network output). Parameter gradients
    /// come back in [`Sequential::params`] order.
    pub fn backward(&self, activations: &[Tensor], grad: &Tensor) -> (Tensor, Vec<Tensor>) {
        let mut grad_out = grad.clone();
        let mut per_layer = Vec::with_capacity(self.layers.len());
        for (layer, activation) in self.layers.iter().rev().zip(activations.iter().rev().skip(1)) {
            let (g_in, p) = layer.backward(activation, &grad_out);
            grad_out = g_in;
            per_layer.push(p);
        }
        per_layer.reverse();
        (grad_out, per_layer.into_iter().flatten().collect())
    }

    pub fn params(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|l| l.params()).collect()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = Vec::new();
        for layer in &mut self.layers {
            out.extend(layer.params_mut());
        }
        out
    }
}

/// `n_layers` hidden `Dense` layers of `size` units with ReLU activations,
/// followed by a linear output layer.
pub fn mlp(
    in_dim: usize,
    out_dim: usize,
    n_layers: usize,
    size: usize,
    rng: &mut fastrand::Rng,
) -> Sequential {
    let mut net = Sequential::new();
    let mut width = in_dim;
    for _ in 0..n_layers {
        net.push(Dense::random(width, size, rng));
        net.push(Relu);
        width = size;
    }
    net.push(Dense::random(width, out_dim, rng));
    net
}
