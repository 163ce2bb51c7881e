use ml::{mlp, Dense, Layer, Sequential, TanhAct, Tensor};

fn sum_loss(net: &Sequential, x: &Tensor) -> f32 {
    net.predict(x).data.iter().sum()
}

/// Compares every analytic parameter gradient of `sum(net(x))` against a
/// central finite difference.
fn finite_diff_check(net: &mut Sequential, x: &Tensor, epsilon: f32) {
    let (out, activations) = net.forward(x);
    let ones = Tensor::from_vec(out.shape.clone(), vec![1.0; out.len()]);
    let (_, grads) = net.backward(&activations, &ones);
    assert_eq!(grads.len(), net.params().len());

    for (p_idx, grad) in grads.iter().enumerate() {
        for i in 0..grad.len() {
            let original = net.params()[p_idx].data[i];
            net.params_mut()[p_idx].data[i] = original + epsilon;
            let loss_plus = sum_loss(net, x);
            net.params_mut()[p_idx].data[i] = original - epsilon;
            let loss_minus = sum_loss(net, x);
            net.params_mut()[p_idx].data[i] = original;

            let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical = grad.data[i];
            let diff = (numerical - analytical).abs();
            assert!(
                diff < 1e-2,
                "Grad check failed for param {p_idx}[{i}]. \
                 Numerical: {numerical}, Analytical: {analytical}"
            );
        }
    }
}

#[test]
fn dense_forward_exact() {
    let w = vec![
        1.0, 0.5, -0.5, -1.0, // First row
        0.2, 0.3, 0.1, 0.9, // Second row
    ];
    let b = vec![0.1, -0.2];
    let layer = Dense::new(w, b.clone(), 4, 2);
    let x = Tensor::from_vec(vec![1, 4], vec![1.0, 2.0, 3.0, 4.0]);
    let y = layer.forward(&x);

    let expected_y0 = 1.0 * 1.0 + 0.5 * 2.0 - 0.5 * 3.0 - 1.0 * 4.0 + b[0];
    let expected_y1 = 0.2 * 1.0 + 0.3 * 2.0 + 0.1 * 3.0 + 0.9 * 4.0 + b[1];

    assert!((y.data[0] - expected_y0).abs() < 1e-6);
    assert!((y.data[1] - expected_y1).abs() < 1e-6);
}

#[test]
fn dense_backward_fd() {
    let mut rng = fastrand::Rng::with_seed(0);
    let mut net = Sequential::new();
    net.push(Dense::random(3, 2, &mut rng));
    let x = Tensor::from_vec(vec![2, 3], vec![0.9, -0.1, 0.3, -0.4, 0.7, 0.2]);
    finite_diff_check(&mut net, &x, 1e-2);
}

#[test]
fn tanh_network_backward_fd() {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut net = Sequential::new();
    net.push(Dense::random(2, 4, &mut rng));
    net.push(TanhAct);
    net.push(Dense::random(4, 1, &mut rng));
    let x = Tensor::from_vec(vec![3, 2], vec![0.5, -0.2, 0.1, 0.8, -0.6, 0.3]);
    finite_diff_check(&mut net, &x, 1e-2);
}

#[test]
fn mlp_shapes_and_param_order() {
    let mut rng = fastrand::Rng::with_seed(1);
    let net = mlp(4, 2, 2, 8, &mut rng);
    let shapes: Vec<Vec<usize>> = net.params().iter().map(|p| p.shape.clone()).collect();
    assert_eq!(
        shapes,
        vec![vec![8, 4], vec![8], vec![8, 8], vec![8], vec![2, 8], vec![2]]
    );
    let x = Tensor::zeros(vec![5, 4]);
    assert_eq!(net.predict(&x).shape, vec![5, 2]);
}

#[test]
fn input_gradient_of_linear_layer_is_weights() {
    let layer = Dense::new(vec![2.0, -3.0], vec![0.0], 2, 1);
    let x = Tensor::from_vec(vec![1, 2], vec![1.0, 1.0]);
    let (dx, _) = layer.backward(&x, &Tensor::from_vec(vec![1, 1], vec![1.0]));
    assert_eq!(dx.data, vec![2.0, -3.0]);
}
