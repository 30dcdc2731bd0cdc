use backprop_nn::{
    a_funcs::{BasicActivation, Identity},
    backward, forward, get_performance,
    helpers::{get_biases, get_weights, initialize_weights},
    initializer::Normal,
    network::NetworkBuilder,
    patterns::{Pattern, PatternSet},
    BackpropConfig, Backward, Network,
};

mod common;
use common::{check, grid};

/// Plain batch gradient descent driven from outside the network, stepping weights and biases
/// along the accumulated gradients of `target - prediction`.
fn train(
    network: &mut Network,
    data: &[([f64; 2], f64)],
    epochs: usize,
    l_rate: f64,
) -> anyhow::Result<()> {
    let config = BackpropConfig::default();
    let mut bwd = Backward::new(network);
    let scale = l_rate / data.len() as f64;

    for _ in 0..epochs {
        bwd.reset();
        for (input, target) in data {
            let fwd = forward(network, input)?;
            let error = target - fwd.output()[0];
            backward(network, &fwd, &mut bwd, &[error], &config)?;
        }
        for layer in 1..network.layer_count() {
            let grads = bwd.gradients(layer)?.raw().to_vec();
            for (w, g) in network.weights_mut(layer)?.iter_mut().zip(grads) {
                *w += scale * g;
            }
            let bias = network.bias(layer)? + scale * bwd.bias_gradient(layer)?;
            network.set_bias(layer, bias)?;
        }
    }
    Ok(())
}

#[test]
fn linear_convergence() -> anyhow::Result<()> {
    let data: Vec<([f64; 2], f64)> = grid(9)
        .into_iter()
        .map(|[a, b]| ([a, b], 2. * a - b + 0.5))
        .collect();

    let mut network = NetworkBuilder::new(2)
        .layer(1, BasicActivation::from(Identity).shared(), 0.)
        .build()?;
    initialize_weights(&mut network, Normal::seeded(5));

    train(&mut network, &data, 1000, 0.2)?;

    check(&[2., -1.], &get_weights(&network), 1e-6, "weights");
    check(&[0.5], &get_biases(&network), 1e-6, "bias");
    Ok(())
}

#[test]
fn exact_network_scores_full_marks() -> anyhow::Result<()> {
    let network = common::summing_network();
    let patterns = grid(5)
        .into_iter()
        .map(|[a, b]| Pattern::new(vec![a, b], vec![a + b]))
        .collect();
    let set = PatternSet::new(patterns, 4);
    assert_eq!(get_performance(&network, &set, 2)?, 1.);
    Ok(())
}
