use backprop_nn::{
    a_funcs::{BasicActivation, Sigmoid},
    backward, forward,
    helpers::{initialize_weights, randomize_biases},
    initializer::Xavier,
    network::{Network, NetworkBuilder},
    BackpropConfig, Backward,
};

fn data() -> Vec<([f64; 2], f64)> {
    vec![
        ([0., 0.], 0.),
        ([0., 1.], 1.),
        ([1., 0.], 1.),
        ([1., 1.], 0.),
    ]
}

fn network() -> anyhow::Result<Network> {
    let sigmoid = BasicActivation::from(Sigmoid).shared();
    let mut network = NetworkBuilder::new(2)
        .layer(4, sigmoid.clone(), 0.)
        .layer(1, sigmoid, 0.)
        .build()?;
    initialize_weights(&mut network, Xavier::new());
    randomize_biases(&mut network);
    Ok(network)
}

/// Runs one epoch of batch gradient descent and returns the mean squared error.
fn epoch(
    network: &mut Network,
    grads: &mut Backward,
    config: &BackpropConfig,
    l_rate: f64,
) -> anyhow::Result<f64> {
    let data = data();
    let mut loss = 0.;
    grads.reset();
    for (input, target) in &data {
        let fwd = forward(network, input)?;
        let error = target - fwd.output()[0];
        loss += error * error;
        backward(network, &fwd, grads, &[error], config)?;
    }

    let scale = l_rate / data.len() as f64;
    for layer in 1..network.layer_count() {
        let gradients = grads.gradients(layer)?.raw().to_vec();
        for (w, g) in network.weights_mut(layer)?.iter_mut().zip(gradients) {
            *w += scale * g;
        }
        let bias = network.bias(layer)? + scale * grads.bias_gradient(layer)?;
        network.set_bias(layer, bias)?;
    }
    Ok(loss / data.len() as f64)
}

fn main() -> anyhow::Result<()> {
    let mut network = network()?;
    let mut grads = Backward::new(&network);
    let config = BackpropConfig::default();

    for i in 0..5000 {
        let loss = epoch(&mut network, &mut grads, &config, 2.)?;
        if i % 500 == 0 {
            println!("epoch {:>5}: loss {:.6}", i, loss);
        }
    }

    for (input, target) in data() {
        let output = forward(&network, &input)?.output()[0];
        println!("{:?} -> {:.3} (expected {})", input, output, target);
    }
    Ok(())
}
