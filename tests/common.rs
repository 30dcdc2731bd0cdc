#![allow(dead_code)]

use backprop_nn::{
    a_funcs::{BasicActivation, Identity},
    network::{Network, NetworkBuilder},
    Matrix,
};

/// Input of size 2, a single identity output neuron with weights `[1, 1]` and no bias.
pub fn summing_network() -> Network {
    let mut network = NetworkBuilder::new(2)
        .layer(1, BasicActivation::from(Identity).shared(), 0.)
        .build()
        .unwrap();
    network
        .set_weights(1, Matrix::from_rows(&[[1., 1.]]).unwrap())
        .unwrap();
    network
}

/// Points on a grid over `[-1, 1]^2`.
pub fn grid(steps: usize) -> Vec<[f64; 2]> {
    let step = 2. / (steps - 1) as f64;
    (0..steps)
        .flat_map(|i| (0..steps).map(move |j| [i as f64 * step - 1., j as f64 * step - 1.]))
        .collect()
}

pub fn check(expected: &[f64], output: &[f64], tolerance: f64, id: &str) {
    assert_eq!(expected.len(), output.len(), "{} have different lengths", id);
    for (e, o) in expected.iter().zip(output) {
        assert!(
            (e - o).abs() < tolerance,
            "Evaluation produced incorrect {}.\nexpected: {:?}\nreceived: {:?}",
            id,
            expected,
            output
        );
    }
}
