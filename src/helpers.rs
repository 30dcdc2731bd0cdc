//! Stateless utilities built on top of [Network](crate::network::Network).
//!
//! The flattening functions expose all parameters of a network as a single vector so
//! optimizers can treat a network as one point in parameter space. Weights are laid out by
//! ascending layer, then by the neuron of the layer and finally by the neuron of the previous
//! layer. Biases and activations are laid out by ascending layer.

use crate::a_funcs::ActivationRef;
use crate::error::{NetError, Result};
use crate::initializer::{Initializer, Normal};
use crate::matrix::Matrix;
use crate::network::Network;

use tracing::debug;

/// One zeroed vector per layer, sized to the layer's neuron count.
pub fn create_layer_vectors(network: &Network) -> Vec<Vec<f64>> {
    network
        .layer_sizes()
        .into_iter()
        .map(|n| vec![0.; n])
        .collect()
}

/// One zeroed matrix per layer shaped like the layer's weights.
/// The input layer gets an empty 0x0 matrix.
pub fn create_layer_matrices(network: &Network) -> Vec<Matrix> {
    let sizes = network.layer_sizes();
    let mut matrices = Vec::with_capacity(sizes.len());
    if !sizes.is_empty() {
        matrices.push(Matrix::empty());
    }
    matrices.extend(sizes.windows(2).map(|pair| Matrix::zeroed(pair[1], pair[0])));
    matrices
}

pub fn get_weights(network: &Network) -> Vec<f64> {
    let mut weights = Vec::with_capacity(network.weight_count());
    for (_, _, params) in network.computed_layers() {
        weights.extend_from_slice(params.weights.raw());
    }
    weights
}

/// Overwrites every weight of the network. `weights` has to contain exactly
/// [Network::weight_count] values.
pub fn set_weights(network: &mut Network, weights: &[f64]) -> Result<()> {
    NetError::check("flattened weights", network.weight_count(), weights.len())?;
    let mut rest = weights;
    for (_, _, params) in network.computed_layers_mut() {
        let (layer, tail) = rest.split_at(params.weights.len());
        params.weights.raw_mut().copy_from_slice(layer);
        rest = tail;
    }
    debug!(count = weights.len(), "set network weights");
    Ok(())
}

pub fn get_biases(network: &Network) -> Vec<f64> {
    network.computed_layers().map(|(_, _, p)| p.bias).collect()
}

/// Overwrites the bias of every computed layer.
pub fn set_biases(network: &mut Network, biases: &[f64]) -> Result<()> {
    let layers = network.layer_count().saturating_sub(1);
    NetError::check("flattened biases", layers, biases.len())?;
    for ((_, _, params), bias) in network.computed_layers_mut().zip(biases) {
        params.bias = *bias;
    }
    debug!(count = biases.len(), "set network biases");
    Ok(())
}

/// The activation of every computed layer, `None` where it hasn't been set.
pub fn get_activations(network: &Network) -> Vec<Option<ActivationRef>> {
    network
        .computed_layers()
        .map(|(_, _, p)| p.activation.clone())
        .collect()
}

/// Sets the activation of every computed layer.
pub fn set_activations(network: &mut Network, activations: &[ActivationRef]) -> Result<()> {
    let layers = network.layer_count().saturating_sub(1);
    NetError::check("activations", layers, activations.len())?;
    for ((_, _, params), activation) in network.computed_layers_mut().zip(activations) {
        params.activation = Some(activation.clone());
    }
    debug!(count = activations.len(), "set network activations");
    Ok(())
}

/// Overwrites every weight with a value provided by `init`.
pub fn initialize_weights<I: Initializer>(network: &mut Network, mut init: I) {
    for (in_size, size, params) in network.computed_layers_mut() {
        for w in params.weights.raw_mut() {
            *w = init.get(in_size, size);
        }
    }
}

/// Overwrites every bias with a value provided by `init`.
pub fn initialize_biases<I: Initializer>(network: &mut Network, mut init: I) {
    for (in_size, size, params) in network.computed_layers_mut() {
        params.bias = init.get(in_size, size);
    }
}

/// Replaces every weight with an independent standard normal sample.
pub fn randomize_weights(network: &mut Network) {
    initialize_weights(network, Normal::new());
    debug!(count = network.weight_count(), "randomized weights");
}

/// Replaces every bias with an independent standard normal sample.
pub fn randomize_biases(network: &mut Network) {
    initialize_biases(network, Normal::new());
    debug!(count = network.layer_count().saturating_sub(1), "randomized biases");
}

/// Rounds half away from zero to `decimals` decimal places.
/// Values too precise to carry that many decimal places are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    // every f64 of at least this magnitude is already an integer
    const INTEGRAL: f64 = 4_503_599_627_370_496.; // 2^52

    if decimals > f64::MAX_10_EXP as u32 {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= INTEGRAL {
        return value;
    }
    scaled.round() / factor
}
