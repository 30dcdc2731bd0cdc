use super::{Forward, Network};
use crate::error::{NetError, Result};
use crate::helpers::{create_layer_matrices, create_layer_vectors};
use crate::matrix::Matrix;

use serde::{Deserialize, Serialize};

/// Configuration of the backward pass, owned by whatever drives the training.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackpropConfig {
    /// Constant added to every activation derivative so saturated neurons keep learning.
    pub flat_spot: f64,
}

impl BackpropConfig {
    pub const DEFAULT_FLAT_SPOT: f64 = 0.01;

    pub fn new(flat_spot: f64) -> Self {
        Self { flat_spot }
    }

    pub fn with_flat_spot(mut self, flat_spot: f64) -> Self {
        self.flat_spot = flat_spot;
        self
    }
}

impl Default for BackpropConfig {
    fn default() -> Self {
        Self {
            flat_spot: Self::DEFAULT_FLAT_SPOT,
        }
    }
}

/// Deltas and gradients produced by [backward](self::backward).
///
/// The gradients are accumulators. Every call to [backward](self::backward) adds to them,
/// so a whole batch can be processed before reading them. Call [reset](Self::reset)
/// to start over.
#[derive(Clone, Debug, PartialEq)]
pub struct Backward {
    deltas: Vec<Vec<f64>>,
    /// Entry 0 is an empty matrix.
    gradients: Vec<Matrix>,
    /// Entry 0 is unused.
    bias_gradients: Vec<f64>,
}

impl Backward {
    /// Allocates zeroed storage matching the shape of `network`.
    pub fn new(network: &Network) -> Self {
        Self {
            deltas: create_layer_vectors(network),
            gradients: create_layer_matrices(network),
            bias_gradients: vec![0.; network.layer_count()],
        }
    }

    pub fn layer_count(&self) -> usize {
        self.deltas.len()
    }

    /// Deltas of the last backward pass. The input layer's deltas are always zero.
    pub fn deltas(&self, layer: usize) -> Result<&[f64]> {
        self.deltas
            .get(layer)
            .map(|d| d.as_slice())
            .ok_or_else(|| self.out_of_bounds(layer))
    }

    /// Accumulated weight gradients between `layer - 1` and `layer`, shaped like the weights.
    pub fn gradients(&self, layer: usize) -> Result<&Matrix> {
        if layer == 0 {
            return Err(self.out_of_bounds(layer));
        }
        self.gradients
            .get(layer)
            .ok_or_else(|| self.out_of_bounds(layer))
    }

    /// Accumulated gradient of the bias shared by `layer`.
    pub fn bias_gradient(&self, layer: usize) -> Result<f64> {
        if layer == 0 {
            return Err(self.out_of_bounds(layer));
        }
        self.bias_gradients
            .get(layer)
            .copied()
            .ok_or_else(|| self.out_of_bounds(layer))
    }

    /// Resets the gradients and deltas to zero.
    pub fn reset(&mut self) {
        self.deltas
            .iter_mut()
            .for_each(|d| d.iter_mut().for_each(|f| *f = 0.));
        self.gradients.iter_mut().for_each(|g| g.fill(0.));
        self.bias_gradients.iter_mut().for_each(|f| *f = 0.);
    }

    fn out_of_bounds(&self, layer: usize) -> NetError {
        NetError::LayerOutOfBounds {
            layer,
            layers: self.deltas.len(),
        }
    }

    /// Checks that the record was allocated for a network with the same layer sizes.
    pub(crate) fn check_shape(&self, network: &Network) -> Result<()> {
        NetError::check("backward layer count", network.layer_count(), self.layer_count())?;
        for (layer, deltas) in self.deltas.iter().enumerate() {
            NetError::check("backward layer size", network.neurons(layer)?, deltas.len())?;
        }
        for layer in 1..network.layer_count() {
            let (rows, cols) = network.weights(layer)?.shape();
            NetError::check("gradient rows", rows, self.gradients[layer].rows())?;
            NetError::check("gradient columns", cols, self.gradients[layer].cols())?;
        }
        Ok(())
    }
}

/// Backpropagates `network_deltas`, the error at each output neuron, through the network and
/// adds the resulting weight gradients to `backward`.
///
/// `forward` must come from a forward pass through the same network. The derivative of every
/// activation is increased by `config.flat_spot` before use.
pub fn backward(
    network: &Network,
    forward: &Forward,
    backward: &mut Backward,
    network_deltas: &[f64],
    config: &BackpropConfig,
) -> Result<()> {
    let layers = network.layer_count();
    if layers < 2 {
        return Err(NetError::TooFewLayers {
            required: 2,
            layers,
        });
    }
    forward.check_shape(network)?;
    backward.check_shape(network)?;
    let last = layers - 1;
    NetError::check("network deltas", network.neurons(last)?, network_deltas.len())?;

    // everything fallible happens up front so an error leaves `backward` untouched
    let outputs = (0..layers)
        .map(|l| forward.outputs(l))
        .collect::<Result<Vec<_>>>()?;
    // derivatives and weights are indexed by layer - 1
    let derivs = (1..layers)
        .map(|l| derivatives(network, forward, l))
        .collect::<Result<Vec<_>>>()?;
    let weights = (1..layers)
        .map(|l| network.weights(l))
        .collect::<Result<Vec<_>>>()?;
    let flat_spot = config.flat_spot;

    for ((delta, error), deriv) in backward.deltas[last]
        .iter_mut()
        .zip(network_deltas)
        .zip(&derivs[last - 1])
    {
        *delta = error * (deriv + flat_spot);
    }

    for l in (1..last).rev() {
        accumulate(
            &mut backward.gradients[l + 1],
            outputs[l],
            &backward.deltas[l + 1],
        );

        let (lower, upper) = backward.deltas.split_at_mut(l + 1);
        let next = &upper[0];
        for (i, (delta, deriv)) in lower[l].iter_mut().zip(&derivs[l - 1]).enumerate() {
            let weighted: f64 = next
                .iter()
                .zip(weights[l].iter_rows())
                .map(|(d, w)| d * w[i])
                .sum();
            *delta = weighted * (deriv + flat_spot);
        }
    }

    // the inputs aren't learned so layer 0 needs no deltas
    accumulate(&mut backward.gradients[1], outputs[0], &backward.deltas[1]);

    for l in 1..layers {
        backward.bias_gradients[l] += backward.deltas[l].iter().sum::<f64>();
    }
    Ok(())
}

fn derivatives(network: &Network, forward: &Forward, layer: usize) -> Result<Vec<f64>> {
    let derivs = network
        .require_activation(layer)?
        .derivatives(forward.triggers(layer)?, forward.outputs(layer)?);
    NetError::check("activation derivatives", network.neurons(layer)?, derivs.len())?;
    Ok(derivs)
}

/// `gradients[o][i] += inputs[i] * deltas[o]`
fn accumulate(gradients: &mut Matrix, inputs: &[f64], deltas: &[f64]) {
    for (o, delta) in deltas.iter().enumerate() {
        for (g, x) in gradients.row_mut(o).iter_mut().zip(inputs) {
            *g += x * delta;
        }
    }
}
