pub mod backprop;
pub mod construction;
pub mod feed_forward;

pub use self::backprop::{backward, BackpropConfig, Backward};
pub use self::construction::NetworkBuilder;
pub use self::feed_forward::{forward, Forward};

use crate::a_funcs::{Activation, ActivationRef};
use crate::error::{NetError, Result};
use crate::matrix::Matrix;

use tracing::debug;

/// Parameters of a computed layer, that is every layer except the input.
#[derive(Clone, Debug)]
pub struct LayerParams {
    pub(crate) activation: Option<ActivationRef>,
    /// One bias shared by every neuron of the layer.
    pub(crate) bias: f64,
    /// `[neurons(l) x neurons(l - 1)]`
    pub(crate) weights: Matrix,
}

impl LayerParams {
    fn new(activation: Option<ActivationRef>, bias: f64, weights: Matrix) -> Self {
        Self {
            activation,
            bias,
            weights,
        }
    }

    pub fn activation(&self) -> Option<&ActivationRef> {
        self.activation.as_ref()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }
}

#[derive(Clone, Debug)]
struct Layer {
    neurons: usize,
    /// None for the input layer.
    params: Option<LayerParams>,
}

/// A fully connected feed-forward network.
///
/// Layers are indexed from zero, layer 0 being the input layer. Only layers `1..layer_count()`
/// carry an activation, a bias and a weight matrix connecting them to the layer before.
///
/// Cloning a network deep copies its weights while the activations stay shared.
/// The network has no internal locking: it must not be mutated while a
/// [forward](self::forward), [backward](self::backward) or a performance run reads from it,
/// which the borrow checker enforces for safe code.
#[derive(Clone, Debug, Default)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network without any layers. The input layer has to be added first.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Creates a network with the given layer sizes, zero weights and biases and no activations.
    /// The parameters are meant to be filled in afterwards, for example from saved values.
    pub fn create_structure(sizes: &[usize]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(NetError::TooFewLayers {
                required: 1,
                layers: 0,
            });
        }
        if let Some(layer) = sizes.iter().position(|n| *n == 0) {
            return Err(NetError::EmptyLayer { layer });
        }

        let mut layers = Vec::with_capacity(sizes.len());
        layers.push(Layer {
            neurons: sizes[0],
            params: None,
        });
        for pair in sizes.windows(2) {
            let (prev, neurons) = (pair[0], pair[1]);
            layers.push(Layer {
                neurons,
                params: Some(LayerParams::new(None, 0., Matrix::zeroed(neurons, prev))),
            });
        }

        debug!(?sizes, "created network structure");
        Ok(Self { layers })
    }

    /// Declares the input layer. Only legal as the very first structural change.
    pub fn add_input_layer(&mut self, neurons: usize) -> Result<&mut Self> {
        if !self.layers.is_empty() {
            return Err(NetError::IllegalState(
                "the input layer must be the first layer of the network",
            ));
        }
        if neurons == 0 {
            return Err(NetError::EmptyLayer { layer: 0 });
        }
        self.layers.push(Layer {
            neurons,
            params: None,
        });
        debug!(neurons, "added input layer");
        Ok(self)
    }

    /// Appends a computed layer connected to the current last layer. All of its weights start at zero.
    pub fn add_layer(
        &mut self,
        neurons: usize,
        activation: ActivationRef,
        bias: f64,
    ) -> Result<&mut Self> {
        let prev = match self.layers.last() {
            Some(l) => l.neurons,
            None => {
                return Err(NetError::IllegalState(
                    "an input layer has to be added before any other layer",
                ))
            }
        };
        let layer = self.layers.len();
        if neurons == 0 {
            return Err(NetError::EmptyLayer { layer });
        }
        self.layers.push(Layer {
            neurons,
            params: Some(LayerParams::new(
                Some(activation),
                bias,
                Matrix::zeroed(neurons, prev),
            )),
        });
        debug!(layer, neurons, bias, "added layer");
        Ok(self)
    }

    //getters
    /// Number of layers including the input layer.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of neurons in every layer, starting with the input layer.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.neurons).collect()
    }

    pub fn neurons(&self, layer: usize) -> Result<usize> {
        self.layers
            .get(layer)
            .map(|l| l.neurons)
            .ok_or(NetError::LayerOutOfBounds {
                layer,
                layers: self.layers.len(),
            })
    }

    /// Returns 0 for a network without layers.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.neurons)
    }

    /// Returns 0 for a network without layers.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.neurons)
    }

    /// Total number of weights in the network.
    pub fn weight_count(&self) -> usize {
        self.layers
            .iter()
            .filter_map(|l| l.params.as_ref())
            .map(|p| p.weights.len())
            .sum()
    }

    /// Parameters of a computed layer. Layer 0 has none.
    pub fn params(&self, layer: usize) -> Result<&LayerParams> {
        let layers = self.layers.len();
        self.layers
            .get(layer)
            .and_then(|l| l.params.as_ref())
            .ok_or(NetError::LayerOutOfBounds { layer, layers })
    }

    /// Iterates over the computed layers in ascending order, yielding the neuron counts of the
    /// previous and the current layer with the layer's parameters.
    pub(crate) fn computed_layers(&self) -> impl Iterator<Item = (usize, usize, &LayerParams)> {
        self.layers.windows(2).filter_map(|pair| {
            pair[1]
                .params
                .as_ref()
                .map(|p| (pair[0].neurons, pair[1].neurons, p))
        })
    }

    pub(crate) fn computed_layers_mut(
        &mut self,
    ) -> impl Iterator<Item = (usize, usize, &mut LayerParams)> {
        let mut prev = 0;
        self.layers.iter_mut().filter_map(move |l| {
            let in_size = std::mem::replace(&mut prev, l.neurons);
            let size = l.neurons;
            l.params.as_mut().map(|p| (in_size, size, p))
        })
    }

    fn params_mut(&mut self, layer: usize) -> Result<&mut LayerParams> {
        let layers = self.layers.len();
        self.layers
            .get_mut(layer)
            .and_then(|l| l.params.as_mut())
            .ok_or(NetError::LayerOutOfBounds { layer, layers })
    }

    pub fn weights(&self, layer: usize) -> Result<&Matrix> {
        self.params(layer).map(|p| &p.weights)
    }

    pub fn bias(&self, layer: usize) -> Result<f64> {
        self.params(layer).map(|p| p.bias)
    }

    /// Returns `Ok(None)` for layers of a [create_structure](Self::create_structure)
    /// shell whose activation hasn't been set yet.
    pub fn activation(&self, layer: usize) -> Result<Option<&ActivationRef>> {
        self.params(layer).map(|p| p.activation.as_ref())
    }

    /// Like [activation](Self::activation) but fails when the activation is missing.
    pub(crate) fn require_activation(&self, layer: usize) -> Result<&dyn Activation> {
        self.params(layer)?
            .activation
            .as_deref()
            .ok_or(NetError::MissingActivation { layer })
    }

    //setters
    /// Mutable access to the weights. The shape of the matrix cannot be changed this way.
    pub fn weights_mut(&mut self, layer: usize) -> Result<&mut [f64]> {
        self.params_mut(layer).map(|p| p.weights.raw_mut())
    }

    /// Replaces the weights of a layer. Fails if the matrix shape differs from the current one.
    pub fn set_weights(&mut self, layer: usize, weights: Matrix) -> Result<()> {
        let params = self.params_mut(layer)?;
        NetError::check("weight rows", params.weights.rows(), weights.rows())?;
        NetError::check("weight columns", params.weights.cols(), weights.cols())?;
        params.weights = weights;
        Ok(())
    }

    pub fn set_bias(&mut self, layer: usize, bias: f64) -> Result<()> {
        self.params_mut(layer)?.bias = bias;
        Ok(())
    }

    pub fn set_activation(&mut self, layer: usize, activation: ActivationRef) -> Result<()> {
        self.params_mut(layer)?.activation = Some(activation);
        Ok(())
    }

    /// Sets the weight of a single connection. `to` indexes the neuron in `layer`,
    /// `from` the neuron in `layer - 1`.
    pub fn set_weight(&mut self, layer: usize, to: usize, from: usize, weight: f64) -> Result<()> {
        let params = self.params_mut(layer)?;
        let (rows, cols) = params.weights.shape();
        match params.weights.get_mut(to, from) {
            Some(w) => {
                *w = weight;
                Ok(())
            }
            None if to >= rows => Err(NetError::shape("weight row index", rows, to)),
            None => Err(NetError::shape("weight column index", cols, from)),
        }
    }
}
