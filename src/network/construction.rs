use super::Network;
use crate::a_funcs::ActivationRef;
use crate::error::Result;

/// Builder for networks, collecting layers before validating them all at once in [build](Self::build).
///
/// ```
/// use backprop_nn::a_funcs::{BasicActivation, Sigmoid, Identity};
/// use backprop_nn::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new(2)
///     .layer(3, BasicActivation::from(Sigmoid).shared(), 0.)
///     .layer(1, BasicActivation::from(Identity).shared(), 0.)
///     .build()
///     .unwrap();
/// assert_eq!(network.layer_sizes(), vec![2, 3, 1]);
/// ```
pub struct NetworkBuilder {
    in_size: usize,
    layers: Vec<(usize, ActivationRef, f64)>,
}

impl NetworkBuilder {
    pub fn new(in_size: usize) -> Self {
        NetworkBuilder {
            in_size,
            layers: Vec::new(),
        }
    }

    /// Adds a single layer to the network.
    pub fn layer(mut self, neurons: usize, activation: ActivationRef, bias: f64) -> Self {
        self.layers.push((neurons, activation, bias));
        self
    }

    /// Adds all of the layers provided by the `layers` argument.
    pub fn layers<T>(mut self, layers: T) -> Self
    where
        T: IntoIterator<Item = (usize, ActivationRef, f64)>,
    {
        self.layers.extend(layers);
        self
    }

    /// Builds the network. Returns Err if any of the layers is empty.
    pub fn build(self) -> Result<Network> {
        let mut network = Network::new();
        network.add_input_layer(self.in_size)?;
        for (neurons, activation, bias) in self.layers {
            network.add_layer(neurons, activation, bias)?;
        }
        Ok(network)
    }
}
