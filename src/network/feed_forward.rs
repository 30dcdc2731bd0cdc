use super::Network;
use crate::error::{NetError, Result};
use crate::helpers::create_layer_vectors;

/// The values computed for every layer during a single forward pass.
///
/// Both the triggers and the outputs are kept since activations may compute their
/// derivatives from either of them. For the input layer the signals and triggers are zero
/// and the outputs are a copy of the input.
#[derive(Clone, Debug, PartialEq)]
pub struct Forward {
    /// Weighted sum of the previous layer's outputs.
    signals: Vec<Vec<f64>>,
    /// Signals with the layer bias added.
    triggers: Vec<Vec<f64>>,
    /// Activated triggers.
    outputs: Vec<Vec<f64>>,
}

impl Forward {
    pub fn layer_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn signals(&self, layer: usize) -> Result<&[f64]> {
        get_layer(&self.signals, layer)
    }

    pub fn triggers(&self, layer: usize) -> Result<&[f64]> {
        get_layer(&self.triggers, layer)
    }

    pub fn outputs(&self, layer: usize) -> Result<&[f64]> {
        get_layer(&self.outputs, layer)
    }

    /// Outputs of the last layer.
    pub fn output(&self) -> &[f64] {
        self.outputs.last().map(|o| o.as_slice()).unwrap_or(&[])
    }

    /// Checks that the record was produced by a network with the same layer sizes.
    pub(crate) fn check_shape(&self, network: &Network) -> Result<()> {
        NetError::check("forward layer count", network.layer_count(), self.layer_count())?;
        for (layer, outputs) in self.outputs.iter().enumerate() {
            NetError::check("forward layer size", network.neurons(layer)?, outputs.len())?;
        }
        Ok(())
    }
}

fn get_layer(vecs: &[Vec<f64>], layer: usize) -> Result<&[f64]> {
    vecs.get(layer)
        .map(|v| v.as_slice())
        .ok_or(NetError::LayerOutOfBounds {
            layer,
            layers: vecs.len(),
        })
}

/// Propagate `input` through the network. `input` has to be the same size as the network's input layer.
pub fn forward(network: &Network, input: &[f64]) -> Result<Forward> {
    let layers = network.layer_count();
    if layers == 0 {
        return Err(NetError::TooFewLayers {
            required: 1,
            layers,
        });
    }
    NetError::check("forward input", network.input_size(), input.len())?;

    let mut signals = create_layer_vectors(network);
    let mut triggers = create_layer_vectors(network);
    let mut outputs = create_layer_vectors(network);
    outputs[0].copy_from_slice(input);

    for l in 1..layers {
        let params = network.params(l)?;
        let activation = network.require_activation(l)?;
        let bias = params.bias();

        for (o, weights) in params.weights().iter_rows().enumerate() {
            let signal: f64 = weights
                .iter()
                .zip(&outputs[l - 1])
                .map(|(w, x)| w * x)
                .sum();
            signals[l][o] = signal;
            triggers[l][o] = signal + bias;
        }

        let activated = activation.activations(&triggers[l]);
        NetError::check("activation output", triggers[l].len(), activated.len())?;
        outputs[l] = activated;
    }

    Ok(Forward {
        signals,
        triggers,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::{Activation, Identity, Sigmoid};
    use crate::helpers::tests::check;
    use crate::matrix::Matrix;
    use crate::network::NetworkBuilder;
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn sums_inputs() {
        let mut net = NetworkBuilder::new(2)
            .layer(1, Arc::new(Identity), 0.)
            .build()
            .unwrap();
        net.set_weights(1, Matrix::from_rows(&[[1., 1.]]).unwrap())
            .unwrap();

        let fwd = forward(&net, &[1., 2.]).unwrap();
        assert_eq!(fwd.output(), &[3.]);
        assert_eq!(fwd.outputs(0).unwrap(), &[1., 2.]);
        assert_eq!(fwd.signals(0).unwrap(), &[0., 0.]);
    }

    #[test]
    fn bias_is_shared_by_the_layer() {
        let mut net = NetworkBuilder::new(2)
            .layer(3, Arc::new(Identity), 0.5)
            .build()
            .unwrap();
        net.set_weights(
            1,
            Matrix::from_rows(&[[1., 0.], [0., 1.], [1., -1.]]).unwrap(),
        )
        .unwrap();

        let fwd = forward(&net, &[2., 3.]).unwrap();
        check(&[2., 3., -1.], fwd.signals(1).unwrap(), TOLERANCE, "signals");
        check(&[2.5, 3.5, -0.5], fwd.triggers(1).unwrap(), TOLERANCE, "triggers");
        check(&[2.5, 3.5, -0.5], fwd.output(), TOLERANCE, "outputs");
    }

    #[test]
    fn hidden_layer_activation() {
        let mut net = NetworkBuilder::new(1)
            .layer(2, Arc::new(Sigmoid), 0.)
            .layer(1, Arc::new(Identity), 1.)
            .build()
            .unwrap();
        net.set_weights(1, Matrix::from_rows(&[[1.], [-1.]]).unwrap())
            .unwrap();
        net.set_weights(2, Matrix::from_rows(&[[2., 2.]]).unwrap())
            .unwrap();

        let fwd = forward(&net, &[0.3]).unwrap();
        let hidden = Sigmoid.activations(&[0.3, -0.3]);
        check(&hidden, fwd.outputs(1).unwrap(), TOLERANCE, "hidden outputs");
        // sigmoid(x) + sigmoid(-x) == 1
        check(&[2. * 1. + 1.], fwd.output(), TOLERANCE, "output");
    }

    #[test]
    fn deterministic() {
        let mut net = NetworkBuilder::new(3)
            .layer(4, Arc::new(Sigmoid), 0.1)
            .layer(2, Arc::new(Sigmoid), -0.2)
            .build()
            .unwrap();
        for (i, w) in net.weights_mut(1).unwrap().iter_mut().enumerate() {
            *w = (i as f64 * 0.37).sin();
        }
        let input = [0.1, -0.7, 2.5];
        assert_eq!(forward(&net, &input).unwrap(), forward(&net, &input).unwrap());
    }

    #[test]
    fn input_size_mismatch() {
        let net = NetworkBuilder::new(2)
            .layer(1, Arc::new(Identity), 0.)
            .build()
            .unwrap();
        assert_eq!(
            forward(&net, &[1.]).unwrap_err(),
            NetError::shape("forward input", 2, 1)
        );
        assert!(forward(&Network::new(), &[]).is_err());
    }

    #[test]
    fn shell_without_activation_fails() {
        let net = Network::create_structure(&[2, 1]).unwrap();
        assert_eq!(
            forward(&net, &[1., 1.]).unwrap_err(),
            NetError::MissingActivation { layer: 1 }
        );
    }

    #[test]
    fn input_only_network() {
        let net = Network::create_structure(&[3]).unwrap();
        let fwd = forward(&net, &[1., 2., 3.]).unwrap();
        assert_eq!(fwd.output(), &[1., 2., 3.]);
        assert!(fwd.outputs(1).is_err());
    }
}
