use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use std::fmt::Debug;
use std::sync::Arc;

/// A transform applied to the triggers of a whole layer.
///
/// Implementations must be pure functions of their inputs. The derivative may be computed
/// from either the triggers or the outputs, whichever is numerically preferable.
#[enum_dispatch]
pub trait Activation: Debug + Send + Sync {
    /// Compute the layer outputs from its triggers.
    fn activations(&self, triggers: &[f64]) -> Vec<f64>;
    /// Compute the derivative of every output with respect to its trigger.
    fn derivatives(&self, triggers: &[f64], outputs: &[f64]) -> Vec<f64>;
}

/// Activations are stateless, so networks and their clones share them.
pub type ActivationRef = Arc<dyn Activation>;

/// A scalar activation function applied to each neuron independently.
pub trait ActivFunc {
    fn evaluate(&self, x: f64) -> f64;
    fn derivative(&self, inp: f64, out: f64) -> f64;
}

/// Lifts any [ActivFunc](self::ActivFunc) into a layer-wide [Activation](self::Activation).
#[derive(Clone, Debug)]
pub struct Elementwise<F>(pub F);

impl<F> Activation for Elementwise<F>
where
    F: ActivFunc + Debug + Send + Sync,
{
    fn activations(&self, triggers: &[f64]) -> Vec<f64> {
        triggers.iter().map(|x| self.0.evaluate(*x)).collect()
    }

    fn derivatives(&self, triggers: &[f64], outputs: &[f64]) -> Vec<f64> {
        triggers
            .iter()
            .zip(outputs)
            .map(|(i, o)| self.0.derivative(*i, *o))
            .collect()
    }
}

/// Implement Activation for a built-in through [Elementwise](self::Elementwise).
macro_rules! impl_elementwise {
    ($t:ty) => {
        impl Activation for $t {
            fn activations(&self, triggers: &[f64]) -> Vec<f64> {
                Elementwise(*self).activations(triggers)
            }

            fn derivatives(&self, triggers: &[f64], outputs: &[f64]) -> Vec<f64> {
                Elementwise(*self).derivatives(triggers, outputs)
            }
        }
    };
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Sigmoid;
impl ActivFunc for Sigmoid {
    fn evaluate(&self, x: f64) -> f64 {
        1. / (1. + (-x).exp())
    }
    fn derivative(&self, _: f64, out: f64) -> f64 {
        out * (1. - out)
    }
}
impl_elementwise!(Sigmoid);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Identity;
impl ActivFunc for Identity {
    fn evaluate(&self, x: f64) -> f64 {
        x
    }
    fn derivative(&self, _: f64, _: f64) -> f64 {
        1.
    }
}
impl_elementwise!(Identity);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct TanH;
impl ActivFunc for TanH {
    fn evaluate(&self, x: f64) -> f64 {
        x.tanh()
    }
    fn derivative(&self, _inp: f64, out: f64) -> f64 {
        1. - out * out
    }
}
impl_elementwise!(TanH);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct SiLU;
impl ActivFunc for SiLU {
    fn evaluate(&self, x: f64) -> f64 {
        x / (1. + (-x).exp()) // x * sigmoid(x)
    }
    fn derivative(&self, inp: f64, _out: f64) -> f64 {
        // recovering sigmoid from the output would divide by zero at inp == 0
        let s = Sigmoid.evaluate(inp);
        s * (1. + inp * (1. - s))
    }
}
impl_elementwise!(SiLU);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct ReLU;
impl ActivFunc for ReLU {
    fn evaluate(&self, x: f64) -> f64 {
        f64::max(x, 0.)
    }
    fn derivative(&self, inp: f64, _out: f64) -> f64 {
        if inp > 0. {
            1.
        } else {
            0.
        }
    }
}
impl_elementwise!(ReLU);

/// Normalizes the layer into a probability distribution.
/// Only the diagonal of the jacobian, `s * (1 - s)`, is reported as the derivative.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Softmax;
impl Activation for Softmax {
    fn activations(&self, triggers: &[f64]) -> Vec<f64> {
        let max = triggers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = triggers.iter().map(|t| (t - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }

    fn derivatives(&self, _triggers: &[f64], outputs: &[f64]) -> Vec<f64> {
        outputs.iter().map(|s| s * (1. - s)).collect()
    }
}

/// This enum names every built-in activation so the choice of activation
/// can be serialized next to the network's parameters.
#[enum_dispatch(Activation)]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum BasicActivation {
    Identity(Identity),
    Sigmoid(Sigmoid),
    TanH(TanH),
    SiLU(SiLU),
    ReLU(ReLU),
    Softmax(Softmax),
}

impl BasicActivation {
    /// Wrap the activation so it can be attached to network layers.
    pub fn shared(self) -> ActivationRef {
        Arc::new(self)
    }
}
