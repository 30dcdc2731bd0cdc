use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors raised when a network is used in a way its structure doesn't allow.
/// Every variant describes a caller mistake, none of them are transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetError {
    #[error("Layer {layer} is out of bounds. Parameters exist for layers 1..{layers}.")]
    LayerOutOfBounds { layer: usize, layers: usize },

    #[error("Size mismatch in {what}: expected {expected} but received {received}.")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        received: usize,
    },

    #[error("Illegal structural change: {0}")]
    IllegalState(&'static str),

    #[error("The network needs at least {required} layers, but it has {layers}.")]
    TooFewLayers { required: usize, layers: usize },

    #[error("Layer {layer} has no activation function.")]
    MissingActivation { layer: usize },

    #[error("Layer {layer} must contain at least a single neuron.")]
    EmptyLayer { layer: usize },
}

impl NetError {
    pub(crate) fn shape(what: &'static str, expected: usize, received: usize) -> Self {
        NetError::ShapeMismatch {
            what,
            expected,
            received,
        }
    }

    /// Returns `Err` if `expected != received`.
    pub(crate) fn check(what: &'static str, expected: usize, received: usize) -> Result<()> {
        if expected == received {
            Ok(())
        } else {
            Err(Self::shape(what, expected, received))
        }
    }
}
