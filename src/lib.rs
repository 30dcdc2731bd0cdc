pub mod a_funcs;
pub mod error;
pub mod helpers;
pub mod initializer;
pub mod matrix;
pub mod network;
pub mod patterns;
pub mod performance;

pub use error::{NetError, Result};
pub use matrix::Matrix;
pub use network::{backward, forward, BackpropConfig, Backward, Forward, Network};
pub use performance::get_performance;
