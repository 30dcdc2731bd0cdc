use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Implement Initializer for the struct reference as well
macro_rules! impl_ref {
    ($struct:ty) => {
        impl Initializer for &mut $struct {
            fn get(&mut self, in_size: usize, size: usize) -> f64 {
                <$struct as Initializer>::get(self, in_size, size)
            }
        }
    };
}

/// Source of initial parameter values. `in_size` and `size` are the neuron counts of the
/// previous and the current layer respectively.
pub trait Initializer {
    fn get(&mut self, in_size: usize, size: usize) -> f64;
}

/// Independent samples from the standard normal distribution (mean 0, standard deviation 1).
pub struct Normal {
    rng: SmallRng,
}

impl Normal {
    /// Seeded from system entropy.
    pub fn new() -> Normal {
        Normal {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Reproducible sequence of samples.
    pub fn seeded(seed: u64) -> Normal {
        Normal {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Normal {
    fn get(&mut self, _in_size: usize, _size: usize) -> f64 {
        self.rng.sample(StandardNormal)
    }
}
impl_ref!(Normal);

///Xavier initialization should be used for layers with symetric activation functions such as sigmoid or tanH
pub struct Xavier {
    rng: SmallRng,
}

impl Xavier {
    pub fn new() -> Xavier {
        Xavier {
            rng: SmallRng::seed_from_u64(0u64),
        }
    }
}

impl Default for Xavier {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Xavier {
    fn get(&mut self, in_size: usize, _size: usize) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal) / (in_size.max(1) as f64).sqrt()
    }
}
impl_ref!(Xavier);

///Kaiming initialization should be used for layers with asymetric activation functions such as RELU
pub struct Kaiming {
    rng: SmallRng,
}

impl Kaiming {
    pub fn new() -> Kaiming {
        Kaiming {
            rng: SmallRng::seed_from_u64(0u64),
        }
    }
}

impl Default for Kaiming {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Kaiming {
    fn get(&mut self, in_size: usize, _: usize) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal) * (2. / (in_size.max(1) as f64)).sqrt()
    }
}
impl_ref!(Kaiming);

///Always initializes parameters to the same value
pub struct Constant(pub f64);
impl Initializer for Constant {
    fn get(&mut self, _: usize, _: usize) -> f64 {
        self.0
    }
}
impl_ref!(Constant);
