use crate::error::{NetError, Result};
use crate::helpers::round_to;
use crate::network::{forward, Network};
use crate::patterns::{Pattern, PatternSource};

use rayon::prelude::*;
use tracing::{trace, warn};

/// Fraction of the patterns in `source` for which the network reproduces the expected outputs
/// exactly, rounded to `decimals` decimal places.
///
/// Batches of the source are evaluated in parallel, each counting its own matches; the counts
/// are summed once every batch is done. An empty source scores 0.
pub fn get_performance<S>(network: &Network, source: &S, decimals: u32) -> Result<f64>
where
    S: PatternSource + ?Sized,
{
    let total = source.len();
    if total == 0 {
        warn!("measuring performance on an empty pattern source");
        return Ok(0.);
    }

    let batches = source.batches();
    let batched: usize = batches.iter().map(|b| b.len()).sum();
    NetError::check("batched patterns", total, batched)?;

    let counts = batches
        .into_par_iter()
        .enumerate()
        .map(|(batch, patterns)| -> Result<usize> {
            let matches = count_matches(network, patterns)?;
            trace!(batch, size = patterns.len(), matches, "scored batch");
            Ok(matches)
        })
        .collect::<Result<Vec<usize>>>()?;

    let matches: usize = counts.iter().sum();
    Ok(round_to(matches as f64 / total as f64, decimals))
}

fn count_matches(network: &Network, patterns: &[Pattern]) -> Result<usize> {
    let mut matches = 0;
    for pattern in patterns {
        NetError::check("expected outputs", network.output_size(), pattern.outputs().len())?;
        let fwd = forward(network, pattern.inputs())?;
        if fwd.output() == pattern.outputs() {
            matches += 1;
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::Identity;
    use crate::matrix::Matrix;
    use crate::network::NetworkBuilder;
    use crate::patterns::PatternSet;
    use std::sync::Arc;

    fn summing_network() -> Network {
        let mut net = NetworkBuilder::new(2)
            .layer(1, Arc::new(Identity), 0.)
            .build()
            .unwrap();
        net.set_weights(1, Matrix::from_rows(&[[1., 1.]]).unwrap())
            .unwrap();
        net
    }

    /// `k` patterns of which the first `m` hold the correct sum.
    fn patterns(k: usize, m: usize) -> Vec<Pattern> {
        (0..k)
            .map(|i| {
                let (a, b) = (i as f64, 2. * i as f64);
                let sum = if i < m { a + b } else { a + b + 1. };
                Pattern::new(vec![a, b], vec![sum])
            })
            .collect()
    }

    #[test]
    fn counts_exact_matches() {
        let net = summing_network();
        let set = PatternSet::new(patterns(7, 5), 2);
        assert_eq!(get_performance(&net, &set, 3), Ok(0.714));
        assert_eq!(get_performance(&net, &set, 1), Ok(0.7));
        assert_eq!(get_performance(&net, patterns(4, 4).as_slice(), 2), Ok(1.));
    }

    #[test]
    fn batching_does_not_change_the_score() {
        let net = summing_network();
        let patterns = patterns(101, 37);
        let expected = round_to(37. / 101., 4);
        for batch_size in &[1, 3, 50, 101, 500] {
            let set = PatternSet::new(patterns.clone(), *batch_size);
            assert_eq!(get_performance(&net, &set, 4), Ok(expected));
        }
    }

    #[test]
    fn huge_precision_keeps_the_ratio() {
        let net = summing_network();
        let patterns = patterns(2, 1);
        for decimals in &[308, 309, 400, u32::MAX] {
            assert_eq!(get_performance(&net, patterns.as_slice(), *decimals), Ok(0.5));
        }
    }

    #[test]
    fn empty_source_scores_zero() {
        let net = summing_network();
        let set = PatternSet::new(Vec::new(), 10);
        assert_eq!(get_performance(&net, &set, 2), Ok(0.));
    }

    #[test]
    fn mismatched_patterns_fail() {
        let net = summing_network();
        let wrong_input = vec![Pattern::new(vec![1.], vec![1.])];
        assert_eq!(
            get_performance(&net, &wrong_input, 2),
            Err(NetError::shape("forward input", 2, 1))
        );
        let wrong_output = vec![Pattern::new(vec![1., 1.], vec![2., 0.])];
        assert_eq!(
            get_performance(&net, &wrong_output, 2),
            Err(NetError::shape("expected outputs", 1, 2))
        );
    }

    struct Leaky(Vec<Pattern>);

    impl PatternSource for Leaky {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn get(&self, idx: usize) -> Option<&Pattern> {
            self.0.get(idx)
        }

        fn batches(&self) -> Vec<&[Pattern]> {
            vec![&self.0[1..]]
        }
    }

    #[test]
    fn incomplete_batches_are_rejected() {
        let net = summing_network();
        assert_eq!(
            get_performance(&net, &Leaky(patterns(3, 3)), 2),
            Err(NetError::shape("batched patterns", 3, 2))
        );
    }
}
