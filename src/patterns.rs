use crate::error::{NetError, Result};

use serde::{Deserialize, Serialize};

/// A single input paired with the output the network is expected to produce for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    inputs: Box<[f64]>,
    outputs: Box<[f64]>,
}

impl Pattern {
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: Into<Box<[f64]>>,
        O: Into<Box<[f64]>>,
    {
        Self {
            inputs: inputs.into(),
            outputs: outputs.into(),
        }
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// The expected outputs.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }
}

/// A collection of patterns that can be split into batches for parallel evaluation.
pub trait PatternSource: Sync {
    /// Get the number of patterns.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the pattern at `idx`.
    fn get(&self, idx: usize) -> Option<&Pattern>;

    /// Partition the patterns into batches. Together the batches must contain every pattern exactly once.
    fn batches(&self) -> Vec<&[Pattern]>;
}

/// A plain slice is a source consisting of a single batch.
impl PatternSource for [Pattern] {
    fn len(&self) -> usize {
        <[Pattern]>::len(self)
    }

    fn get(&self, idx: usize) -> Option<&Pattern> {
        <[Pattern]>::get(self, idx)
    }

    fn batches(&self) -> Vec<&[Pattern]> {
        if <[Pattern]>::is_empty(self) {
            Vec::new()
        } else {
            vec![self]
        }
    }
}

impl PatternSource for Vec<Pattern> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, idx: usize) -> Option<&Pattern> {
        self.as_slice().get(idx)
    }

    fn batches(&self) -> Vec<&[Pattern]> {
        PatternSource::batches(self.as_slice())
    }
}

/// This struct stores patterns and hands them out in consecutive batches of a fixed size.
/// The last batch holds the remainder and may be smaller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    batch_size: usize,
}

impl PatternSet {
    /// A `batch_size` of zero is treated as one.
    pub fn new(patterns: Vec<Pattern>, batch_size: usize) -> Self {
        Self {
            patterns,
            batch_size: batch_size.max(1),
        }
    }

    /// This is a helper method that constructs a pattern set from separate input
    /// and expected output vectors. Returns Err if the vectors don't pair up or
    /// if the patterns don't all share the same input and output sizes.
    pub fn from_pairs<D, L, U, V>(inputs: D, outputs: L, batch_size: usize) -> Result<Self>
    where
        D: IntoIterator<Item = U>,
        L: IntoIterator<Item = V>,
        U: AsRef<[f64]>,
        V: AsRef<[f64]>,
    {
        let inputs: Vec<U> = inputs.into_iter().collect();
        let outputs: Vec<V> = outputs.into_iter().collect();
        NetError::check("pattern outputs", inputs.len(), outputs.len())?;

        let in_len = inputs.first().map_or(0, |i| i.as_ref().len());
        let out_len = outputs.first().map_or(0, |o| o.as_ref().len());
        let mut patterns = Vec::with_capacity(inputs.len());
        for (i, o) in inputs.iter().zip(&outputs) {
            let (i, o) = (i.as_ref(), o.as_ref());
            NetError::check("pattern inputs", in_len, i.len())?;
            NetError::check("pattern outputs", out_len, o.len())?;
            patterns.push(Pattern::new(i, o));
        }
        Ok(Self::new(patterns, batch_size))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }
}

impl PatternSource for PatternSet {
    fn len(&self) -> usize {
        self.patterns.len()
    }

    fn get(&self, idx: usize) -> Option<&Pattern> {
        self.patterns.get(idx)
    }

    fn batches(&self) -> Vec<&[Pattern]> {
        self.patterns.chunks(self.batch_size).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(n: usize) -> Vec<Pattern> {
        (0..n)
            .map(|i| Pattern::new(vec![i as f64], vec![2. * i as f64]))
            .collect()
    }

    #[test]
    fn batches_partition_the_set() {
        let set = PatternSet::new(patterns(10), 4);
        let sizes: Vec<usize> = set.batches().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(sizes.iter().sum::<usize>(), set.len());
        assert_eq!(set.get(9).map(Pattern::outputs), Some(&[18.][..]));
    }

    #[test]
    fn slice_is_one_batch() {
        let patterns = patterns(3);
        assert_eq!(PatternSource::batches(patterns.as_slice()).len(), 1);
        assert!(PatternSource::batches(&Vec::<Pattern>::new()).is_empty());
        assert!(PatternSet::new(Vec::new(), 0).batches().is_empty());
    }

    #[test]
    fn pushed_patterns_join_the_last_batch() {
        let mut set = PatternSet::new(patterns(3), 0);
        assert_eq!(set.batch_size(), 1);

        let mut set_of_two = PatternSet::new(patterns(3), 2);
        set_of_two.push(Pattern::new(vec![3.], vec![6.]));
        assert_eq!(set_of_two.patterns(), patterns(4).as_slice());
        let sizes: Vec<usize> = set_of_two.batches().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2]);

        set.push(Pattern::new(vec![3.], vec![6.]));
        assert_eq!(set.batches().len(), 4);
    }

    #[test]
    fn pairs_must_match() {
        let set = PatternSet::from_pairs(vec![[0., 1.], [1., 0.]], vec![[1.], [1.]], 1).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().inputs(), &[1., 0.]);

        assert!(PatternSet::from_pairs(vec![[0., 1.]], Vec::<[f64; 1]>::new(), 1).is_err());
        let ragged: Vec<Vec<f64>> = vec![vec![0.], vec![0., 1.]];
        assert!(PatternSet::from_pairs(ragged, vec![[1.], [1.]], 1).is_err());
    }
}
