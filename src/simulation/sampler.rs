//! Weighted draws with replacement over a probability vector.

use rand::Rng;

use crate::types::logical_operation::LogicalOperation;

/// Inverse-CDF sampler built from a fresh `(operation, probability)` vector.
///
/// Each draw consumes exactly one uniform `f64` from the generator, so the
/// generator's position after a call depends only on how many occurrences
/// were drawn.
#[derive(Debug)]
pub struct WeightedSampler<'a> {
    operations: Vec<&'a LogicalOperation>,
    cumulative: Vec<f64>,
    last_positive: usize,
}

impl<'a> WeightedSampler<'a> {
    /// `probabilities` must be non-empty with at least one positive entry.
    pub fn new(probabilities: Vec<(&'a LogicalOperation, f64)>) -> Self {
        let mut operations = Vec::with_capacity(probabilities.len());
        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut running = 0.0;
        let mut last_positive = 0;
        for (idx, (op, p)) in probabilities.into_iter().enumerate() {
            running += p;
            if p > 0.0 {
                last_positive = idx;
            }
            operations.push(op);
            cumulative.push(running);
        }
        WeightedSampler {
            operations,
            cumulative,
            last_positive,
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a LogicalOperation {
        let u: f64 = rng.random();
        let idx = self.cumulative.partition_point(|&c| c <= u);
        // Rounding can leave the final cumulative value just below 1.0.
        self.operations[idx.min(self.last_positive)]
    }

    pub fn draw_many<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<LogicalOperation> {
        (0..count).map(|_| self.draw(rng).clone()).collect()
    }
}
