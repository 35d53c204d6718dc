use indexmap::IndexMap;

use crate::error::SimulationError;
use crate::types::logical_operation::LogicalOperation;

/// A user's weighted set of logical operations.
///
/// Entries keep insertion order: upserting an existing key leaves it in
/// place, removing a key shifts the ones after it down. That order is the
/// layout of the probability vector, so it has to be stable for a seeded run
/// to replay identically.
#[derive(Debug, Default, Clone)]
pub struct OperationVocabulary {
    scores: IndexMap<LogicalOperation, f64>,
}

impl OperationVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the score for an operation, replacing any previous score.
    pub fn upsert(&mut self, op: LogicalOperation, score: f64) -> Result<(), SimulationError> {
        if op.is_empty() {
            return Err(SimulationError::InvalidOperation(
                "logical operation must contain at least one symbol".to_string(),
            ));
        }
        if !score.is_finite() || score < 0.0 {
            return Err(SimulationError::InvalidOperation(format!(
                "score for {} must be a finite non-negative number, got {}",
                op, score
            )));
        }
        self.scores.insert(op, score);
        Ok(())
    }

    /// Removes an operation. Returns false when it was not present.
    pub fn remove(&mut self, op: &LogicalOperation) -> bool {
        self.scores.shift_remove(op).is_some()
    }

    pub fn score(&self, op: &LogicalOperation) -> Option<f64> {
        self.scores.get(op).copied()
    }

    pub fn size(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn total_score(&self) -> f64 {
        self.scores.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LogicalOperation, f64)> {
        self.scores.iter().map(|(op, score)| (op, *score))
    }

    /// `score / Σ scores` for every entry, in vocabulary order.
    ///
    /// Returns `None` when there is no probability mass to distribute: an
    /// empty vocabulary, or one where every score is zero.
    pub fn probabilities(&self) -> Option<Vec<(&LogicalOperation, f64)>> {
        let total = self.total_score();
        if self.scores.is_empty() || total <= 0.0 {
            return None;
        }
        Some(self.scores.iter().map(|(op, score)| (op, score / total)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(symbols: &[&str]) -> LogicalOperation {
        LogicalOperation::from(symbols)
    }

    #[test]
    fn upsert_overwrites_instead_of_accumulating() {
        let mut vocab = OperationVocabulary::new();
        vocab.upsert(op(&["a"]), 0.5).unwrap();
        vocab.upsert(op(&["a"]), 2.0).unwrap();
        assert_eq!(vocab.size(), 1);
        assert_eq!(vocab.score(&op(&["a"])), Some(2.0));
    }

    #[test]
    fn rejects_empty_operation_and_bad_scores() {
        let mut vocab = OperationVocabulary::new();
        assert!(matches!(
            vocab.upsert(op(&[]), 1.0),
            Err(SimulationError::InvalidOperation(_))
        ));
        assert!(vocab.upsert(op(&["a"]), -0.1).is_err());
        assert!(vocab.upsert(op(&["a"]), f64::NAN).is_err());
        assert!(vocab.upsert(op(&["a"]), f64::INFINITY).is_err());
        assert!(vocab.is_empty());
    }

    #[test]
    fn remove_is_quiet_for_missing_keys() {
        let mut vocab = OperationVocabulary::new();
        assert!(!vocab.remove(&op(&["x"])));
        vocab.upsert(op(&["x"]), 1.0).unwrap();
        assert!(vocab.remove(&op(&["x"])));
        assert!(!vocab.remove(&op(&["x"])));
    }

    #[test]
    fn readded_key_moves_to_the_end() {
        let mut vocab = OperationVocabulary::new();
        vocab.upsert(op(&["a"]), 1.0).unwrap();
        vocab.upsert(op(&["b"]), 1.0).unwrap();
        vocab.remove(&op(&["a"]));
        vocab.upsert(op(&["a"]), 3.0).unwrap();

        let order: Vec<_> = vocab.iter().map(|(o, _)| o.clone()).collect();
        assert_eq!(order, vec![op(&["b"]), op(&["a"])]);
    }

    #[test]
    fn probabilities_are_normalised_scores() {
        let mut vocab = OperationVocabulary::new();
        vocab.upsert(op(&["a", "b"]), 0.7).unwrap();
        vocab.upsert(op(&["c"]), 0.3).unwrap();

        let probs = vocab.probabilities().unwrap();
        assert!((probs[0].1 - 0.7).abs() < 1e-12);
        assert!((probs[1].1 - 0.3).abs() < 1e-12);
        let sum: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_probabilities_without_mass() {
        let mut vocab = OperationVocabulary::new();
        assert!(vocab.probabilities().is_none());
        vocab.upsert(op(&["a"]), 0.0).unwrap();
        assert!(vocab.probabilities().is_none());
    }
}
