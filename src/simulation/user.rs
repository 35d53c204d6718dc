use rand::Rng;
use tracing::debug;

use super::histogram::user_histogram;
use super::locations::layout_occurrences;
use super::sampler::WeightedSampler;
use super::vocabulary::OperationVocabulary;
use crate::error::SimulationError;
use crate::types::logical_operation::{LogicalOperation, SessionId, UserId};
use crate::types::text_entry::{HistogramRow, TextEntry};

/// One simulated user: a weighted vocabulary, the current session tag and
/// every text generated so far.
#[derive(Debug, Clone)]
pub struct User {
    user_id: UserId,
    session_id: Option<SessionId>,
    vocabulary: OperationVocabulary,
    history: Vec<TextEntry>,
}

impl User {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        User {
            user_id: user_id.into(),
            session_id: None,
            vocabulary: OperationVocabulary::new(),
            history: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session(&mut self, session_id: impl Into<SessionId>) {
        self.session_id = Some(session_id.into());
    }

    pub fn add_operation(&mut self, op: LogicalOperation, score: f64) -> Result<(), SimulationError> {
        self.vocabulary.upsert(op, score)
    }

    pub fn remove_operation(&mut self, op: &LogicalOperation) {
        if !self.vocabulary.remove(op) {
            debug!(user_id = %self.user_id, operation = %op, "remove skipped, operation not in vocabulary");
        }
    }

    pub fn score(&self, op: &LogicalOperation) -> Option<f64> {
        self.vocabulary.score(op)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.size()
    }

    pub fn probabilities(&self) -> Option<Vec<(&LogicalOperation, f64)>> {
        self.vocabulary.probabilities()
    }

    pub fn history(&self) -> &[TextEntry] {
        &self.history
    }

    /// Draws `count` occurrences from the current vocabulary and records the
    /// resulting text.
    ///
    /// Probabilities are rebuilt from the scores on every call, so vocabulary
    /// edits take effect on the next generation. Nothing is recorded and no
    /// random numbers are consumed when a precondition fails.
    pub fn generate_text<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<TextEntry, SimulationError> {
        let session_id = self
            .session_id
            .clone()
            .ok_or_else(|| SimulationError::MissingSession(self.user_id.clone()))?;
        let probabilities = self
            .vocabulary
            .probabilities()
            .ok_or_else(|| SimulationError::EmptyVocabulary(self.user_id.clone()))?;

        let drawn = WeightedSampler::new(probabilities).draw_many(count, rng);
        let layout = layout_occurrences(&drawn);

        let entry = TextEntry {
            user_id: self.user_id.clone(),
            session_id,
            size: layout.text.len(),
            text: layout.text,
            occurrences: layout.occurrences,
            symbols: layout.symbols,
        };
        debug!(
            user_id = %self.user_id,
            session_id = %entry.session_id,
            occurrences = count,
            size = entry.size,
            "generated text"
        );
        self.history.push(entry.clone());
        Ok(entry)
    }

    pub fn get_histogram(&self) -> Vec<HistogramRow> {
        user_histogram(&self.user_id, &self.history)
    }
}
