use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::histogram::sort_population;
use super::user::User;
use crate::error::SimulationError;
use crate::types::logical_operation::{LogicalOperation, SessionId, UserId};
use crate::types::text_entry::{HistogramRow, TextEntry};

pub const DEFAULT_SEED: u64 = 0;

/// Registry of users plus the global log of generated texts.
///
/// The engine owns the only random generator. Its draws depend solely on the
/// order and sizes of `generate_text` calls, so two engines built with the
/// same seed and fed the same calls produce identical output.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    seed: u64,
    rng: ChaCha8Rng,
    users: BTreeMap<UserId, User>,
    text_entries: Vec<TextEntry>,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SimulationEngine {
    pub fn new(seed: u64) -> Self {
        SimulationEngine {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            users: BTreeMap::new(),
            text_entries: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut User, SimulationError> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| SimulationError::UnknownUser(user_id.to_string()))
    }

    pub fn add_user(&mut self, user_id: impl Into<UserId>) -> Result<(), SimulationError> {
        let user_id = user_id.into();
        if self.users.contains_key(&user_id) {
            return Err(SimulationError::DuplicateUser(user_id));
        }
        debug!(user_id = %user_id, "user added");
        self.users.insert(user_id.clone(), User::new(user_id));
        Ok(())
    }

    /// Drops a user and its history. Entries it already contributed to the
    /// text log stay there.
    pub fn remove_user(&mut self, user_id: &str) -> Result<(), SimulationError> {
        self.users
            .remove(user_id)
            .map(|_| debug!(user_id, "user removed"))
            .ok_or_else(|| SimulationError::UnknownUser(user_id.to_string()))
    }

    pub fn set_session(
        &mut self,
        user_id: &str,
        session_id: impl Into<SessionId>,
    ) -> Result<(), SimulationError> {
        self.user_mut(user_id)?.set_session(session_id);
        Ok(())
    }

    pub fn add_operation(
        &mut self,
        user_id: &str,
        op: LogicalOperation,
        score: f64,
    ) -> Result<(), SimulationError> {
        self.user_mut(user_id)?.add_operation(op, score)
    }

    /// Applies `score` to each operation in order. Stops at the first
    /// rejected element; elements before it stay applied.
    pub fn add_operations<I>(&mut self, user_id: &str, ops: I, score: f64) -> Result<(), SimulationError>
    where
        I: IntoIterator<Item = LogicalOperation>,
    {
        let user = self.user_mut(user_id)?;
        for op in ops {
            user.add_operation(op, score)?;
        }
        Ok(())
    }

    pub fn remove_operation(&mut self, user_id: &str, op: &LogicalOperation) -> Result<(), SimulationError> {
        self.user_mut(user_id)?.remove_operation(op);
        Ok(())
    }

    pub fn remove_operations<'a, I>(&mut self, user_id: &str, ops: I) -> Result<(), SimulationError>
    where
        I: IntoIterator<Item = &'a LogicalOperation>,
    {
        let user = self.user_mut(user_id)?;
        for op in ops {
            user.remove_operation(op);
        }
        Ok(())
    }

    /// Generates a text for the user and appends it to the global log.
    pub fn generate_text(&mut self, user_id: &str, count: usize) -> Result<&TextEntry, SimulationError> {
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| SimulationError::UnknownUser(user_id.to_string()))?;
        let entry = user.generate_text(count, &mut self.rng)?;
        self.text_entries.push(entry);
        Ok(&self.text_entries[self.text_entries.len() - 1])
    }

    /// Every text generated since the last `clear_entries`, in call order.
    pub fn get_text_entries(&self) -> &[TextEntry] {
        &self.text_entries
    }

    /// Empties the text log. Users, vocabularies, sessions and per-user
    /// histories are left as they are.
    pub fn clear_entries(&mut self) {
        self.text_entries.clear();
    }

    /// Every live user's histogram, sorted by `(user_id, logical_operation)`.
    pub fn get_population_histogram(&self) -> Vec<HistogramRow> {
        let mut rows: Vec<HistogramRow> = self.users.values().flat_map(User::get_histogram).collect();
        sort_population(&mut rows);
        rows
    }
}
