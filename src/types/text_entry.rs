use serde::{Deserialize, Serialize};

use super::logical_operation::{LogicalOperation, SessionId, Symbol, UserId};

/// Where one occurrence of a logical operation sits in the flat text.
/// Both bounds are inclusive, 0-based symbol offsets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceLocation {
    pub logical_operation: LogicalOperation,
    pub begin_index: usize,
    pub end_index: usize,
}

/// One symbol of the flat text, tied back to the occurrence that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolLocation {
    pub logical_operation: LogicalOperation,
    pub symbol: Symbol,
    /// Offset in the flat text.
    pub text_index: usize,
    /// Offset inside the operation.
    pub operation_index: usize,
}

/// The result of a single `generate_text` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub text: Vec<Symbol>,
    pub size: usize,
    pub occurrences: Vec<OccurrenceLocation>,
    pub symbols: Vec<SymbolLocation>,
}

impl TextEntry {
    /// Operations in draw order.
    pub fn operations(&self) -> impl Iterator<Item = &LogicalOperation> {
        self.occurrences.iter().map(|occ| &occ.logical_operation)
    }
}

/// One `(user, operation)` line of a histogram.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistogramRow {
    pub logical_operation: LogicalOperation,
    pub cnt: usize,
    pub percentage: f64,
    pub user_id: UserId,
    /// Order in which the operation first showed up in the user's history.
    pub first_seen: usize,
}
