use std::fmt;

use serde::{Deserialize, Serialize};

pub type Symbol = String;
pub type UserId = String;
pub type SessionId = String;

/// An ordered run of symbols sampled as one unit.
///
/// Equality, hashing and ordering all go through the symbol sequence, so two
/// operations built from the same symbols are the same vocabulary key. The
/// derived `Ord` is lexicographic over the symbols, which is what the
/// population histogram sorts by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalOperation(Vec<Symbol>);

impl LogicalOperation {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        LogicalOperation(symbols.into_iter().map(Into::into).collect())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Symbol>> for LogicalOperation {
    fn from(symbols: Vec<Symbol>) -> Self {
        LogicalOperation(symbols)
    }
}

impl From<&[&str]> for LogicalOperation {
    fn from(symbols: &[&str]) -> Self {
        LogicalOperation::new(symbols.iter().copied())
    }
}

impl fmt::Display for LogicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
