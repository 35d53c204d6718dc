use serde::{Deserialize, Deserializer};

use crate::error::SimulationError;
use crate::simulation::engine::SimulationEngine;
use crate::types::logical_operation::{LogicalOperation, SessionId, UserId};

/// One scripted operation against the engine.
///
/// The serde layout matches the JSON script format:
/// `{"operation": "add_user", "data": {"user_id": "u1"}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", content = "data", rename_all = "snake_case", deny_unknown_fields)]
pub enum Command {
    AddUser {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
    },
    RemoveUser {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
    },
    SetSession {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        #[serde(deserialize_with = "deserialize_id")]
        session_id: SessionId,
    },
    AddLogicalOperation {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        logical_operation: LogicalOperation,
        score: f64,
    },
    AddLogicalOperations {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        logical_operations: Vec<LogicalOperation>,
        score: f64,
    },
    DeleteLogicalOperation {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        logical_operation: LogicalOperation,
    },
    DeleteLogicalOperations {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        logical_operations: Vec<LogicalOperation>,
    },
    GenerateText {
        #[serde(deserialize_with = "deserialize_id")]
        user_id: UserId,
        text_size: usize,
    },
}

/// Ids may be written as strings or integers; both end up as strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

impl Command {
    /// The operation name used in scripts and logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Command::AddUser { .. } => "add_user",
            Command::RemoveUser { .. } => "remove_user",
            Command::SetSession { .. } => "set_session",
            Command::AddLogicalOperation { .. } => "add_logical_operation",
            Command::AddLogicalOperations { .. } => "add_logical_operations",
            Command::DeleteLogicalOperation { .. } => "delete_logical_operation",
            Command::DeleteLogicalOperations { .. } => "delete_logical_operations",
            Command::GenerateText { .. } => "generate_text",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Command::AddUser { user_id }
            | Command::RemoveUser { user_id }
            | Command::SetSession { user_id, .. }
            | Command::AddLogicalOperation { user_id, .. }
            | Command::AddLogicalOperations { user_id, .. }
            | Command::DeleteLogicalOperation { user_id, .. }
            | Command::DeleteLogicalOperations { user_id, .. }
            | Command::GenerateText { user_id, .. } => user_id,
        }
    }

    /// Payload shape checks: non-blank ids and non-empty operation lists.
    /// Domain rules (known users, non-negative scores, non-empty
    /// operations) are left to the engine.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id().trim().is_empty() {
            return Err("user_id must not be empty".to_string());
        }
        match self {
            Command::SetSession { session_id, .. } if session_id.trim().is_empty() => {
                Err("session_id must not be empty".to_string())
            }
            Command::AddLogicalOperations { logical_operations, .. }
            | Command::DeleteLogicalOperations { logical_operations, .. }
                if logical_operations.is_empty() =>
            {
                Err("logical_operations must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn execute(&self, engine: &mut SimulationEngine) -> Result<(), SimulationError> {
        match self {
            Command::AddUser { user_id } => engine.add_user(user_id.clone()),
            Command::RemoveUser { user_id } => engine.remove_user(user_id),
            Command::SetSession { user_id, session_id } => {
                engine.set_session(user_id, session_id.clone())
            }
            Command::AddLogicalOperation {
                user_id,
                logical_operation,
                score,
            } => engine.add_operation(user_id, logical_operation.clone(), *score),
            Command::AddLogicalOperations {
                user_id,
                logical_operations,
                score,
            } => engine.add_operations(user_id, logical_operations.iter().cloned(), *score),
            Command::DeleteLogicalOperation {
                user_id,
                logical_operation,
            } => engine.remove_operation(user_id, logical_operation),
            Command::DeleteLogicalOperations {
                user_id,
                logical_operations,
            } => engine.remove_operations(user_id, logical_operations),
            Command::GenerateText { user_id, text_size } => {
                engine.generate_text(user_id, *text_size).map(|_| ())
            }
        }
    }
}
