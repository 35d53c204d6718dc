//! Line-oriented command scripts.
//!
//! ```text
//! // comment
//! ADD_USER:: u1
//! SET_SESSION:: u1 :: s1
//! ADD_OPERATION:: u1 :: 0.7 :: a b
//! ADD_OPERATIONS:: u1 :: 0.5 :: a b | c d
//! DELETE_OPERATION:: u1 :: a b
//! DELETE_OPERATIONS:: u1 :: a b | c d
//! GENERATE_TEXT:: u1 :: 10
//! REMOVE_USER:: u1
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::command::Command;
use crate::error::ScriptError;
use crate::types::logical_operation::LogicalOperation;

static COMMAND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z_]+)::\s*(.*)$").expect("command line pattern is valid"));

pub fn parse_line_script(content: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_trailing_comment(raw_line.trim());
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        let caps = COMMAND_LINE.captures(line).ok_or_else(|| ScriptError::Line {
            line: line_no,
            message: format!("expected 'MARKER:: fields', got '{}'", line),
        })?;
        let marker = caps.get(1).map_or("", |m| m.as_str());
        let fields: Vec<&str> = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .split("::")
            .map(str::trim)
            .collect();

        let command = parse_fields(marker, &fields).map_err(|message| ScriptError::Line {
            line: line_no,
            message,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

fn strip_trailing_comment(line: &str) -> &str {
    match line.find(" //") {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

fn parse_fields(marker: &str, fields: &[&str]) -> Result<Command, String> {
    let arity = |n: usize| {
        if fields.len() == n {
            Ok(())
        } else {
            Err(format!("{} takes {} field(s), got {}", marker, n, fields.len()))
        }
    };

    let command = match marker {
        "ADD_USER" => {
            arity(1)?;
            Command::AddUser { user_id: fields[0].to_string() }
        }
        "REMOVE_USER" => {
            arity(1)?;
            Command::RemoveUser { user_id: fields[0].to_string() }
        }
        "SET_SESSION" => {
            arity(2)?;
            Command::SetSession {
                user_id: fields[0].to_string(),
                session_id: fields[1].to_string(),
            }
        }
        "ADD_OPERATION" => {
            arity(3)?;
            Command::AddLogicalOperation {
                user_id: fields[0].to_string(),
                score: parse_score(fields[1])?,
                logical_operation: parse_operation(fields[2]),
            }
        }
        "ADD_OPERATIONS" => {
            arity(3)?;
            Command::AddLogicalOperations {
                user_id: fields[0].to_string(),
                score: parse_score(fields[1])?,
                logical_operations: parse_operation_list(fields[2]),
            }
        }
        "DELETE_OPERATION" => {
            arity(2)?;
            Command::DeleteLogicalOperation {
                user_id: fields[0].to_string(),
                logical_operation: parse_operation(fields[1]),
            }
        }
        "DELETE_OPERATIONS" => {
            arity(2)?;
            Command::DeleteLogicalOperations {
                user_id: fields[0].to_string(),
                logical_operations: parse_operation_list(fields[1]),
            }
        }
        "GENERATE_TEXT" => {
            arity(2)?;
            Command::GenerateText {
                user_id: fields[0].to_string(),
                text_size: fields[1]
                    .parse()
                    .map_err(|e| format!("invalid text size '{}': {}", fields[1], e))?,
            }
        }
        other => return Err(format!("unknown command marker '{}'", other)),
    };
    Ok(command)
}

fn parse_score(raw: &str) -> Result<f64, String> {
    raw.parse().map_err(|e| format!("invalid score '{}': {}", raw, e))
}

fn parse_operation(raw: &str) -> LogicalOperation {
    LogicalOperation::new(raw.split_whitespace())
}

fn parse_operation_list(raw: &str) -> Vec<LogicalOperation> {
    raw.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_operation)
        .collect()
}
