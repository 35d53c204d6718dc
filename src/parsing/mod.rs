pub mod command;
pub mod line_parser;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ScriptError;
pub use command::Command;
pub use line_parser::parse_line_script;

/// Decodes a JSON script: a top-level array of tagged commands.
pub fn parse_json_script(content: &str) -> Result<Vec<Command>, ScriptError> {
    Ok(serde_json::from_str(content)?)
}

/// Runs every command's shape check, reporting the first failure.
pub fn validate_commands(commands: &[Command]) -> Result<(), ScriptError> {
    for (index, command) in commands.iter().enumerate() {
        command.validate().map_err(|message| ScriptError::InvalidCommand {
            index,
            operation: command.operation(),
            message,
        })?;
    }
    Ok(())
}

/// Reads and validates a script. `.json` files use the JSON format, anything
/// else the line format.
pub fn load_script(path: &Path) -> Result<Vec<Command>, ScriptError> {
    info!(path = %path.display(), "reading commands");
    let content = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let commands = if is_json {
        parse_json_script(&content)?
    } else {
        parse_line_script(&content)?
    };

    validate_commands(&commands)?;
    Ok(commands)
}
