//! CLI command implementations

pub mod invoke;
pub mod validate;

use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use crate::cli::error::CliError;

pub use invoke::{InvokeArgs, handle_invoke};
pub use validate::handle_validate;

/// Load input content from file or stdin (`-`)
pub fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::IoError(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        if !path.exists() {
            return Err(CliError::FileNotFound(path));
        }
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Parse an operation envelope from text
pub fn parse_event(content: &str) -> Result<Value, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::InvalidJson(e.to_string()))
}

/// Print the sample configuration
pub fn handle_sample_config() -> Result<(), CliError> {
    print!("{}", crate::config::sample_config());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_input_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"operation": "purge"}"#).unwrap();

        let content = load_input(path.to_str().unwrap()).unwrap();
        assert_eq!(parse_event(&content).unwrap()["operation"], "purge");
    }

    #[test]
    fn test_load_input_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(
            load_input(path.to_str().unwrap()),
            Err(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_parse_event_rejects_invalid_json() {
        assert!(matches!(parse_event("{"), Err(CliError::InvalidJson(_))));
    }
}
