//! Invoke command implementation

use std::path::PathBuf;
use tracing::debug;

use crate::cli::commands::{load_input, parse_event};
use crate::cli::error::CliError;
use crate::config::HandlerConfig;
use crate::handler::{Response, handle_event_with_config};
use crate::validation::parse_request;

/// Invoke command arguments
#[derive(Debug, Clone)]
pub struct InvokeArgs {
    /// Envelope file path or `-` for stdin
    pub input: String,
    /// Configuration file; `.s3-lineage-sync.toml` in the working directory when unset
    pub config: Option<PathBuf>,
    /// Pretty-print the response
    pub pretty: bool,
}

fn resolve_config_path(args: &InvokeArgs) -> Option<PathBuf> {
    args.config.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|dir| HandlerConfig::find_in(&dir))
    })
}

fn render(response: &Response, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    rendered.map_err(|e| CliError::IoError(format!("Failed to serialize response: {}", e)))
}

/// Handle the invoke command
pub fn handle_invoke(args: &InvokeArgs) -> Result<(), CliError> {
    let event = parse_event(&load_input(&args.input)?)?;

    // an invalid envelope never reaches configuration or the network
    let request = parse_request(&event)?;
    debug!(operation = request.operation(), "request is valid");

    let config_path = resolve_config_path(args);
    debug!(config = ?config_path, "loading configuration");
    let config = HandlerConfig::load(config_path.as_deref())?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::IoError(format!("Failed to create runtime: {}", e)))?;

    let response = rt.block_on(handle_event_with_config(&config, &event))?;

    println!("{}", render(&response, args.pretty)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::OperationResult;

    #[test]
    fn test_render_compact_and_pretty() {
        let response = Response::ok(
            "upsert_s3_connection",
            OperationResult::S3ConnectionGuid("g".into()),
        );
        let compact = render(&response, false).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = render(&response, true).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&pretty).unwrap()["body"]["s3_connection_guid"],
            "g"
        );
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = InvokeArgs {
            input: "-".into(),
            config: Some(PathBuf::from("custom.toml")),
            pretty: false,
        };
        assert_eq!(resolve_config_path(&args), Some(PathBuf::from("custom.toml")));
    }
}
