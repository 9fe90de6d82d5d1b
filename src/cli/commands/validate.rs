//! Validate command implementation

use crate::cli::commands::{load_input, parse_event};
use crate::cli::error::CliError;
use crate::validation::parse_request;

/// Handle the validate command
///
/// Checks the envelope without building any client.
pub fn handle_validate(input: &str) -> Result<(), CliError> {
    let event = parse_event(&load_input(input)?)?;
    let request = parse_request(&event)?;

    println!("Validation successful: {}", request.operation());
    Ok(())
}
