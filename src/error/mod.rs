pub mod parser;
pub mod scanner;

use scanner::ScanError;

/// LadderError is the top-level error type for the ladder-logic front end.
#[derive(thiserror::Error, Debug)]
pub enum LadderError {
	/// Internal scanner/parser error, should never happen
	#[error("InternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Lexical errors, scanning is all-or-nothing so no tokens come with them
	#[error("ScannerErrors:\n{}", display_scan_errors(.0))]
	ScannerErrors(Vec<ScanError>),
	/// Grammar errors accumulated during parsing
	#[error("Generated {0} parser errors")]
	ParserErrors(usize),
	/// The configuration text could not be deserialized
	#[error("Invalid configuration: {0}")]
	Config(#[from] serde_json::Error),
}

fn display_scan_errors(errors: &[ScanError]) -> String {
	errors.iter().map(|e| format!("{e}")).collect::<Vec<String>>().join("\n")
}
