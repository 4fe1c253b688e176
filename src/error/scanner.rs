use serde::Serialize;

/// Scanner related errors
#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
	/// Internal scanner error, should never happen
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
	/// Errors encountered during scanning
	#[error(transparent)]
	ScanError(#[from] ScanError),
}

/// A specific scanning error with its column span and type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[error("column {start}: {type}")]
pub struct ScanError {
	/// The column where the offending text starts.
	start:  usize,
	/// The column where the offending text ends.
	end:    usize,
	/// The type of scanning error.
	r#type: ScanErrorType,
}

impl ScanError {
	pub fn new(start: usize, end: usize, r#type: ScanErrorType) -> Self { Self { start, end, r#type } }

	pub fn start_column(&self) -> usize { self.start }

	pub fn end_column(&self) -> usize { self.end }

	pub fn error_type(&self) -> &ScanErrorType { &self.r#type }

	/// The human readable message without the column prefix.
	pub fn message(&self) -> String { self.r#type.to_string() }
}

/// Types of scanning errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScanErrorType {
	/// An instruction name was not immediately followed by `(`.
	ExpectedLeftParen,
	/// A character that cannot start any token here.
	UnexpectedCharacter(char),
	/// A `'` without its closing quote.
	UnterminatedString,
	/// Input ended before the parameter list was closed.
	UnfinishedParameters,
}

impl std::fmt::Display for ScanErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ScanErrorType::*;
		match self {
			ExpectedLeftParen => {
				write!(f, "Expected '(' after instruction")
			}
			UnexpectedCharacter(c) => {
				write!(f, "Unexpected token '{c}'!")
			}
			UnterminatedString => {
				write!(f, "Unterminated string literal")
			}
			UnfinishedParameters => {
				write!(f, "Unfinished parameters")
			}
		}
	}
}
