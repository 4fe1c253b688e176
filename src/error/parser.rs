use serde::Serialize;

/// A grammar error recorded by the parser before it resynchronizes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[error("column {column}: {type}")]
pub struct ParseError {
	column: usize,
	r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(column: usize, r#type: ParseErrorType) -> Self { Self { column, r#type } }

	pub fn column(&self) -> usize { self.column }

	pub fn error_type(&self) -> &ParseErrorType { &self.r#type }

	pub fn message(&self) -> String { self.r#type.to_string() }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParseErrorType {
	ExpectedExpression,
	ExpectedLeftParen,
	ExpectedCommaOrRightParen,
	UnterminatedParenthesis,
	ExpectedBranchElement(String),
	UnterminatedBranch,
	OutsideOfBranch(String),
	MissingTerminator,
	NestingTooDeep,
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			ExpectedExpression => {
				write!(f, "Expected expression")
			}
			ExpectedLeftParen => {
				write!(f, "Expected '(' after instruction")
			}
			ExpectedCommaOrRightParen => {
				write!(f, "Expected ',' or ')' after parameter")
			}
			UnterminatedParenthesis => {
				write!(f, "Unterminated parenthesis")
			}
			ExpectedBranchElement(lexeme) => {
				write!(f, "Expected instruction or branch, found '{lexeme}'")
			}
			UnterminatedBranch => {
				write!(f, "Expected ']' to close branch")
			}
			OutsideOfBranch(lexeme) => {
				write!(f, "Unexpected '{lexeme}' outside of a branch")
			}
			MissingTerminator => {
				write!(f, "Expected ';' after rung")
			}
			NestingTooDeep => {
				write!(f, "Nesting too deep")
			}
		}
	}
}
