//! Expression AST nodes
//!
//! Parameters of an instruction are expressions, from a plain tag like
//! `Motor.Run` to a CMP-style formula like `ABS(Speed - 10) > Limit`.

use serde::Serialize;

use crate::scanner::Token;

/// Expression AST nodes, serialized with their variant name under `typ`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "typ")]
pub enum Expression<'a> {
	Number { value: f64 },
	String { value: &'a str },
	/// A reference to controller memory, optionally `\` prefixed for external scope.
	Tag { token: Token<'a> },
	/// The `?` and `??` placeholders of an operand left blank.
	Undefined { token: Token<'a> },
	Unary { operator: Token<'a>, right: Box<Expression<'a>> },
	Binary { left: Box<Expression<'a>>, operator: Token<'a>, right: Box<Expression<'a>> },
	Or { left: Box<Expression<'a>>, right: Box<Expression<'a>> },
	Xor { left: Box<Expression<'a>>, right: Box<Expression<'a>> },
	And { left: Box<Expression<'a>>, right: Box<Expression<'a>> },
	Func { name: Token<'a>, params: Vec<Expression<'a>> },
	Grouping { expression: Box<Expression<'a>> },
}

impl<'a> Expression<'a> {
	pub fn unary(operator: Token<'a>, right: Self) -> Self { Expression::Unary { operator, right: Box::new(right) } }

	pub fn binary(left: Self, operator: Token<'a>, right: Self) -> Self {
		Expression::Binary { left: Box::new(left), operator, right: Box::new(right) }
	}

	pub fn or(left: Self, right: Self) -> Self { Expression::Or { left: Box::new(left), right: Box::new(right) } }

	pub fn xor(left: Self, right: Self) -> Self { Expression::Xor { left: Box::new(left), right: Box::new(right) } }

	pub fn and(left: Self, right: Self) -> Self { Expression::And { left: Box::new(left), right: Box::new(right) } }

	pub fn func(name: Token<'a>, params: Vec<Self>) -> Self { Expression::Func { name, params } }

	pub fn grouping(expression: Self) -> Self { Expression::Grouping { expression: Box::new(expression) } }
}

impl std::fmt::Display for Expression<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use Expression::*;
		match self {
			Number { value } => write!(f, "{value}"),
			String { value } => write!(f, "'{value}'"),
			Tag { token } | Undefined { token } => write!(f, "{}", token.lexeme),
			Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
			Binary { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Or { left, right } => write!(f, "(OR {left} {right})"),
			Xor { left, right } => write!(f, "(XOR {left} {right})"),
			And { left, right } => write!(f, "(AND {left} {right})"),
			Func { name, params } => write!(
				f,
				"({} {})",
				name.lexeme,
				params.iter().map(|param| format!("{param}")).collect::<Vec<std::string::String>>().join(" ")
			),
			Grouping { expression } => write!(f, "(group {expression})"),
		}
	}
}
