//! The `Scanner` uses the lexical grammar, its alphabet is characters and its
//! strings are tokens. The `Parser` uses the syntactic grammar, its alphabet is
//! tokens and its strings are rungs.
//!
//! Branch grammar:
//!
//! ``` BNF
//! rung        → and_branch ";" ;
//! and_branch  → ( instruction | or_branch )* ;
//! or_branch   → "[" and_branch ( "," and_branch )* "]" ;
//! instruction → INSTRUCTION "(" ( expression ( "," expression )* )? ")" ;
//! ```
//!
//! Instructions written next to each other are in series, there is no token
//! between them. An `and_branch` ends at `;`, `]` or `,`.
//!
//! |Name|Operators|Associates
//! --|--|--
//! Comparison|= <> < <= > >=|None
//! Or|OR|Left
//! Xor|XOR|Left
//! And|AND|Left
//! Term|+ -|Left
//! Factor|* /|Left
//! Unary|-|Right
//! Power|**|Right
//! Call|ABS SIN MOD ...|Left
//!
//! Expression grammar:
//!
//! ``` BNF
//! expression → equality ;
//! equality   → logic_or ( ( "=" | "<>" | "<" | "<=" | ">" | ">=" ) logic_or )? ;
//! logic_or   → logic_xor ( "OR" logic_xor )* ;
//! logic_xor  → logic_and ( "XOR" logic_and )* ;
//! logic_and  → term ( "AND" term )* ;
//! term       → factor ( ( "-" | "+" ) factor )* ;
//! factor     → unary ( ( "/" | "*" ) unary )* ;
//! unary      → "-" unary | power ;
//! power      → call ( "**" unary )? ;
//! call       → primary ( FUNCTION arguments )* ;
//! arguments  → "(" term ( "," term )* ")" | term ;
//! primary    → NUMBER | STRING | TAG | "?" | "??" | "(" expression ")" | FUNCTION arguments ;
//! ```

pub mod expression;
pub mod tree;

use std::{iter::Peekable, vec::IntoIter};

use ParseErrorType::*;
use TokenType::*;
use log::{debug, trace};

use crate::{
	LadderError,
	error::parser::{ParseError, ParseErrorType},
	parser::{
		expression::Expression,
		tree::{And, Branch, Or, Rung},
	},
	scanner::{Keyword, Token, TokenType},
};

/// Recursive descent parser turning tokens into rungs.
///
/// Grammar errors do not stop the parser: each one is recorded, the parser
/// skips past the end of the broken parameter list, or to the next `]` or
/// `;`, and carries on. The errors of the last
/// call are available through [`Parser::errors`].
pub struct Parser<'a> {
	/// The tokens to parse.
	tokens:            Peekable<IntoIter<Token<'a>>>,
	/// Column right after the last consumed token, where errors at the end of
	/// input are reported.
	end_column:        usize,
	/// Index the next instruction of the current rung gets.
	instruction_index: usize,
	/// Parentheses opened and not yet closed since the current instruction's
	/// parameter list started.
	paren_depth:       usize,
	/// Active `unary` and `or_branch` frames, bounded by [`MAX_NESTING`].
	nesting:           usize,
	errors:            Vec<ParseError>,
}

/// Deeper expressions or branches are reported instead of parsed.
pub const MAX_NESTING: usize = 64;

impl Default for Parser<'_> {
	fn default() -> Self { Self::new() }
}

impl<'a> Parser<'a> {
	pub fn new() -> Self {
		Self {
			tokens:            Vec::new().into_iter().peekable(),
			end_column:        0,
			instruction_index: 0,
			paren_depth:       0,
			nesting:           0,
			errors:            Vec::new(),
		}
	}

	/// Parse every rung of the token stream, recovering from grammar errors.
	pub fn parse(&mut self, tokens: Vec<Token<'a>>) -> Vec<Rung<'a>> {
		self.reset(tokens);
		let mut rungs = Vec::new();
		while self.peek().is_some() {
			if let Some(rung) = self.rung() {
				rungs.push(rung);
			}
		}
		debug!("parsed {} rungs with {} errors", rungs.len(), self.errors.len());
		rungs
	}

	/// Like [`Parser::parse`], but any grammar error fails the whole call.
	pub fn parse_strict(&mut self, tokens: Vec<Token<'a>>) -> Result<Vec<Rung<'a>>, LadderError> {
		let rungs = self.parse(tokens);
		if !self.errors.is_empty() {
			return Err(LadderError::ParserErrors(self.errors.len()));
		}
		Ok(rungs)
	}

	/// Errors of the most recent call, `None` if it had none.
	pub fn errors(&self) -> Option<&[ParseError]> {
		if self.errors.is_empty() { None } else { Some(&self.errors) }
	}

	fn reset(&mut self, tokens: Vec<Token<'a>>) {
		self.tokens = tokens.into_iter().peekable();
		self.end_column = 0;
		self.instruction_index = 0;
		self.paren_depth = 0;
		self.nesting = 0;
		self.errors.clear();
	}

	/// Parse one rung, up to and including its `;`.
	fn rung(&mut self) -> Option<Rung<'a>> {
		let mut conditions = Vec::new();
		loop {
			conditions.extend(self.and_conditions());
			match self.peek_type() {
				Some(Semicolon) => {
					self.advance();
					break;
				}
				None => {
					self.report(ParseError::new(self.end_column, MissingTerminator));
					if conditions.is_empty() {
						self.instruction_index = 0;
						return None;
					}
					break;
				}
				Some(_) => {
					// A `]` or `,` with no branch to close or continue.
					if let Some(token) = self.advance() {
						self.report(ParseError::new(token.column, OutsideOfBranch(token.lexeme.to_string())));
					}
				}
			}
		}
		self.instruction_index = 0;
		Some(Rung { logic: And::new(conditions).flatten() })
	}

	/// Parse the series connected elements of a branch.
	fn and_conditions(&mut self) -> Vec<Branch<'a>> {
		let mut conditions = Vec::new();
		while let Some(token) = self.peek().copied() {
			let element = match token.r#type {
				Semicolon | RightBracket | Comma => break,
				Instruction(_) => self.instruction().map(Branch::Instruction),
				LeftBracket => self.nested(|parser| Ok(parser.or_branch())),
				_ => Err(ParseError::new(token.column, ExpectedBranchElement(token.lexeme.to_string()))),
			};
			match element {
				Ok(branch) => conditions.push(branch),
				Err(error) => self.recover(error),
			}
		}
		conditions
	}

	fn and_branch(&mut self) -> Branch<'a> { And::new(self.and_conditions()).simplify() }

	/// Parse a bracketed list of parallel branches.
	fn or_branch(&mut self) -> Branch<'a> {
		self.advance(); // consume '['
		let mut conditions = vec![self.and_branch()];
		loop {
			match self.peek_type() {
				Some(Comma) => {
					self.advance();
					conditions.push(self.and_branch());
				}
				Some(RightBracket) => {
					self.advance();
					break;
				}
				_ => {
					let error = self.error_here(UnterminatedBranch);
					self.report(error);
					break;
				}
			}
		}
		Branch::Or(Or::new(conditions))
	}

	/// Parse an instruction with its parameter list.
	fn instruction(&mut self) -> Result<tree::Instruction<'a>, ParseError> {
		self.paren_depth = 0;
		let Some(name) = self.advance() else {
			return Err(self.error_here(ExpectedBranchElement(String::new())));
		};
		self.next_if(|t| matches!(t, LeftParen)).ok_or_else(|| self.error_here(ExpectedLeftParen))?;

		let mut parameters = Vec::new();
		if self.next_if(|t| matches!(t, RightParen)).is_none() {
			loop {
				parameters.push(self.expression()?);
				match self.peek_type() {
					Some(Comma) => {
						self.advance();
					}
					Some(RightParen) => {
						self.advance();
						break;
					}
					_ => return Err(self.error_here(ExpectedCommaOrRightParen)),
				}
			}
		}

		let index = self.instruction_index;
		self.instruction_index += 1;
		Ok(tree::Instruction { name: name.lexeme, index, column: name.column, parameters })
	}

	/// Parse an instruction parameter.
	fn expression(&mut self) -> Result<Expression<'a>, ParseError> { self.equality() }

	/// Parse a single, non-chaining comparison.
	fn equality(&mut self) -> Result<Expression<'a>, ParseError> {
		let left = self.logic_or()?;
		if let Some(operator) = self.next_if(TokenType::is_comparison) {
			let right = self.logic_or()?;
			return Ok(Expression::binary(left, operator, right));
		}
		Ok(left)
	}

	fn logic_or(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.logic_xor()?;
		while self.next_if(|t| matches!(t, Operator(Keyword::Or))).is_some() {
			expression = Expression::or(expression, self.logic_xor()?)
		}
		Ok(expression)
	}

	fn logic_xor(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.logic_and()?;
		while self.next_if(|t| matches!(t, Operator(Keyword::Xor))).is_some() {
			expression = Expression::xor(expression, self.logic_and()?)
		}
		Ok(expression)
	}

	fn logic_and(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.term()?;
		while self.next_if(|t| matches!(t, Operator(Keyword::And))).is_some() {
			expression = Expression::and(expression, self.term()?)
		}
		Ok(expression)
	}

	/// Parse term expressions.
	fn term(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.factor()?;
		while let Some(operator) = self.next_if(|t| matches!(t, Minus | Plus)) {
			expression = Expression::binary(expression, operator, self.factor()?)
		}
		Ok(expression)
	}

	/// Parse factor expressions.
	fn factor(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.unary()?;
		while let Some(operator) = self.next_if(|t| matches!(t, Slash | Star)) {
			expression = Expression::binary(expression, operator, self.unary()?)
		}
		Ok(expression)
	}

	/// Every nested expression passes through here, so this is where nesting
	/// is bounded.
	fn unary(&mut self) -> Result<Expression<'a>, ParseError> { self.nested(Self::negation) }

	/// Parse unary expressions, a minus in front of a number literal becomes
	/// part of the number.
	fn negation(&mut self) -> Result<Expression<'a>, ParseError> {
		if let Some(operator) = self.next_if(|t| matches!(t, Minus)) {
			return Ok(match self.unary()? {
				Expression::Number { value } => Expression::Number { value: -value },
				right => Expression::unary(operator, right),
			});
		}
		self.power()
	}

	fn power(&mut self) -> Result<Expression<'a>, ParseError> {
		let base = self.call()?;
		if let Some(operator) = self.next_if(|t| matches!(t, StarStar)) {
			return Ok(Expression::binary(base, operator, self.unary()?));
		}
		Ok(base)
	}

	/// Parse postfix function application, `A MOD 3` is `MOD(A, 3)`.
	fn call(&mut self) -> Result<Expression<'a>, ParseError> {
		let mut expression = self.primary()?;
		while let Some(name) = self.next_if(TokenType::is_function) {
			let mut params = vec![expression];
			params.extend(self.arguments()?);
			expression = Expression::func(name, params);
		}
		Ok(expression)
	}

	/// Parse function arguments, commas only separate them inside parentheses
	/// because outside they separate instruction parameters.
	fn arguments(&mut self) -> Result<Vec<Expression<'a>>, ParseError> {
		if self.next_if(|t| matches!(t, LeftParen)).is_none() {
			return Ok(vec![self.term()?]);
		}
		let mut arguments = vec![self.term()?];
		while self.next_if(|t| matches!(t, Comma)).is_some() {
			arguments.push(self.term()?);
		}
		self.next_if(|t| matches!(t, RightParen)).ok_or_else(|| self.error_here(UnterminatedParenthesis))?;
		Ok(arguments)
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> Result<Expression<'a>, ParseError> {
		let Some(token) = self.peek().copied() else {
			return Err(self.error_here(ExpectedExpression));
		};
		match token.r#type {
			NumberLiteral(value) => {
				self.advance();
				Ok(Expression::Number { value })
			}
			StringLiteral(value) => {
				self.advance();
				Ok(Expression::String { value })
			}
			Tag(_) => {
				self.advance();
				Ok(Expression::Tag { token })
			}
			Question | DoubleQuestion => {
				self.advance();
				Ok(Expression::Undefined { token })
			}
			LeftParen => {
				self.advance(); // consume '('
				let expression = self.expression()?;
				self.next_if(|t| matches!(t, RightParen)).ok_or_else(|| self.error_here(UnterminatedParenthesis))?;
				Ok(Expression::grouping(expression))
			}
			Operator(keyword) if keyword.is_function() => {
				self.advance();
				Ok(Expression::func(token, self.arguments()?))
			}
			_ => Err(ParseError::new(token.column, ExpectedExpression)),
		}
	}

	/// Consume the next token if its type satisfies the predicate.
	fn next_if(&mut self, predicate: impl FnOnce(&TokenType<'a>) -> bool) -> Option<Token<'a>> {
		let token = self.tokens.next_if(|token| predicate(&token.r#type))?;
		self.end_column = token.column + token.lexeme.len();
		match token.r#type {
			LeftParen => self.paren_depth += 1,
			RightParen => self.paren_depth = self.paren_depth.saturating_sub(1),
			_ => {}
		}
		Some(token)
	}

	/// Run one level of recursive parsing, failing once [`MAX_NESTING`] levels
	/// are active.
	fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
		if self.nesting >= MAX_NESTING {
			return Err(self.error_here(NestingTooDeep));
		}
		self.nesting += 1;
		let result = parse(self);
		self.nesting -= 1;
		result
	}

	/// Advance to the next token.
	fn advance(&mut self) -> Option<Token<'a>> { self.next_if(|_| true) }

	/// Peek at the current token.
	fn peek(&mut self) -> Option<&Token<'a>> { self.tokens.peek() }

	fn peek_type(&mut self) -> Option<TokenType<'a>> { self.peek().map(|token| token.r#type) }

	/// An error located at the current token, or at the end of input.
	fn error_here(&mut self, r#type: ParseErrorType) -> ParseError {
		let end_column = self.end_column;
		let column = self.peek().map_or(end_column, |token| token.column);
		ParseError::new(column, r#type)
	}

	fn report(&mut self, error: ParseError) {
		debug!("parse error: {error}");
		self.errors.push(error);
	}

	fn recover(&mut self, error: ParseError) {
		self.report(error);
		self.synchronize();
	}

	/// Skip to a synchronizing token. The `)` closing the abandoned parameter
	/// list is consumed, a `)` of a nested call or grouping is skipped like any
	/// other token. `]` and `;` belong to the enclosing branch or rung.
	fn synchronize(&mut self) {
		while let Some(token) = self.peek_type() {
			match token {
				RightParen => {
					self.advance();
					if self.paren_depth == 0 {
						break;
					}
				}
				RightBracket | Semicolon => {
					self.paren_depth = 0;
					break;
				}
				_ => {
					self.advance();
				}
			}
		}
		trace!("synchronized at column {}", self.end_column);
	}
}
