//! Turns rung text into tokens.
//!
//! Rung text has two lexical modes. Outside of a parameter list the only
//! things allowed are branch punctuation (`[`, `]`, `,`), the rung terminator
//! `;` and instruction names, and an instruction name must be immediately
//! followed by `(`. That `(` switches the scanner into the parameter mode,
//! where tags, literals, operators and expression keywords live. A depth
//! counter follows nested parentheses so that `CMP(ABS(A)>5)` only leaves the
//! parameter mode at the last `)`.
//!
//! Scanning is all-or-nothing: if any error is recorded the caller gets every
//! error and no tokens.
mod token;

use std::{iter::Peekable, str::CharIndices};

use ScanErrorType::*;
use TokenType::*;
use anyhow::Context;
use log::debug;
pub use token::*;

use crate::{
	LadderError, ScanError, ScanErrorType, ScannerError,
	config::ScannerConfig,
	utils::{is_identifier_body, is_tag_body, is_tag_start},
};

/// A scanner for ladder-logic rung text.
///
/// The scanner can be reused, every call to [`Scanner::scan`] starts from a
/// clean state.
pub struct Scanner<'a> {
	config:       ScannerConfig,
	/// Rung text being scanned
	source:       &'a str,
	/// Rung text iterator
	source_iter:  Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:        usize,
	/// Points just past the character last consumed
	cursor:       usize,
	/// Parenthesis depth inside a parameter list, zero outside of one
	depth:        usize,
	/// Column right after the `(` that opened the current parameter list
	params_start: usize,
	errors:       Vec<ScanError>,
}

impl Default for Scanner<'_> {
	fn default() -> Self { Self::new(ScannerConfig::default()) }
}

impl<'a> Scanner<'a> {
	pub fn new(config: ScannerConfig) -> Self {
		Self {
			config,
			source: "",
			source_iter: "".char_indices().peekable(),
			start: 0,
			cursor: 0,
			depth: 0,
			params_start: 0,
			errors: Vec::new(),
		}
	}

	/// Scan all tokens from the rung text
	pub fn scan(&mut self, source: &'a str) -> Result<Vec<Token<'a>>, LadderError> {
		self.reset(source);
		let mut tokens = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			let result =
				if self.depth > 0 { self.scan_parameter_token(&mut tokens) } else { self.scan_token(&mut tokens) };
			match result {
				Err(ScannerError::ScanError(e)) => self.report(e),
				Err(ScannerError::InternalError(e)) => {
					return Err(e.into());
				}
				Ok(_) => {}
			}
		}
		if self.depth > 0 {
			self.report(ScanError::new(self.params_start, self.source.len(), UnfinishedParameters));
		}
		if !self.errors.is_empty() {
			return Err(LadderError::ScannerErrors(std::mem::take(&mut self.errors)));
		}
		debug!("scanned {} tokens", tokens.len());
		Ok(tokens)
	}

	fn reset(&mut self, source: &'a str) {
		self.source = source;
		self.source_iter = source.char_indices().peekable();
		self.start = 0;
		self.cursor = 0;
		self.depth = 0;
		self.params_start = 0;
		self.errors.clear();
	}

	fn report(&mut self, error: ScanError) {
		debug!("scan error: {error}");
		self.errors.push(error);
	}

	/// Scan a single token outside of a parameter list
	fn scan_token(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected end of input")?;
		let r#type = match next_char {
			'[' => LeftBracket,
			']' => RightBracket,
			',' => Comma,
			';' => Semicolon,
			c if c.is_whitespace() => return Ok(()),
			c if c.is_ascii_alphabetic() => return self.instruction(tokens),
			c => return Err(ScanError::new(self.start, self.start, UnexpectedCharacter(c)).into()),
		};
		self.add_token(tokens, r#type);
		Ok(())
	}

	/// Scan a single token inside of a parameter list
	fn scan_parameter_token(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected end of input")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => { self.depth += 1; LeftParen }
			')' => { self.depth -= 1; RightParen }
			',' => Comma,
			'+' => Plus,
			'-' => Minus,
			'/' => Slash,
			'=' => Equal,
			'*' => if self.match_next('*') { StarStar } else { Star },
			'?' => if self.match_next('?') { DoubleQuestion } else { Question },
			'<' => if self.match_next('=') { LessEqual } else if self.match_next('>') { NotEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'\'' => self.string()?,
			'\\' => self.tag()?,
			c if c.is_whitespace() => return Ok(()),
			c if c.is_ascii_digit() => self.number()?,
			c if is_tag_start(c) => self.tag()?,
			c => return Err(ScanError::new(self.start, self.start, UnexpectedCharacter(c)).into()),
		};
		self.add_token(tokens, r#type);
		Ok(())
	}

	fn add_token(&self, tokens: &mut Vec<Token<'a>>, r#type: TokenType<'a>) {
		tokens.push(Token::new(r#type, &self.source[self.start..self.cursor], self.start));
	}

	/// Scan an instruction name and the `(` that must follow it
	fn instruction(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), ScannerError> {
		while self.peek().is_some_and(is_identifier_body) {
			self.advance();
		}
		let name = &self.source[self.start..self.cursor];
		self.add_token(tokens, Instruction(name));

		if self.peek() != Some('(') {
			let column = self.cursor;
			// Skip one character so the next lexeme starts past the culprit.
			self.advance();
			return Err(ScanError::new(column, column, ExpectedLeftParen).into());
		}
		self.start = self.cursor;
		self.advance();
		self.add_token(tokens, LeftParen);
		self.depth = 1;
		self.params_start = self.cursor;
		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Scan a single-quoted string literal, there are no escape sequences
	fn string(&mut self) -> Result<TokenType<'a>, ScannerError> {
		while self.peek().is_some_and(|c| c != '\'') {
			self.advance();
		}

		self.peek().ok_or_else(|| ScanError::new(self.start, self.cursor, UnterminatedString))?;
		self.advance(); // The closing '
		let value = &self.source[self.start + 1..self.cursor - 1];
		Ok(StringLiteral(value))
	}

	/// Scan a number literal
	fn number(&mut self) -> Result<TokenType<'a>, ScannerError> {
		self.digits();

		// Look for a fractional part.
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			self.digits();
		}

		if self.config.exponent_numbers && matches!(self.peek(), Some('e' | 'E')) {
			let mut lookahead = self.source_iter.clone();
			lookahead.next();
			let signed = matches!(lookahead.peek(), Some(&(_, '+' | '-')));
			if signed {
				lookahead.next();
			}
			if lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
				self.advance(); // consume 'e'
				if signed {
					self.advance();
				}
				self.digits();
			}
		}

		let s = &self.source[self.start..self.cursor];
		Ok(NumberLiteral(s.parse().context("Failed to parse number literal")?))
	}

	fn digits(&mut self) {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}
	}

	/// Scan a tag or an expression keyword
	fn tag(&mut self) -> Result<TokenType<'a>, ScannerError> {
		let external = self.source[self.start..].starts_with('\\');
		if external && !self.peek().is_some_and(is_tag_start) {
			return Err(ScanError::new(self.start, self.start, UnexpectedCharacter('\\')).into());
		}
		while self.peek().is_some_and(is_tag_body) {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		Ok(if external { Tag(text) } else { TokenType::keyword_or_tag(text) })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str, ok: bool) {
		let mut scanner = Scanner::default();
		let result = scanner.scan(input);
		assert!(result.is_ok() == ok, "{input}: {result:?}");
	}

	fn types(input: &str) -> Vec<TokenType<'_>> {
		let mut scanner = Scanner::default();
		scanner.scan(input).unwrap().into_iter().map(|t| t.r#type).collect()
	}

	fn errors(input: &str) -> Vec<ScanError> {
		let mut scanner = Scanner::default();
		match scanner.scan(input) {
			Err(LadderError::ScannerErrors(errors)) => errors,
			other => panic!("expected scanner errors for {input}, got {other:?}"),
		}
	}

	#[test]
	fn scan_rungs() {
		scan("", true);
		scan(";", true);
		scan("NOP();", true);
		scan("XIC(Tag)OTE(Tag3);", true);
		scan("[XIC(A),XIO(B)]OTE(C);", true);
		scan("XIC(A)\n  OTE(B);\r\n", true);
		scan("XIC;", false);
		scan("XIC(;", false);
		scan("(A);", false);
		scan("XIC(A)@", false);
	}

	#[test]
	fn scan_instruction_then_tag() {
		let mut scanner = Scanner::default();
		let tokens = scanner.scan("XIC(Tag)OTE(Tag3);").unwrap();
		let expected = [
			(Instruction("XIC"), "XIC", 0),
			(LeftParen, "(", 3),
			(Tag("Tag"), "Tag", 4),
			(RightParen, ")", 7),
			(Instruction("OTE"), "OTE", 8),
			(LeftParen, "(", 11),
			(Tag("Tag3"), "Tag3", 12),
			(RightParen, ")", 16),
			(Semicolon, ";", 17),
		];
		assert_eq!(tokens.len(), expected.len());
		for (token, (r#type, lexeme, column)) in tokens.iter().zip(expected) {
			assert_eq!(token.r#type, r#type);
			assert_eq!(token.lexeme, lexeme);
			assert_eq!(token.column, column);
		}
	}

	#[test]
	fn scan_missing_left_paren() {
		let errors = errors("XIC;");
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].message(), "Expected '(' after instruction");
		assert_eq!(errors[0].start_column(), 3);
		assert_eq!(errors[0].end_column(), 3);
	}

	#[test]
	fn scan_unfinished_parameters() {
		let errors = errors("XIC(;");
		assert_eq!(errors, vec![
			ScanError::new(4, 4, UnexpectedCharacter(';')),
			ScanError::new(4, 5, UnfinishedParameters),
		]);
	}

	#[test]
	fn scan_unterminated_string() {
		let errors = errors("MOV('abc,Dest);");
		assert_eq!(errors[0], ScanError::new(4, 15, UnterminatedString));
		assert_eq!(errors[1].error_type(), &UnfinishedParameters);
	}

	#[test]
	fn scan_literals() {
		assert_eq!(types("MOV(-10,'twenty')"), vec![
			Instruction("MOV"),
			LeftParen,
			Minus,
			NumberLiteral(10.0),
			Comma,
			StringLiteral("twenty"),
			RightParen,
		]);
		assert_eq!(types("MOV(0.25,A)")[2], NumberLiteral(0.25));
		scan("MOV(1.,A)", false);
	}

	#[test]
	fn scan_string_keeps_quotes_in_lexeme() {
		let mut scanner = Scanner::default();
		let tokens = scanner.scan("EQU('twenty','four')").unwrap();
		assert_eq!(tokens[2].lexeme, "'twenty'");
		assert_eq!(tokens[2].r#type, StringLiteral("twenty"));
		assert_eq!(tokens[4].column, 13);
	}

	#[test]
	fn scan_tags() {
		assert_eq!(types("XIC(Local:1:I.Data[3].0)")[2], Tag("Local:1:I.Data[3].0"));
		assert_eq!(types("XIC(\\Remote.Run)")[2], Tag("\\Remote.Run"));
		assert_eq!(types("XIC(_hidden)")[2], Tag("_hidden"));
		scan("XIC(\\1)", false);
	}

	#[test]
	fn scan_keywords_and_operators() {
		assert_eq!(types("CMP(A AND B OR C XOR NOT D)"), vec![
			Instruction("CMP"),
			LeftParen,
			Tag("A"),
			Operator(Keyword::And),
			Tag("B"),
			Operator(Keyword::Or),
			Tag("C"),
			Operator(Keyword::Xor),
			Operator(Keyword::Not),
			Tag("D"),
			RightParen,
		]);
		let comparisons: Vec<_> = types("CMP(A<>B<=C>=D<E>F=G)").into_iter().filter(TokenType::is_comparison).collect();
		assert_eq!(comparisons, vec![NotEqual, LessEqual, GreaterEqual, Less, Greater, Equal]);
		assert_eq!(types("CMP(A**2*B/C+D-E)")[3..12], [StarStar, NumberLiteral(2.0), Star, Tag("B"), Slash, Tag("C"), Plus, Tag("D"), Minus]);
	}

	#[test]
	fn scan_nested_parameter_lists() {
		let types = types("CMP(ABS(A - (B * 2)) ** 2 > 5)XIC(C);");
		assert_eq!(types.iter().filter(|t| **t == RightParen).count(), 4);
		assert_eq!(types[types.len() - 5], Instruction("XIC"));
		assert_eq!(types.last(), Some(&Semicolon));
	}

	#[test]
	fn scan_undefined_operands() {
		assert_eq!(types("FSC(A,?,??)")[4..7], [Question, Comma, DoubleQuestion]);
	}

	#[test]
	fn scan_exponent_is_opt_in() {
		assert_eq!(types("MOV(1e5,A)")[2..4], [NumberLiteral(1.0), Tag("e5")]);

		let mut scanner = Scanner::new(ScannerConfig { exponent_numbers: true });
		let tokens = scanner.scan("MOV(1.5e-3,A)").unwrap();
		assert_eq!(tokens[2].r#type, NumberLiteral(1.5e-3));
		assert_eq!(tokens[2].lexeme, "1.5e-3");
		let tokens = scanner.scan("MOV(2E,A)").unwrap();
		assert_eq!(tokens[2].r#type, NumberLiteral(2.0));
		assert_eq!(tokens[3].r#type, Tag("E"));
	}

	#[test]
	fn scan_resets_between_calls() {
		let mut scanner = Scanner::default();
		assert!(scanner.scan("XIC(A").is_err());
		let tokens = scanner.scan("OTE(B);").unwrap();
		assert_eq!(tokens.len(), 5);
		assert_eq!(tokens[0].column, 0);
		assert!(scanner.scan("XIC;").is_err());
		let again = scanner.scan("OTE(B);").unwrap();
		assert_eq!(tokens, again);
	}

	#[test]
	fn scan_columns_never_decrease() {
		let mut scanner = Scanner::default();
		let tokens = scanner.scan("[XIC(A) ,XIO( B )] MOV( 'x' , Dest[1] ) ;").unwrap();
		assert!(tokens.windows(2).all(|w| w[0].column <= w[1].column));
	}
}
