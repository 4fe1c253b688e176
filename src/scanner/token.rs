use serde::Serialize;

/// A token produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token<'a> {
	pub r#type: TokenType<'a>,
	pub lexeme: &'a str,
	/// Byte offset of the first character from the start of the source.
	pub column: usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType<'a>, lexeme: &'a str, column: usize) -> Self { Self { r#type, lexeme, column } }
}

/// The different kinds of ladder-logic tokens, the copying is lightweight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TokenType<'a> {
	/// Instruction name, e.g. `XIC`, always followed by `(`.
	Instruction(&'a str),
	/// Tag reference, e.g. `Motor.Run` or `\Remote:I.Data[0]`.
	Tag(&'a str),
	/// String literal, the value is the text between the quotes.
	StringLiteral(&'a str),
	/// Number literal, e.g. `12` or `0.5`.
	NumberLiteral(f64),
	/// Left bracket `[`, opens a parallel branch.
	LeftBracket,
	/// Right bracket `]`.
	RightBracket,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Semicolon `;`, ends a rung.
	Semicolon,
	/// Comma `,`.
	Comma,
	/// Undefined operand `?`.
	Question,
	/// Undefined operand `??`.
	DoubleQuestion,
	/// Equal `=`.
	Equal,
	/// Not equal `<>`.
	NotEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Asterisk `*`.
	Star,
	/// Power `**`.
	StarStar,
	/// Slash `/`.
	Slash,
	/// Minus `-`.
	Minus,
	/// Plus `+`.
	Plus,
	/// Expression keyword such as `AND` or `SIN`, tokenized as an operator
	/// rather than as a tag.
	Operator(Keyword),
}

impl TokenType<'_> {
	pub fn is_comparison(&self) -> bool {
		use TokenType::*;
		matches!(self, Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual)
	}

	/// Whether the token is a keyword applied as a function rather than a
	/// logical combinator.
	pub fn is_function(&self) -> bool { matches!(self, TokenType::Operator(k) if k.is_function()) }
}

/// Expression keywords, see the CMP instruction help for their meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
	And,
	Or,
	Xor,
	Abs,
	Acs,
	Asn,
	Atn,
	Cos,
	Deg,
	Frd,
	Ln,
	Log,
	Rad,
	Sin,
	Sqr,
	Tan,
	Ton,
	Trn,
	Mod,
	Not,
}

impl Keyword {
	/// Exact, case-sensitive match of an identifier against the keyword set.
	pub fn from_lexeme(value: &str) -> Option<Self> {
		use Keyword::*;
		Some(match value {
			"AND" => And,
			"OR" => Or,
			"XOR" => Xor,
			"ABS" => Abs,
			"ACS" => Acs,
			"ASN" => Asn,
			"ATN" => Atn,
			"COS" => Cos,
			"DEG" => Deg,
			"FRD" => Frd,
			"LN" => Ln,
			"LOG" => Log,
			"RAD" => Rad,
			"SIN" => Sin,
			"SQR" => Sqr,
			"TAN" => Tan,
			"TON" => Ton,
			"TRN" => Trn,
			"MOD" => Mod,
			"NOT" => Not,
			_ => return None,
		})
	}

	pub fn is_function(&self) -> bool { !matches!(self, Keyword::And | Keyword::Or | Keyword::Xor) }
}

impl<'a> TokenType<'a> {
	pub fn keyword_or_tag(value: &'a str) -> Self {
		match Keyword::from_lexeme(value) {
			Some(keyword) => TokenType::Operator(keyword),
			None => TokenType::Tag(value),
		}
	}
}
