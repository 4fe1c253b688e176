use log::debug;
use serde::Serialize;

use crate::{
	LadderError,
	analyzer::{Analyzer, Observation, Severity, catalog::Catalog},
	config::{Config, ScannerConfig},
	error::parser::ParseError,
	parser::{Parser, tree::Rung},
	scanner::{Scanner, Token},
};

/// Runs the scanner, the parser and the analyzer over rung text.
pub struct Ladder {
	scanner:  ScannerConfig,
	analyzer: Analyzer,
}

/// Everything found while checking a piece of rung text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<'a> {
	pub tokens:       Vec<Token<'a>>,
	pub rungs:        Vec<Rung<'a>>,
	pub parse_errors: Vec<ParseError>,
	pub observations: Vec<Observation<'a>>,
}

impl Report<'_> {
	/// Whether there are parse errors or error level observations.
	pub fn has_errors(&self) -> bool {
		!self.parse_errors.is_empty() || self.observations.iter().any(|o| o.level == Severity::Error)
	}
}

impl Default for Ladder {
	fn default() -> Self { Self::new(Config::default()) }
}

impl Ladder {
	pub fn new(config: Config) -> Self {
		Self { scanner: config.scanner, analyzer: Analyzer::new(Catalog::from_config(&config.analyzer)) }
	}

	/// Build from a JSON configuration.
	pub fn from_json(text: &str) -> Result<Self, LadderError> { Ok(Self::new(Config::from_json(text)?)) }

	/// Check the rung text.
	///
	/// Lexical errors fail the call. Grammar errors don't, the rungs that
	/// could be assembled are still analyzed and the errors are part of the
	/// report.
	pub fn check<'a>(&self, source: &'a str) -> Result<Report<'a>, LadderError> {
		let tokens = Scanner::new(self.scanner).scan(source)?;
		let mut parser = Parser::new();
		let rungs = parser.parse(tokens.clone());
		let parse_errors = parser.errors().map(<[ParseError]>::to_vec).unwrap_or_default();
		let observations = self.analyzer.analyze(&rungs).unwrap_or_default();
		debug!(
			"checked {} tokens, {} rungs, {} parse errors, {} observations",
			tokens.len(),
			rungs.len(),
			parse_errors.len(),
			observations.len()
		);
		Ok(Report { tokens, rungs, parse_errors, observations })
	}
}
