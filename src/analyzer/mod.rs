//! Semantic checks over parsed rungs.
//!
//! Every instruction is looked up in a [`Catalog`], its parameter count and
//! parameter kinds are checked, and empty rungs or branches are pointed out.
//! Findings are returned as data, the analyzer itself never fails.

pub mod catalog;

use catalog::{Catalog, DEFAULT_CATALOG};
use log::debug;
use serde::Serialize;

use crate::parser::tree::{And, Branch, Instruction, Or, Rung};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warn,
	Info,
}

impl std::fmt::Display for Severity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Severity::Error => write!(f, "ERROR"),
			Severity::Warn => write!(f, "WARN"),
			Severity::Info => write!(f, "INFO"),
		}
	}
}

/// The instruction an observation is about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstructionRef<'a> {
	pub name:   &'a str,
	pub index:  usize,
	pub column: usize,
}

impl<'a> From<&Instruction<'a>> for InstructionRef<'a> {
	fn from(instruction: &Instruction<'a>) -> Self {
		Self { name: instruction.name, index: instruction.index, column: instruction.column }
	}
}

/// A single finding of the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation<'a> {
	pub level:       Severity,
	pub message:     String,
	/// Index of the rung, starting at 0.
	pub rung:        usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instruction: Option<InstructionRef<'a>>,
	/// Index of the offending parameter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parameter:   Option<usize>,
}

impl std::fmt::Display for Observation<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.instruction {
			Some(instruction) => write!(f, "Rung {}, {}: {}", self.rung, instruction.name, self.message),
			None => write!(f, "Rung {}: {}", self.rung, self.message),
		}
	}
}

/// Checks rungs against an instruction catalog.
pub struct Analyzer {
	catalog: Catalog,
}

impl Default for Analyzer {
	fn default() -> Self { Self::new(DEFAULT_CATALOG.clone()) }
}

impl Analyzer {
	pub fn new(catalog: Catalog) -> Self { Self { catalog } }

	pub fn catalog(&self) -> &Catalog { &self.catalog }

	/// Analyze the rungs in order, `None` if there is nothing to report.
	pub fn analyze<'a>(&self, rungs: &[Rung<'a>]) -> Option<Vec<Observation<'a>>> {
		let mut walk = Walk { catalog: &self.catalog, rung: 0, observations: Vec::new() };
		for (index, rung) in rungs.iter().enumerate() {
			walk.rung = index;
			if rung.logic.conditions.is_empty() {
				walk.warn("Empty rung".to_string(), None);
			} else {
				walk.and(&rung.logic);
			}
		}
		debug!("analyzed {} rungs with {} observations", rungs.len(), walk.observations.len());
		if walk.observations.is_empty() { None } else { Some(walk.observations) }
	}
}

/// Depth-first walk over one analysis call.
struct Walk<'c, 'a> {
	catalog:      &'c Catalog,
	rung:         usize,
	observations: Vec<Observation<'a>>,
}

impl<'a> Walk<'_, 'a> {
	fn branch(&mut self, branch: &Branch<'a>) {
		match branch {
			Branch::Instruction(instruction) => self.instruction(instruction),
			Branch::And(and) => self.and(and),
			Branch::Or(Or { conditions }) => conditions.iter().for_each(|condition| self.branch(condition)),
		}
	}

	fn and(&mut self, and: &And<'a>) {
		if and.conditions.is_empty() {
			self.warn("Empty branch".to_string(), None);
			return;
		}
		and.conditions.iter().for_each(|condition| self.branch(condition));
	}

	fn instruction(&mut self, instruction: &Instruction<'a>) {
		let reference = Some(InstructionRef::from(instruction));
		let catalog = self.catalog;
		let Some(spec) = catalog.get(instruction.name) else {
			self.error(format!("Unknown instruction '{}'!", instruction.name), reference, None);
			return;
		};

		if spec.parameters.len() != instruction.parameters.len() {
			self.error(
				format!(
					"Parameter length mismatch. Expected {} parameters got {}.",
					spec.parameters.len(),
					instruction.parameters.len()
				),
				reference,
				None,
			);
			return;
		}

		if let Some(message) = &spec.warn_message {
			self.warn(message.clone(), reference);
		}
		if let Some(message) = &spec.ban_message {
			self.warn(message.clone(), reference);
		}

		for (index, (parameter, expression)) in spec.parameters.iter().zip(&instruction.parameters).enumerate() {
			if let Some(message) = parameter.accept.check(expression, index, parameter.name.as_deref()) {
				self.error(message, reference, Some(index));
			}
		}
	}

	fn error(&mut self, message: String, instruction: Option<InstructionRef<'a>>, parameter: Option<usize>) {
		self.push(Severity::Error, message, instruction, parameter);
	}

	fn warn(&mut self, message: String, instruction: Option<InstructionRef<'a>>) {
		self.push(Severity::Warn, message, instruction, None);
	}

	fn push(
		&mut self,
		level: Severity,
		message: String,
		instruction: Option<InstructionRef<'a>>,
		parameter: Option<usize>,
	) {
		self.observations.push(Observation { level, message, rung: self.rung, instruction, parameter });
	}
}
