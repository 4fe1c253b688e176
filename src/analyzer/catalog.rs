//! Instruction catalog, the table the analyzer checks instructions against.

use std::collections::HashMap;

use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{config::AnalyzerConfig, parser::expression::Expression};

/// Built-in instructions, built on first use.
pub static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// Which expressions a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accept {
	Tag,
	Number,
	NumberOrTag,
	StringOrTag,
	/// Numbers, strings and tags.
	Comparable,
	/// Anything but a string.
	Expression,
	/// Numbers and the `?`/`??` placeholders.
	NumberOrUndefined,
}

impl Accept {
	/// Check a parameter, returning the message to report when it is rejected.
	///
	/// `name` is the display name of the parameter, `Operand <index>` is used
	/// when there is none.
	pub fn check(self, expression: &Expression, index: usize, name: Option<&str>) -> Option<String> {
		use Expression as E;
		let accepted = match self {
			Accept::Tag => matches!(expression, E::Tag { .. }),
			Accept::Number => matches!(expression, E::Number { .. }),
			Accept::NumberOrTag => matches!(expression, E::Number { .. } | E::Tag { .. }),
			Accept::StringOrTag => matches!(expression, E::String { .. } | E::Tag { .. }),
			Accept::Comparable => matches!(expression, E::Number { .. } | E::String { .. } | E::Tag { .. }),
			Accept::Expression => !matches!(expression, E::String { .. }),
			Accept::NumberOrUndefined => matches!(expression, E::Number { .. } | E::Undefined { .. }),
		};
		if accepted {
			return None;
		}

		let name = name.map_or_else(|| format!("Operand {index}"), str::to_string);
		Some(match self {
			Accept::Tag => format!("{name} only accepts Tags"),
			Accept::Number => format!("{name} only accepts Numbers"),
			Accept::NumberOrTag => format!("{name} only accepts Numbers and Tags"),
			Accept::StringOrTag => format!("{name} only accepts Strings and Tags"),
			Accept::Comparable => format!("{name} accepts Numbers, Strings, Tags"),
			Accept::Expression => format!("{name} only accepts Expressions"),
			Accept::NumberOrUndefined => format!("{name} only accepts numbers."),
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
	/// Name used in messages, defaults to `Operand <index>`.
	#[serde(default)]
	pub name:   Option<String>,
	pub accept: Accept,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstructionSpec {
	pub name:         String,
	/// Warning reported on every use of the instruction.
	#[serde(default)]
	pub warn_message: Option<String>,
	/// Warning reported on every use of a banned instruction.
	#[serde(default)]
	pub ban_message:  Option<String>,
	#[serde(default)]
	pub parameters:   Vec<ParameterSpec>,
}

impl InstructionSpec {
	fn new(name: &str, parameters: &[(Option<&str>, Accept)]) -> Self {
		Self {
			name:         name.to_string(),
			warn_message: None,
			ban_message:  None,
			parameters:   parameters
				.iter()
				.map(|&(name, accept)| ParameterSpec { name: name.map(str::to_string), accept })
				.collect(),
		}
	}

	fn warn(mut self, message: &str) -> Self {
		self.warn_message = Some(message.to_string());
		self
	}
}

/// Instructions known to the analyzer, by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
	instructions: HashMap<String, InstructionSpec>,
}

impl Catalog {
	pub fn get(&self, name: &str) -> Option<&InstructionSpec> { self.instructions.get(name) }

	/// Add an instruction, replacing any previous one with the same name.
	pub fn insert(&mut self, spec: InstructionSpec) -> Option<InstructionSpec> {
		self.instructions.insert(spec.name.clone(), spec)
	}

	/// Attach a ban message to an instruction. Returns `false` if the
	/// instruction is not in the catalog.
	pub fn ban(&mut self, name: &str, message: &str) -> bool {
		match self.instructions.get_mut(name) {
			Some(spec) => {
				spec.ban_message = Some(message.to_string());
				true
			}
			None => false,
		}
	}

	pub fn len(&self) -> usize { self.instructions.len() }

	pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

	/// The built-in catalog extended by the configured instructions and bans.
	pub fn from_config(config: &AnalyzerConfig) -> Self {
		let mut catalog = DEFAULT_CATALOG.clone();
		for spec in &config.instructions {
			catalog.insert(spec.clone());
		}
		for (name, message) in &config.banned {
			if !catalog.ban(name, message) {
				warn!("cannot ban unknown instruction '{name}'");
			}
		}
		catalog
	}

	fn builtin() -> Self {
		use Accept::*;

		let single_tag = [(None, Tag)];
		let counter = |name, tag| {
			InstructionSpec::new(name, &[(Some(tag), Tag), (Some("Preset"), Number), (Some("Accum"), Number)])
		};
		let math = |name| {
			InstructionSpec::new(name, &[
				(Some("Source A"), NumberOrTag),
				(Some("Source B"), NumberOrTag),
				(Some("Dest"), Tag),
			])
		};
		let compare = |name| InstructionSpec::new(name, &[(Some("Source A"), Comparable), (Some("Source B"), Comparable)]);
		let copy = |name| {
			InstructionSpec::new(name, &[
				(Some("Source"), Comparable),
				(Some("Dest"), Comparable),
				(Some("Length"), Number),
			])
		};

		let mut catalog = Catalog::default();
		for name in ["XIC", "XIO", "ONS", "OTE", "OTL", "OTU", "RES"] {
			catalog.insert(InstructionSpec::new(name, &single_tag));
		}
		catalog.insert(InstructionSpec::new("NOP", &[]));
		catalog.insert(InstructionSpec::new("AFI", &[]).warn("This AFI should be removed!"));
		catalog.insert(counter("TON", "Timer"));
		catalog.insert(counter("CTU", "Counter"));
		catalog.insert(counter("CTD", "Counter"));
		for name in ["ADD", "DIV", "MUL"] {
			catalog.insert(math(name));
		}
		catalog.insert(InstructionSpec::new("MID", &[
			(Some("Source"), StringOrTag),
			(Some("Qty"), NumberOrTag),
			(Some("Start"), NumberOrTag),
			(Some("Dest"), Tag),
		]));
		catalog.insert(InstructionSpec::new("DTOS", &[(Some("Source"), NumberOrTag), (Some("Dest"), Tag)]));
		catalog.insert(InstructionSpec::new("CONCAT", &[
			(Some("Source A"), StringOrTag),
			(Some("Source B"), StringOrTag),
			(Some("Dest"), Tag),
		]));
		for name in ["EQU", "NEQ", "GEQ", "LEQ", "LES", "GRT"] {
			catalog.insert(compare(name));
		}
		catalog.insert(InstructionSpec::new("MOV", &[(Some("Source"), Comparable), (Some("Dest"), Comparable)]));
		catalog.insert(copy("CPS"));
		catalog.insert(copy("FLL"));
		catalog.insert(InstructionSpec::new("JSR", &[(Some("Routine Name"), Tag), (None, Number)]));
		catalog.insert(InstructionSpec::new("FSC", &[
			(None, Tag),
			(Some("Length"), NumberOrUndefined),
			(Some("Position"), NumberOrUndefined),
			(Some("Mode"), Number),
			(None, Expression),
		]));
		catalog
	}
}
