//! Front-end configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration. Unknown fields are rejected to catch typos early.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{LadderError, analyzer::catalog::InstructionSpec};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub scanner:  ScannerConfig,
	pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
	/// Accept `1.5e-3` style number literals. Off by default, rung text does
	/// not use exponent notation.
	pub exponent_numbers: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
	/// Extra catalog entries, an entry replaces a built-in one with the same name.
	pub instructions: Vec<InstructionSpec>,
	/// Instruction name to the warning reported wherever it is used.
	pub banned:       BTreeMap<String, String>,
}

impl Config {
	/// Parse a configuration from JSON text.
	pub fn from_json(text: &str) -> Result<Self, LadderError> { Ok(serde_json::from_str(text)?) }
}

/// Example configuration, kept compiling through the tests below.
pub const EXAMPLE_CONFIG_JSON: &str = r#"{
  "scanner": { "exponent_numbers": true },
  "analyzer": {
    "instructions": [
      {
        "name": "TOF",
        "parameters": [
          { "name": "Timer", "accept": "Tag" },
          { "name": "Preset", "accept": "Number" },
          { "name": "Accum", "accept": "Number" }
        ]
      }
    ],
    "banned": { "JSR": "Subroutine calls are not allowed in safety routines" }
  }
}"#;
