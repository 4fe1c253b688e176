//! # From rung text to findings
//!
//! Rung text: `XIC(Start)[XIO(Stop),ONS(Once)]OTE(Motor);`

//! ## Scanning
//!
//! The scanner takes in the characters and converts them into tokens.
//! Instruction names `XIC`, punctuation `[`, `(`, `;`, tags `Motor.Run`,
//! literals `'text'`, `12.5` and the operators of CMP-style expressions are
//! all tokens. Whitespace is ignored.
//!
//! Any lexical error fails the whole scan, the caller gets every error found.

//! ## Parsing
//!
//! The parser builds a tree of the rung. Instructions next to each other are
//! in series (`And`), a bracketed branch is in parallel (`Or`):
//!
//! ``` markdown
//! Rung
//! └── And
//!     ├── XIC(Start)
//!     ├── Or
//!     │   ├── XIO(Stop)
//!     │   └── ONS(Once)
//!     └── OTE(Motor)
//! ```
//!
//! Series connections nested in series connections are flattened while the
//! tree is built. Grammar errors are recorded and the parser carries on with
//! the next parameter, branch or rung.

//! ## Analysis
//!
//! Every instruction is checked against a catalog of known instructions: is
//! the name known, does the number of parameters match, does each parameter
//! have an accepted kind. Empty rungs and branches are pointed out too.

//! ## Putting it together
//!
//! [`Ladder`] runs the three stages and collects their output into a
//! serializable [`Report`]. The stages can also be used on their own.

pub mod analyzer;
pub mod config;
mod error;
mod ladder;
pub mod parser;
pub mod scanner;
mod utils;

pub use analyzer::{Analyzer, InstructionRef, Observation, Severity, catalog::Catalog};
pub use config::Config;
pub use error::{
	LadderError,
	parser::{ParseError, ParseErrorType},
	scanner::{ScanError, ScanErrorType, ScannerError},
};
pub use ladder::{Ladder, Report};
pub use parser::Parser;
pub use scanner::Scanner;
