//! The condition tree of a rung.
//!
//! Instructions placed one after the other are connected in series (`And`),
//! a bracketed, comma separated list of sub-branches is connected in parallel
//! (`Or`). `XIC(A)[XIC(B),XIO(C)]OTE(D);` reads as
//!
//! ``` markdown
//! Rung
//! └── And
//!     ├── XIC(A)
//!     ├── Or
//!     │   ├── XIC(B)
//!     │   └── XIO(C)
//!     └── OTE(D)
//! ```

use serde::Serialize;

use crate::parser::expression::Expression;

/// One unit of ladder logic, terminated by `;` in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rung<'a> {
	pub logic: And<'a>,
}

/// Any node of the condition tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Branch<'a> {
	And(And<'a>),
	Or(Or<'a>),
	Instruction(Instruction<'a>),
}

/// Series connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "typ")]
pub struct And<'a> {
	pub conditions: Vec<Branch<'a>>,
}

/// Parallel connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "typ")]
pub struct Or<'a> {
	pub conditions: Vec<Branch<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "typ")]
pub struct Instruction<'a> {
	pub name:       &'a str,
	/// Position of the instruction within its rung, starting at 0. Used for
	/// tracing observations back to the source.
	pub index:      usize,
	pub column:     usize,
	pub parameters: Vec<Expression<'a>>,
}

impl<'a> And<'a> {
	pub fn new(conditions: Vec<Branch<'a>>) -> Self { Self { conditions } }

	/// Promote the children of nested `And`s into this one.
	pub fn flatten(self) -> Self {
		let mut conditions = Vec::with_capacity(self.conditions.len());
		for condition in self.conditions {
			match condition {
				Branch::And(inner) => conditions.extend(inner.flatten().conditions),
				other => conditions.push(other),
			}
		}
		Self { conditions }
	}

	/// Flatten, then collapse a single child into the child itself. `Or`
	/// children are left as they are.
	pub fn simplify(self) -> Branch<'a> {
		let mut and = self.flatten();
		match and.conditions.pop() {
			Some(only) if and.conditions.is_empty() => only,
			Some(last) => {
				and.conditions.push(last);
				Branch::And(and)
			}
			None => Branch::And(and),
		}
	}
}

impl<'a> Or<'a> {
	pub fn new(conditions: Vec<Branch<'a>>) -> Self { Self { conditions } }
}

impl<'a> Branch<'a> {
	/// Simplify every `And` of the tree, bottom up.
	pub fn simplify(self) -> Self {
		match self {
			Branch::And(and) => And::new(and.conditions.into_iter().map(Branch::simplify).collect()).simplify(),
			Branch::Or(or) => Branch::Or(Or::new(or.conditions.into_iter().map(Branch::simplify).collect())),
			instruction @ Branch::Instruction(_) => instruction,
		}
	}

	/// Instructions of the tree in source order.
	pub fn instructions(&self) -> Vec<&Instruction<'a>> {
		let mut instructions = Vec::new();
		self.collect_instructions(&mut instructions);
		instructions
	}

	fn collect_instructions<'b>(&'b self, out: &mut Vec<&'b Instruction<'a>>) {
		match self {
			Branch::And(And { conditions }) | Branch::Or(Or { conditions }) => {
				conditions.iter().for_each(|condition| condition.collect_instructions(out))
			}
			Branch::Instruction(instruction) => out.push(instruction),
		}
	}
}

impl<'a> Rung<'a> {
	/// Instructions of the rung in source order.
	pub fn instructions(&self) -> Vec<&Instruction<'a>> {
		self.logic.conditions.iter().flat_map(|condition| condition.instructions()).collect()
	}
}

impl std::fmt::Display for Branch<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Branch::And(and) => write!(f, "{and}"),
			Branch::Or(Or { conditions }) => write!(f, "(or{})", display_conditions(conditions)),
			Branch::Instruction(instruction) => write!(f, "{instruction}"),
		}
	}
}

impl std::fmt::Display for And<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "(and{})", display_conditions(&self.conditions))
	}
}

impl std::fmt::Display for Instruction<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}({})",
			self.name,
			self.parameters.iter().map(|param| format!("{param}")).collect::<Vec<String>>().join(",")
		)
	}
}

impl std::fmt::Display for Rung<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.logic) }
}

fn display_conditions(conditions: &[Branch]) -> String {
	conditions.iter().map(|condition| format!(" {condition}")).collect()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn instruction(name: &'static str, index: usize) -> Branch<'static> {
		Branch::Instruction(Instruction { name, index, column: 0, parameters: vec![] })
	}

	fn and(conditions: Vec<Branch<'static>>) -> Branch<'static> { Branch::And(And::new(conditions)) }

	fn or(conditions: Vec<Branch<'static>>) -> Branch<'static> { Branch::Or(Or::new(conditions)) }

	#[test]
	fn single_child_collapses() {
		assert_eq!(And::new(vec![instruction("XIC", 0)]).simplify(), instruction("XIC", 0));
		let parallel = or(vec![instruction("XIC", 0), instruction("XIO", 1)]);
		assert_eq!(And::new(vec![parallel.clone()]).simplify(), parallel);
	}

	#[test]
	fn nested_and_is_flattened() {
		let nested = And::new(vec![
			instruction("XIC", 0),
			and(vec![instruction("XIO", 1), and(vec![instruction("ONS", 2), instruction("OTE", 3)])]),
		]);
		assert_eq!(nested.simplify().to_string(), "(and XIC() XIO() ONS() OTE())");
	}

	#[test]
	fn empty_and_is_kept() {
		assert_eq!(And::new(vec![]).simplify(), and(vec![]));
		assert_eq!(And::new(vec![and(vec![])]).simplify(), and(vec![]));
	}

	#[test]
	fn or_is_not_restructured() {
		let tree = or(vec![or(vec![instruction("XIC", 0)]), and(vec![instruction("XIO", 1)])]);
		assert_eq!(tree.simplify().to_string(), "(or (or XIC()) XIO())");
	}

	#[test]
	fn instructions_in_source_order() {
		let rung = Rung {
			logic: And::new(vec![
				instruction("XIC", 0),
				or(vec![instruction("XIO", 1), and(vec![instruction("ONS", 2), instruction("OTL", 3)])]),
				instruction("OTE", 4),
			]),
		};
		let names: Vec<_> = rung.instructions().iter().map(|i| i.name).collect();
		assert_eq!(names, ["XIC", "XIO", "ONS", "OTL", "OTE"]);
	}

	fn arb_branch() -> impl Strategy<Value = Branch<'static>> {
		let leaf = prop_oneof![Just("XIC"), Just("XIO"), Just("OTE")].prop_map(|name| instruction(name, 0));
		leaf.prop_recursive(4, 32, 4, |inner| {
			prop_oneof![
				prop::collection::vec(inner.clone(), 0..4).prop_map(and),
				prop::collection::vec(inner, 0..4).prop_map(or),
			]
		})
	}

	proptest! {
		#[test]
		fn simplified_single_child_is_unchanged(tree in arb_branch()) {
			let child = tree.simplify();
			prop_assert_eq!(And::new(vec![child.clone()]).simplify(), child);
		}

		#[test]
		fn simplify_is_idempotent(tree in arb_branch()) {
			let once = tree.simplify();
			prop_assert_eq!(once.clone().simplify(), once);
		}

		#[test]
		fn simplified_and_has_no_single_or_and_child(tree in arb_branch()) {
			fn check(branch: &Branch) -> bool {
				match branch {
					Branch::And(And { conditions }) => {
						conditions.len() != 1
							&& conditions.iter().all(|c| !matches!(c, Branch::And(_)) && check(c))
					}
					Branch::Or(Or { conditions }) => conditions.iter().all(check),
					Branch::Instruction(_) => true,
				}
			}
			prop_assert!(check(&tree.simplify()));
		}
	}
}
