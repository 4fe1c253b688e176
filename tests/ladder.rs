#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use ladder::{
		Ladder, LadderError, Parser, Scanner, Severity,
		parser::{expression::Expression, tree::Branch},
		scanner::TokenType,
	};
	use proptest::prelude::*;

	fn read_program() -> String {
		let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("test.ld");
		std::fs::read_to_string(path).unwrap()
	}

	#[test]
	fn test_ladder_file() {
		let source = read_program();
		let report = Ladder::default().check(&source).unwrap();
		assert!(report.parse_errors.is_empty());
		assert_eq!(report.rungs.len(), 4);
		let messages: Vec<_> = report.observations.iter().map(|o| (o.level, o.to_string())).collect();
		assert_eq!(messages, [
			(Severity::Error, "Rung 2, CMP: Unknown instruction 'CMP'!".to_string()),
			(Severity::Warn, "Rung 3, AFI: This AFI should be removed!".to_string()),
		]);
		assert!(report.has_errors());
	}

	#[test]
	fn test_ladder_file_with_config() {
		let ladder = Ladder::from_json(
			r#"{"analyzer":{"instructions":[{"name":"CMP","parameters":[{"name":"Expression","accept":"Expression"}]}]}}"#,
		)
		.unwrap();
		let source = read_program();
		let report = ladder.check(&source).unwrap();
		assert_eq!(report.observations.len(), 1);
		assert!(!report.has_errors());
	}

	#[test]
	fn scenario_tokens() {
		let tokens = Scanner::default().scan("XIC(Tag)OTE(Tag3);").unwrap();
		let found: Vec<_> = tokens.iter().map(|t| (t.lexeme, t.column)).collect();
		assert_eq!(found, [
			("XIC", 0),
			("(", 3),
			("Tag", 4),
			(")", 7),
			("OTE", 8),
			("(", 11),
			("Tag3", 12),
			(")", 16),
			(";", 17)
		]);
		assert_eq!(tokens[0].r#type, TokenType::Instruction("XIC"));
		assert_eq!(tokens[6].r#type, TokenType::Tag("Tag3"));
	}

	#[test]
	fn scenario_missing_paren() {
		let Err(LadderError::ScannerErrors(errors)) = Scanner::default().scan("XIC;") else {
			panic!("XIC; must not scan");
		};
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].message(), "Expected '(' after instruction");
		assert_eq!(errors[0].start_column(), 3);
	}

	#[test]
	fn scenario_series_and_parallel() {
		let mut scanner = Scanner::default();
		let mut parser = Parser::new();

		let rungs = parser.parse(scanner.scan("XIC(Tag)XIO(Tag2)OTE(Tag3);").unwrap());
		assert_eq!(rungs.len(), 1);
		let indexes = rungs[0].logic.conditions.iter().map(|c| match c {
			Branch::Instruction(i) => i.index,
			other => panic!("unexpected {other}"),
		});
		assert_eq!(indexes.collect::<Vec<_>>(), [0, 1, 2]);

		let rungs = parser.parse(scanner.scan("[XIC(Tag),XIO(Tag2)]OTE(Tag3);").unwrap());
		assert_eq!(rungs[0].to_string(), "(and (or XIC(Tag) XIO(Tag2)) OTE(Tag3))");
	}

	#[test]
	fn scenario_analysis() {
		let ladder = Ladder::default();
		let report = ladder.check("FOO(Tag);").unwrap();
		assert_eq!(report.observations.len(), 1);
		assert_eq!(report.observations[0].message, "Unknown instruction 'FOO'!");
		assert_eq!(report.observations[0].rung, 0);

		let report = ladder.check("TON(Timer,5);").unwrap();
		assert_eq!(report.observations.len(), 1);
		assert!(report.observations[0].message.starts_with("Parameter length mismatch"));
		assert_eq!(report.observations[0].parameter, None);
	}

	#[test]
	fn report_serializes_with_discriminants() {
		let report = Ladder::default().check("XIC(A)[OTE(B),MOV(5,'x')];").unwrap();
		let json = serde_json::to_value(&report).unwrap();
		let logic = &json["rungs"][0]["logic"];
		assert_eq!(logic["typ"], "And");
		assert_eq!(logic["conditions"][0]["typ"], "Instruction");
		assert_eq!(logic["conditions"][0]["name"], "XIC");
		assert_eq!(logic["conditions"][0]["parameters"][0]["typ"], "Tag");
		assert_eq!(logic["conditions"][0]["parameters"][0]["token"]["lexeme"], "A");
		assert_eq!(logic["conditions"][1]["typ"], "Or");
		assert_eq!(logic["conditions"][1]["conditions"][1]["parameters"][0]["value"], 5.0);
		assert_eq!(logic["conditions"][1]["conditions"][1]["parameters"][1]["typ"], "String");
		assert_eq!(json["tokens"][0]["lexeme"], "XIC");
		assert_eq!(json["observations"], serde_json::json!([]));
	}

	#[test]
	fn reuse_matches_fresh_instances() {
		let mut scanner = Scanner::default();
		let mut parser = Parser::new();
		let inputs = ["XIC(A)[XIO(B),OTE(C)];", "MOV(1,B)OTE(C);\nNOP();"];
		for input in inputs {
			let reused = parser.parse(scanner.scan(input).unwrap());
			let fresh = Parser::new().parse(Scanner::default().scan(input).unwrap());
			assert_eq!(reused, fresh);
		}
		let ladder = Ladder::default();
		assert_eq!(ladder.check(inputs[0]).unwrap(), ladder.check(inputs[0]).unwrap());
	}

	#[derive(Debug, Clone)]
	enum Param {
		Tag(String),
		Number(u32),
		Text(String),
	}

	impl Param {
		fn render(&self) -> String {
			match self {
				Param::Tag(name) => name.clone(),
				Param::Number(value) => value.to_string(),
				Param::Text(text) => format!("'{text}'"),
			}
		}

		fn matches(&self, expression: &Expression) -> bool {
			match (self, expression) {
				(Param::Tag(name), Expression::Tag { token }) => token.lexeme == name.as_str(),
				(Param::Number(value), Expression::Number { value: parsed }) => f64::from(*value) == *parsed,
				(Param::Text(text), Expression::String { value }) => *value == text.as_str(),
				_ => false,
			}
		}
	}

	fn arb_param() -> impl Strategy<Value = Param> {
		prop_oneof![
			"[a-z_][a-zA-Z0-9_.]{0,8}".prop_map(Param::Tag),
			any::<u32>().prop_map(Param::Number),
			"[a-zA-Z0-9 ]{0,8}".prop_map(Param::Text),
		]
	}

	fn arb_program() -> impl Strategy<Value = Vec<Vec<(String, Vec<Param>)>>> {
		let instruction = ("[A-Z][A-Z0-9_]{1,5}", prop::collection::vec(arb_param(), 0..4));
		prop::collection::vec(prop::collection::vec(instruction, 0..5), 1..4)
	}

	fn render(program: &[Vec<(String, Vec<Param>)>]) -> String {
		program
			.iter()
			.map(|rung| {
				let instructions: String = rung
					.iter()
					.map(|(name, params)| {
						format!("{name}({})", params.iter().map(Param::render).collect::<Vec<_>>().join(","))
					})
					.collect();
				format!("{instructions};\n")
			})
			.collect()
	}

	proptest! {
		#[test]
		fn scan_then_parse_keeps_instructions(program in arb_program()) {
			let source = render(&program);
			let tokens = Scanner::default().scan(&source).unwrap();
			let mut parser = Parser::new();
			let rungs = parser.parse(tokens);
			prop_assert_eq!(parser.errors(), None);
			prop_assert_eq!(rungs.len(), program.len());
			for (rung, expected) in rungs.iter().zip(&program) {
				let instructions = rung.instructions();
				prop_assert_eq!(instructions.len(), expected.len());
				for (index, (instruction, (name, params))) in instructions.iter().zip(expected).enumerate() {
					prop_assert_eq!(instruction.name, name.as_str());
					prop_assert_eq!(instruction.index, index);
					prop_assert_eq!(instruction.parameters.len(), params.len());
					for (expression, param) in instruction.parameters.iter().zip(params) {
						prop_assert!(param.matches(expression), "{:?} != {}", param, expression);
					}
				}
			}
		}
	}
}
