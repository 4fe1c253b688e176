//! Character classes shared by the scanner modes.

/// Instruction names: `XIC`, `TON`, `My_AOI2`.
pub(crate) fn is_identifier_body(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' }

pub(crate) fn is_tag_start(c: char) -> bool { c.is_ascii_alphabetic() || c == '_' }

/// Tags may address members, array elements and module connections, e.g.
/// `Local:1:I.Data[3].0`.
pub(crate) fn is_tag_body(c: char) -> bool { c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | ':') }

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tag_body_accepts_addressing_characters() {
		assert!("Local:1:I.Data[3].0".chars().all(is_tag_body));
		assert!(!is_tag_body(','));
		assert!(!is_tag_body(')'));
		assert!(!is_identifier_body('.'));
		assert!(!is_tag_start('1'));
	}
}
