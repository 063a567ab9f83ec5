//! Classification of single tag file lines

const BACKSPACE: char = '\u{8}';
const VERTICAL_TAB: char = '\u{b}';
const FORM_FEED: char = '\u{c}';

pub(super) fn is_blank(c: char) -> bool {
	c == ' ' || c == '\t'
}

/// A line that never starts or ends a field
///
/// This is any line made up of spaces, tabs, and the backspace/form-feed/vertical-tab control
/// characters, including the empty line.
pub(crate) fn is_meaningless(line: &str) -> bool {
	line.trim_matches(is_blank)
		.chars()
		.all(|c| is_blank(c) || matches!(c, BACKSPACE | FORM_FEED | VERTICAL_TAB))
}

/// A `%name` line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Header<'a> {
	pub(crate) name: &'a str,
	pub(crate) trailing: &'a str,
}

impl Header<'_> {
	/// Whether anything other than blanks follows the name
	pub(crate) fn has_trailing_content(&self) -> bool {
		!self.trailing.trim_matches(is_blank).is_empty()
	}
}

/// Attempt to read `line` as a header
///
/// Leading spaces are skipped, then a `%` is required. The name starts after the `%` and any spaces
/// following it, and halts at the first space, tab, or the end of the line.
pub(crate) fn header(line: &str) -> Option<Header<'_>> {
	let rest = line.trim_start_matches(' ').strip_prefix('%')?;
	let rest = rest.trim_start_matches(' ');

	let name_end = rest.find([' ', '\t']).unwrap_or(rest.len());
	let (name, trailing) = rest.split_at(name_end);

	Some(Header { name, trailing })
}

#[cfg(test)]
mod tests {
	use super::{Header, header, is_meaningless};

	#[test_log::test]
	fn meaningless_lines() {
		assert!(is_meaningless(""));
		assert!(is_meaningless("    "));
		assert!(is_meaningless("\t \t"));
		assert!(is_meaningless("\u{8}\u{c}"));
		assert!(is_meaningless("  \u{b} \t"));

		assert!(!is_meaningless("  a "));
		assert!(!is_meaningless("\t."));
		assert!(!is_meaningless("\u{8}x"));
		assert!(!is_meaningless("%"));
	}

	#[test_log::test]
	fn header_names() {
		assert_eq!(
			header("%artist"),
			Some(Header {
				name: "artist",
				trailing: ""
			})
		);
		assert_eq!(header("%    artist").map(|h| h.name), Some("artist"));
		assert_eq!(header("   %artist").map(|h| h.name), Some("artist"));

		let halted = header("%   artist hhuehue").unwrap();
		assert_eq!(halted.name, "artist");
		assert_eq!(halted.name.len(), 6);
		assert_eq!(halted.trailing, " hhuehue");
		assert!(halted.has_trailing_content());

		let tabbed = header("%title\t  ").unwrap();
		assert_eq!(tabbed.name, "title");
		assert!(!tabbed.has_trailing_content());
	}

	#[test_log::test]
	fn not_headers() {
		assert_eq!(header("artist"), None);
		assert_eq!(header("\t%artist"), None);
		assert_eq!(header("a%artist"), None);
	}

	#[test_log::test]
	fn empty_header_name() {
		assert_eq!(header("%").map(|h| h.name), Some(""));
		assert_eq!(header("%    ").map(|h| h.name), Some(""));
		assert_eq!(header("%\tartist").map(|h| h.name), Some(""));
	}
}
