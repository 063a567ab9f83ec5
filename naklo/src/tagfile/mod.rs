//! Reading tag files
//!
//! A tag file is a sequence of `%name` headers, each followed by the lines making up its values:
//!
//! ```text
//! %album
//! The Dark Side of the Moon
//!
//! %genre
//! Progressive rock
//! Psychedelic rock
//! ```
//!
//! ## Rules
//!
//! * Lines made up only of spaces, tabs, and the backspace/form-feed/vertical-tab control characters
//!   are meaningless. They are skipped, and never start or end a field.
//! * A header starts with a `%` (after any leading spaces). The name follows the `%` (and any
//!   spaces after it) and ends at the first space or tab.
//! * Every other line is a value of the closest preceding header, with surrounding spaces and tabs
//!   removed. A value line with no preceding header is an error.
//! * Names are case-insensitive, and are normalized to lower case.
//!
//! See [`ParseOptions`] for the knobs.

pub(crate) mod line;

use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Result, TagFileError};
use crate::macros::tag_file_err;

use std::io::Read;
use std::path::{Path, PathBuf};

/// The names tried by [`discover`], in order
pub const DEFAULT_TAG_FILE_NAMES: [&str; 6] =
	["tags", "tags.txt", "Tags", "Tags.txt", "TAGS", "TAGS.txt"];

/// A single `%name` header and its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
	pub(crate) key: String,
	pub(crate) values: Vec<String>,
}

impl TagRecord {
	/// Create a new `TagRecord`
	///
	/// The key is normalized to lower case.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::tagfile::TagRecord;
	///
	/// let record = TagRecord::new("ARTIST", ["Pink Floyd"]);
	/// assert_eq!(record.key(), "artist");
	/// ```
	pub fn new<K, I, V>(key: K, values: I) -> Self
	where
		K: AsRef<str>,
		I: IntoIterator<Item = V>,
		V: Into<String>,
	{
		Self {
			key: key.as_ref().to_ascii_lowercase(),
			values: values.into_iter().map(Into::into).collect(),
		}
	}

	/// The lower case field name
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The values, in file order
	///
	/// This is empty for a header without any value lines.
	pub fn values(&self) -> &[String] {
		&self.values
	}
}

enum ParserState {
	Start,
	InBody(TagRecord),
}

impl ParserState {
	fn finish(self, records: &mut Vec<TagRecord>, join_lines: bool) {
		let ParserState::InBody(mut record) = self else {
			return;
		};

		if join_lines && record.values.len() > 1 {
			record.values = vec![record.values.join("\n")];
		}

		log::trace!(
			"Parsed tag record `{}` ({} value(s))",
			record.key,
			record.values.len()
		);
		records.push(record);
	}
}

/// Parse the contents of a tag file
///
/// # Errors
///
/// * A value line appears before any header, or a header has no name ([`TagFileError::MissingTagName`])
/// * There are no headers at all ([`TagFileError::EmptyTagFile`])
/// * A header has content after its name, with [`ParsingMode::Strict`] ([`TagFileError::TrailingHeaderContent`])
///
/// # Examples
///
/// ```rust
/// use naklo::config::ParseOptions;
/// use naklo::tagfile::{self, TagRecord};
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = tagfile::parse("%artist\nPink Floyd\n", ParseOptions::new())?;
/// assert_eq!(records, [TagRecord::new("artist", ["Pink Floyd"])]);
/// # Ok(()) }
/// ```
pub fn parse(text: &str, parse_options: ParseOptions) -> Result<Vec<TagRecord>> {
	let (mut records, state) = text.lines().enumerate().try_fold(
		(Vec::new(), ParserState::Start),
		|(mut records, state), (idx, raw_line)| -> Result<_> {
			let line_number = idx + 1;
			let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

			if line::is_meaningless(raw_line) {
				return Ok((records, state));
			}

			let Some(header) = line::header(raw_line) else {
				let ParserState::InBody(mut record) = state else {
					tag_file_err!(@BAIL MissingTagName { line: line_number });
				};

				record
					.values
					.push(raw_line.trim_matches(line::is_blank).to_owned());
				return Ok((records, ParserState::InBody(record)));
			};

			if header.name.is_empty() {
				tag_file_err!(@BAIL MissingTagName { line: line_number });
			}

			if header.has_trailing_content() {
				match parse_options.parsing_mode {
					ParsingMode::Strict => {
						tag_file_err!(@BAIL TrailingHeaderContent { line: line_number })
					},
					ParsingMode::BestAttempt => log::warn!(
						"Line {line_number}: discarding \"{}\" after the tag name `{}`",
						header.trailing.trim_matches(line::is_blank),
						header.name
					),
					ParsingMode::Relaxed => {},
				}
			}

			state.finish(&mut records, parse_options.join_lines);
			let record = TagRecord::new(header.name, Vec::<String>::new());
			Ok((records, ParserState::InBody(record)))
		},
	)?;

	state.finish(&mut records, parse_options.join_lines);

	if records.is_empty() {
		tag_file_err!(@BAIL EmptyTagFile);
	}

	log::debug!("Parsed {} tag record(s)", records.len());
	Ok(records)
}

/// Read and [`parse`] a tag file from a reader
///
/// # Errors
///
/// * `reader` could not be read, or is not valid UTF-8 ([`TagFileError::Unreadable`])
/// * See [`parse`]
pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Vec<TagRecord>>
where
	R: Read,
{
	let mut text = String::new();
	reader
		.read_to_string(&mut text)
		.map_err(TagFileError::Unreadable)?;

	parse(&text, parse_options)
}

/// Read and [`parse`] the tag file at `path`
///
/// # Errors
///
/// * `path` does not exist ([`TagFileError::NotFound`])
/// * See [`read_from`]
///
/// # Examples
///
/// ```rust,no_run
/// use naklo::config::ParseOptions;
/// use naklo::tagfile;
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = tagfile::read_from_path("tags.txt", ParseOptions::new())?;
/// # Ok(()) }
/// ```
pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Vec<TagRecord>>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let text = read_text(path)?;

	log::debug!("Reading tag file `{}`", path.display());
	parse(&text, parse_options)
}

/// Find a tag file in `dir`
///
/// This checks for the names in [`DEFAULT_TAG_FILE_NAMES`], in order, and returns the first one
/// that is a file.
///
/// # Errors
///
/// None of the names exist ([`TagFileError::NotFound`])
///
/// # Examples
///
/// ```rust,no_run
/// use naklo::tagfile;
///
/// # fn main() -> naklo::error::Result<()> {
/// let path = tagfile::discover(".")?;
/// println!("Using tag file `{}`", path.display());
/// # Ok(()) }
/// ```
pub fn discover<P>(dir: P) -> Result<PathBuf>
where
	P: AsRef<Path>,
{
	let dir = dir.as_ref();

	for name in DEFAULT_TAG_FILE_NAMES {
		let candidate = dir.join(name);
		if candidate.is_file() {
			log::debug!("Found tag file `{}`", candidate.display());
			return Ok(candidate);
		}
	}

	tag_file_err!(@BAIL NotFound);
}

/// Parse the contents of a titles file
///
/// A titles file holds one title per line, for use with [`model::apply_titles`](crate::model::apply_titles).
/// Values are trimmed like in a tag file, and meaningless lines are skipped.
///
/// # Examples
///
/// ```rust
/// use naklo::tagfile;
///
/// let titles = tagfile::parse_titles("Pigs on the Wing 1\n\n  Dogs\t\n");
/// assert_eq!(titles, ["Pigs on the Wing 1", "Dogs"]);
/// ```
pub fn parse_titles(text: &str) -> Vec<String> {
	text.lines()
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.filter(|line| !line::is_meaningless(line))
		.map(|line| line.trim_matches(line::is_blank).to_owned())
		.collect()
}

/// Read and [`parse_titles`] the titles file at `path`
///
/// # Errors
///
/// * `path` does not exist ([`TagFileError::NotFound`])
/// * `path` could not be read, or is not valid UTF-8 ([`TagFileError::Unreadable`])
pub fn read_titles_from_path<P>(path: P) -> Result<Vec<String>>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let text = read_text(path)?;

	let titles = parse_titles(&text);
	log::debug!("Read {} title(s) from `{}`", titles.len(), path.display());
	Ok(titles)
}

fn read_text(path: &Path) -> Result<String> {
	let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
		std::io::ErrorKind::NotFound => TagFileError::NotFound,
		_ => TagFileError::Unreadable(e),
	})?;

	Ok(text)
}
