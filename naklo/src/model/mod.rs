//! Binding tag records to target files
//!
//! The records of a tag file are split into sections by *selector* headers (`%file` or `%target`).
//! Records before the first selector are global, and apply to every file. Records after a selector
//! apply to the files it names, until the next selector:
//!
//! ```text
//! %album
//! Animals
//!
//! %file
//! 1
//! %title
//! Pigs on the Wing 1
//!
//! %file
//! 2-4
//! %artist
//! Roger Waters
//! ```
//!
//! A selector value is resolved against the file list, in order:
//!
//! 1. An exact path match
//! 2. The keyword `all`
//! 3. A space separated list of 1-based indices and inclusive ranges (`2`, `2-4`, `1 3 5-7`)
//!
//! Anything else is an [`UnresolvedTargetReference`](ModelError::UnresolvedTargetReference).
//!
//! ## Overrides
//!
//! When a section sets a key for a file, the values set by any earlier section (or the global
//! section) for that key and file are dropped. Within a single section, repeated keys follow
//! [`DuplicatePolicy`]. A header without values deletes the key.

use crate::config::{DuplicatePolicy, ModelOptions};
use crate::error::{ModelError, Result};
use crate::tagfile::TagRecord;

use std::path::{Path, PathBuf};

/// Header names that select target files instead of setting a tag
pub const SELECTOR_KEYS: [&str; 2] = ["file", "target"];

/// Field name used for [`ModelOptions::number_tracks`]
pub const TRACK_NUMBER_KEY: &str = "tracknumber";
/// Field name used for [`ModelOptions::number_tracks`]
pub const TRACK_TOTAL_KEY: &str = "tracktotal";
/// Field name set by [`apply_titles`]
pub const TITLE_KEY: &str = "title";

/// The tags to write to a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBinding {
	pub(crate) file_identifier: String,
	pub(crate) path: PathBuf,
	pub(crate) tags: Vec<TagRecord>,
}

impl TargetBinding {
	/// The file list entry this binding was created for
	pub fn file_identifier(&self) -> &str {
		&self.file_identifier
	}

	/// The path of the target file
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The tags to write, in order
	///
	/// A record without values marks a key to be removed from the file.
	pub fn tags(&self) -> &[TagRecord] {
		&self.tags
	}

	/// Iterate over all `(key, value)` pairs to write
	pub fn items(&self) -> impl Iterator<Item = (&str, &str)> {
		self.tags.iter().flat_map(|record| {
			record
				.values
				.iter()
				.map(move |value| (record.key.as_str(), value.as_str()))
		})
	}

	/// Whether `key` is mentioned in the binding, including as a removal
	pub fn mentions(&self, key: &str) -> bool {
		self.tags
			.iter()
			.any(|record| record.key.eq_ignore_ascii_case(key))
	}
}

#[derive(Debug)]
enum Targets {
	All,
	Indices(Vec<usize>),
}

impl Targets {
	fn contains(&self, idx: usize) -> bool {
		match self {
			Targets::All => true,
			Targets::Indices(indices) => indices.contains(&idx),
		}
	}
}

struct Section<'a> {
	targets: Targets,
	records: Vec<&'a TagRecord>,
}

impl<'a> Section<'a> {
	fn new(targets: Targets) -> Self {
		Self {
			targets,
			records: Vec::new(),
		}
	}

	// One record per key, in order of first appearance
	fn collapse(&self, duplicates: DuplicatePolicy) -> Vec<TagRecord> {
		let mut collapsed: Vec<TagRecord> = Vec::new();

		for record in &self.records {
			let Some(existing) = collapsed.iter_mut().find(|r| r.key == record.key) else {
				collapsed.push((*record).clone());
				continue;
			};

			if duplicates == DuplicatePolicy::LastWins || record.values.is_empty() {
				existing.values.clone_from(&record.values);
			} else {
				existing.values.extend(record.values.iter().cloned());
			}
		}

		collapsed
	}
}

/// Build the per-file bindings for `files`
///
/// Exactly one binding is created per entry of `files`, in the same order, even for files that
/// no section applies to.
///
/// # Errors
///
/// * A selector names something that is not in `files` ([`ModelError::UnresolvedTargetReference`])
/// * A key is not a valid Vorbis comment field name ([`ModelError::InvalidKey`])
///
/// # Examples
///
/// ```rust
/// use naklo::config::{ModelOptions, ParseOptions};
/// use naklo::{model, tagfile};
///
/// # fn main() -> naklo::error::Result<()> {
/// let text = "%album\nAnimals\n%file\n2\n%title\nDogs\n";
/// let records = tagfile::parse(text, ParseOptions::new())?;
///
/// let bindings = model::build(&records, &["01.flac", "02.flac"], ModelOptions::new())?;
/// assert_eq!(bindings[0].items().collect::<Vec<_>>(), [("album", "Animals")]);
/// assert_eq!(
/// 	bindings[1].items().collect::<Vec<_>>(),
/// 	[("album", "Animals"), ("title", "Dogs")]
/// );
/// # Ok(()) }
/// ```
pub fn build<S>(
	records: &[TagRecord],
	files: &[S],
	model_options: ModelOptions,
) -> Result<Vec<TargetBinding>>
where
	S: AsRef<Path>,
{
	let files = files.iter().map(|f| f.as_ref()).collect::<Vec<&Path>>();

	let mut sections = Vec::new();
	let mut current = Section::new(Targets::All);
	for record in records {
		if is_selector(&record.key) {
			let targets = resolve_selector(record, &files)?;
			log::trace!("Selector `%{}` resolved to {targets:?}", record.key);

			let previous = std::mem::replace(&mut current, Section::new(Targets::Indices(targets)));
			sections.push(previous);
			continue;
		}

		if !verify_key(&record.key) {
			return Err(ModelError::InvalidKey(record.key.clone()).into());
		}

		current.records.push(record);
	}
	sections.push(current);

	let collapsed = sections
		.iter()
		.map(|section| (&section.targets, section.collapse(model_options.duplicates)))
		.collect::<Vec<_>>();

	let total = files.len();
	let bindings = files
		.iter()
		.enumerate()
		.map(|(idx, path)| {
			let mut tags = Vec::new();
			for (_, section_records) in collapsed.iter().filter(|(t, _)| t.contains(idx)) {
				for record in section_records {
					set_record(&mut tags, record.clone());
				}
			}

			if model_options.number_tracks {
				add_if_missing(&mut tags, TRACK_NUMBER_KEY, (idx + 1).to_string());
				add_if_missing(&mut tags, TRACK_TOTAL_KEY, total.to_string());
			}

			let binding = TargetBinding {
				file_identifier: path.to_string_lossy().into_owned(),
				path: path.to_path_buf(),
				tags,
			};

			log::debug!(
				"Bound {} tag record(s) to `{}`",
				binding.tags.len(),
				binding.file_identifier
			);
			binding
		})
		.collect();

	Ok(bindings)
}

/// Set the title of every binding from a list of titles, in file order
///
/// The first title goes to the first binding, and so on. A title replaces any title the tag file
/// bound to that file. Bindings past the end of `titles` keep their tags, and extra titles are
/// ignored.
///
/// See [`tagfile::read_titles_from_path`](crate::tagfile::read_titles_from_path) for reading a
/// titles file.
///
/// # Examples
///
/// ```rust
/// use naklo::config::ModelOptions;
/// use naklo::model;
/// use naklo::tagfile::TagRecord;
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = [TagRecord::new("album", ["Animals"])];
/// let mut bindings = model::build(&records, &["01.flac", "02.flac"], ModelOptions::new())?;
///
/// model::apply_titles(&mut bindings, ["Pigs on the Wing 1"]);
/// assert_eq!(
/// 	bindings[0].items().collect::<Vec<_>>(),
/// 	[("album", "Animals"), ("title", "Pigs on the Wing 1")]
/// );
/// assert_eq!(bindings[1].items().collect::<Vec<_>>(), [("album", "Animals")]);
/// # Ok(()) }
/// ```
pub fn apply_titles<I, T>(bindings: &mut [TargetBinding], titles: I)
where
	I: IntoIterator<Item = T>,
	T: Into<String>,
{
	let mut titles = titles.into_iter();

	let mut missing = 0;
	for binding in bindings.iter_mut() {
		match titles.next() {
			Some(title) => set_record(&mut binding.tags, TagRecord::new(TITLE_KEY, [title])),
			None => missing += 1,
		}
	}

	let extra = titles.count();
	if missing > 0 {
		log::warn!("No title for the last {missing} file(s), they keep their titles");
	} else if extra > 0 {
		log::warn!("Ignoring {extra} title(s) past the end of the file list");
	}
}

fn is_selector(key: &str) -> bool {
	SELECTOR_KEYS.iter().any(|s| s.eq_ignore_ascii_case(key))
}

// A later section replaces the values of an earlier one, keeping the original position
fn set_record(tags: &mut Vec<TagRecord>, record: TagRecord) {
	match tags.iter_mut().find(|r| r.key == record.key) {
		Some(existing) => existing.values = record.values,
		None => tags.push(record),
	}
}

fn add_if_missing(tags: &mut Vec<TagRecord>, key: &str, value: String) {
	if tags.iter().any(|r| r.key == key) {
		return;
	}

	tags.push(TagRecord::new(key, [value]));
}

fn resolve_selector(record: &TagRecord, files: &[&Path]) -> Result<Vec<usize>> {
	if record.values.is_empty() {
		return Err(ModelError::UnresolvedTargetReference(format!("%{}", record.key)).into());
	}

	let mut targets = Vec::new();
	for value in &record.values {
		for idx in resolve_selector_value(value, files)? {
			if !targets.contains(&idx) {
				targets.push(idx);
			}
		}
	}

	Ok(targets)
}

fn resolve_selector_value(value: &str, files: &[&Path]) -> Result<Vec<usize>> {
	let unresolved = || ModelError::UnresolvedTargetReference(value.to_owned());

	let mut exact = files
		.iter()
		.enumerate()
		.filter(|(_, path)| **path == Path::new(value))
		.map(|(idx, _)| idx);
	if let Some(idx) = exact.next() {
		// The reference has to be unambiguous
		if exact.next().is_some() {
			return Err(unresolved().into());
		}

		return Ok(vec![idx]);
	}

	if value.eq_ignore_ascii_case("all") {
		return Ok((0..files.len()).collect());
	}

	let mut indices = Vec::new();
	for span in value.split_whitespace() {
		let (low, high) = match span.split_once('-') {
			Some((low, high)) => (low.parse::<usize>(), high.parse::<usize>()),
			None => (span.parse::<usize>(), span.parse::<usize>()),
		};

		let (Ok(low), Ok(high)) = (low, high) else {
			return Err(unresolved().into());
		};

		if low == 0 || high < low || high > files.len() {
			return Err(unresolved().into());
		}

		indices.extend((low - 1)..high);
	}

	if indices.is_empty() {
		return Err(unresolved().into());
	}

	Ok(indices)
}

// A case-insensitive field name that may consist of ASCII 0x20 through 0x7D, 0x3D ('=') excluded.
// ASCII 0x41 through 0x5A inclusive (A-Z) is to be considered equivalent to ASCII 0x61 through 0x7A inclusive (a-z).
pub(crate) fn verify_key(key: &str) -> bool {
	if key.is_empty() {
		return false;
	}

	key.bytes()
		.all(|byte| (0x20..=0x7D).contains(&byte) && byte != 0x3D)
}
