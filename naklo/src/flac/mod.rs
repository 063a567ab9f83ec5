//! Writing Vorbis comments into FLAC files
//!
//! A FLAC stream starts with the `fLaC` marker, followed by a chain of metadata blocks, and then
//! the audio frames. Writing new comments happens in three steps:
//!
//! 1. [`read_chain`] reads the block chain, keeping every block but PADDING in memory
//! 2. [`plan()`] decides on a [`Strategy`], and produces the bytes to write
//! 3. [`write::apply_to_path`] (or [`write::apply_to`]) carries out the plan
//!
//! [`write_binding`] does all of this for a [`TargetBinding`].
//!
//! ## Notes
//!
//! * Blocks other than VORBIS_COMMENT and PADDING are never modified, only moved
//! * Padding is used wherever possible, a file is only rebuilt when there is not enough of it

pub(crate) mod block;
pub mod plan;
pub mod read;
pub mod write;

use crate::config::{CommentPolicy, WriteOptions};
use crate::error::{NakloError, Result};
use crate::model::TargetBinding;
use crate::util::io::{FileLike, Length, Truncate};
use crate::vorbis::{DEFAULT_VENDOR, VorbisComments, encode_comments};

use std::fs::File;
use std::io::BufReader;

// Exports
pub use block::{BlockDescriptor, BlockType, STREAM_MARKER};
pub use plan::{RewritePlan, Strategy, plan};
pub use read::{BlockChain, read_chain};

/// What happened to a file
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
	/// The file already holds the new comments, nothing was written
	Unchanged,
	/// The new comments were written with the given strategy
	Written(Strategy),
}

/// Compose the new comments for a file
///
/// The vendor string of `existing` is kept, new comment blocks use [`DEFAULT_VENDOR`].
/// See [`CommentPolicy`] for what happens to the items of `existing`.
///
/// # Examples
///
/// ```rust
/// use naklo::config::{CommentPolicy, ModelOptions, WriteOptions};
/// use naklo::flac::compose_comments;
/// use naklo::tagfile::TagRecord;
/// use naklo::vorbis::VorbisComments;
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = [TagRecord::new("title", ["Dogs"])];
/// let bindings = naklo::model::build(&records, &["dogs.flac"], ModelOptions::new())?;
///
/// let mut existing = VorbisComments::new("reference libFLAC 1.4.3 20230623");
/// existing.push(String::from("TITLE"), String::from("Raving and Drooling"));
/// existing.push(String::from("ALBUM"), String::from("Animals"));
///
/// let write_options = WriteOptions::new().comment_policy(CommentPolicy::Merge);
/// let comments = compose_comments(Some(&existing), &bindings[0], write_options);
///
/// assert_eq!(comments.vendor(), "reference libFLAC 1.4.3 20230623");
/// assert_eq!(
/// 	comments.items().collect::<Vec<_>>(),
/// 	[("ALBUM", "Animals"), ("TITLE", "Dogs")]
/// );
/// # Ok(()) }
/// ```
pub fn compose_comments(
	existing: Option<&VorbisComments>,
	binding: &TargetBinding,
	write_options: WriteOptions,
) -> VorbisComments {
	let vendor = existing.map_or(DEFAULT_VENDOR, VorbisComments::vendor);
	let mut comments = VorbisComments::new(vendor);

	if let (CommentPolicy::Merge, Some(existing)) = (write_options.comment_policy, existing) {
		for (key, value) in existing.items() {
			if !binding.mentions(key) {
				comments.push(key.to_owned(), value.to_owned());
			}
		}
	}

	for (key, value) in binding.items() {
		let key = if write_options.uppercase_keys {
			key.to_ascii_uppercase()
		} else {
			key.to_owned()
		};

		comments.push(key, value.to_owned());
	}

	comments
}

/// Write the comments of a [`TargetBinding`] to its file
///
/// # Errors
///
/// * The file is not a valid FLAC stream (see [`read_chain`])
/// * The comments are too large ([`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData))
/// * See [`write::apply_to_path`]
///
/// # Examples
///
/// ```rust,no_run
/// use naklo::config::{ModelOptions, WriteOptions};
/// use naklo::flac::{WriteOutcome, write_binding};
/// use naklo::tagfile::TagRecord;
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = [TagRecord::new("artist", ["Pink Floyd"])];
/// let bindings = naklo::model::build(&records, &["sheep.flac"], ModelOptions::new())?;
///
/// if let WriteOutcome::Written(strategy) = write_binding(&bindings[0], WriteOptions::new())? {
/// 	println!("Wrote comments ({strategy:?})");
/// }
/// # Ok(()) }
/// ```
pub fn write_binding(binding: &TargetBinding, write_options: WriteOptions) -> Result<WriteOutcome> {
	let path = binding.path();

	let plan = {
		let mut reader = BufReader::new(File::open(path)?);
		let chain = read_chain(&mut reader, write_options.parsing_mode)?;

		match prepare(&chain, binding, write_options)? {
			Some(plan) => plan,
			None => return Ok(WriteOutcome::Unchanged),
		}
	};

	write::apply_to_path(path, &plan)?;
	Ok(WriteOutcome::Written(plan.strategy()))
}

/// Write the comments of a [`TargetBinding`] to a [`FileLike`]
///
/// The path of the binding is ignored.
///
/// # Errors
///
/// * See [`write_binding`]
/// * See [`write::apply_to`]
pub fn write_binding_to<F>(
	file: &mut F,
	binding: &TargetBinding,
	write_options: WriteOptions,
) -> Result<WriteOutcome>
where
	F: FileLike,
	NakloError: From<<F as Truncate>::Error>,
	NakloError: From<<F as Length>::Error>,
{
	let chain = read_chain(file, write_options.parsing_mode)?;

	let Some(plan) = prepare(&chain, binding, write_options)? else {
		return Ok(WriteOutcome::Unchanged);
	};

	write::apply_to(file, &plan)?;
	Ok(WriteOutcome::Written(plan.strategy()))
}

fn prepare(
	chain: &BlockChain,
	binding: &TargetBinding,
	write_options: WriteOptions,
) -> Result<Option<RewritePlan>> {
	let comments = compose_comments(chain.comments(), binding, write_options);

	let existing_payload = chain
		.comment_index()
		.map(|idx| chain.blocks[idx].content.as_slice());

	if existing_payload.is_none() && comments.is_empty() {
		log::debug!("No comments to write, and no comment block to clear");
		return Ok(None);
	}

	let payload = encode_comments(comments.vendor(), comments.items())?;
	if existing_payload == Some(payload.as_slice()) {
		log::debug!("Comment block is already up to date");
		return Ok(None);
	}

	let plan = plan(chain, &payload, write_options)?;
	log::debug!("Chose {:?} for `{}`", plan.strategy(), binding.path().display());

	Ok(Some(plan))
}

#[cfg(test)]
mod tests {
	use super::{WriteOutcome, compose_comments, write_binding_to};
	use crate::config::{CommentPolicy, ModelOptions, ParsingMode, WriteOptions};
	use crate::flac::block::{BlockType, STREAM_MARKER, write_block, write_padding};
	use crate::flac::{Strategy, read_chain};
	use crate::model::{TargetBinding, build};
	use crate::tagfile::TagRecord;
	use crate::vorbis::{DEFAULT_VENDOR, VorbisComments, encode_comments};

	use std::io::Cursor;

	fn binding(records: &[TagRecord]) -> TargetBinding {
		build(records, &["a.flac"], ModelOptions::new())
			.unwrap()
			.remove(0)
	}

	fn existing() -> VorbisComments {
		let mut comments = VorbisComments::new("libFLAC");
		comments.push(String::from("ARTIST"), String::from("Pink Floyd"));
		comments.push(String::from("title"), String::from("Dogs"));
		comments.push(String::from("DATE"), String::from("1977"));
		comments
	}

	#[test_log::test]
	fn replace_policy() {
		let binding = binding(&[TagRecord::new("title", ["Sheep"])]);
		let comments = compose_comments(Some(&existing()), &binding, WriteOptions::new());

		assert_eq!(comments.vendor(), "libFLAC");
		assert_eq!(comments.items().collect::<Vec<_>>(), [("TITLE", "Sheep")]);
	}

	#[test_log::test]
	fn merge_policy() {
		let binding = binding(&[
			TagRecord::new("title", ["Sheep"]),
			TagRecord::new("date", Vec::<String>::new()),
		]);
		let write_options = WriteOptions::new()
			.comment_policy(CommentPolicy::Merge)
			.uppercase_keys(false);
		let comments = compose_comments(Some(&existing()), &binding, write_options);

		assert_eq!(
			comments.items().collect::<Vec<_>>(),
			[("ARTIST", "Pink Floyd"), ("title", "Sheep")]
		);
	}

	#[test_log::test]
	fn new_vendor() {
		let binding = binding(&[TagRecord::new("title", ["Sheep"])]);
		let comments = compose_comments(None, &binding, WriteOptions::new());

		assert_eq!(comments.vendor(), DEFAULT_VENDOR);
	}

	#[test_log::test]
	fn write_twice() {
		let mut data = STREAM_MARKER.to_vec();
		write_block(&mut data, BlockType::StreamInfo, false, &[0; 34]).unwrap();
		let payload = encode_comments("libFLAC", [("TITLE", "Dogs")]).unwrap();
		write_block(&mut data, BlockType::VorbisComment, false, &payload).unwrap();
		write_padding(&mut data, 8, true).unwrap();
		data.extend_from_slice(&[0xFF, 0xF8, 0, 0]);

		let binding = binding(&[TagRecord::new("album", ["Animals"])]);

		let mut file = Cursor::new(data);
		let first = write_binding_to(&mut file, &binding, WriteOptions::new()).unwrap();
		assert_eq!(first, WriteOutcome::Written(Strategy::GrowWithinPadding));

		let written = file.get_ref().clone();
		let second = write_binding_to(&mut file, &binding, WriteOptions::new()).unwrap();
		assert_eq!(second, WriteOutcome::Unchanged);
		assert_eq!(file.get_ref(), &written);

		let chain = read_chain(&mut file, ParsingMode::BestAttempt).unwrap();
		let comments = chain.comments().unwrap();
		assert_eq!(comments.vendor(), "libFLAC");
		assert_eq!(comments.items().collect::<Vec<_>>(), [("ALBUM", "Animals")]);
	}

	#[test_log::test]
	fn nothing_to_clear() {
		let mut data = STREAM_MARKER.to_vec();
		write_block(&mut data, BlockType::StreamInfo, true, &[0; 34]).unwrap();
		data.extend_from_slice(&[0xFF, 0xF8, 0, 0]);

		let binding = binding(&[TagRecord::new("album", Vec::<String>::new())]);

		let mut file = Cursor::new(data.clone());
		let outcome = write_binding_to(&mut file, &binding, WriteOptions::new()).unwrap();
		assert_eq!(outcome, WriteOutcome::Unchanged);
		assert_eq!(file.into_inner(), data);
	}

	#[test_log::test]
	fn merge_keeps_latin1_fields() {
		// Vendor "v", one field "TITLE=Caf\xe9"
		let mut payload = vec![1, 0, 0, 0, b'v', 1, 0, 0, 0, 10, 0, 0, 0];
		payload.extend_from_slice(b"TITLE=Caf\xe9");

		let mut data = STREAM_MARKER.to_vec();
		write_block(&mut data, BlockType::StreamInfo, false, &[0; 34]).unwrap();
		write_block(&mut data, BlockType::VorbisComment, false, &payload).unwrap();
		write_padding(&mut data, 64, true).unwrap();
		data.extend_from_slice(&[0xFF, 0xF8, 0, 0]);

		let binding = binding(&[TagRecord::new("album", ["Animals"])]);
		let write_options = WriteOptions::new().comment_policy(CommentPolicy::Merge);

		let mut file = Cursor::new(data.clone());
		write_binding_to(&mut file, &binding, write_options).unwrap();

		let chain = read_chain(&mut file, ParsingMode::Strict).unwrap();
		assert_eq!(
			chain.comments().unwrap().items().collect::<Vec<_>>(),
			[("TITLE", "Caf\u{e9}"), ("ALBUM", "Animals")]
		);

		// Nothing is written when the block can't be decoded
		let strict = write_options.parsing_mode(ParsingMode::Strict);
		let mut file = Cursor::new(data.clone());
		assert!(write_binding_to(&mut file, &binding, strict).is_err());
		assert_eq!(file.into_inner(), data);
	}
}
