//! Choosing how a new VORBIS_COMMENT block is written

use super::block::{
	BLOCK_HEADER_SIZE, Block, BlockType, MAX_BLOCK_SIZE, STREAM_MARKER, write_block,
	write_padding,
};
use super::read::BlockChain;
use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::err;

use std::ops::Range;

/// How a new VORBIS_COMMENT block is brought into a file
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
	/// The new block has the exact size of the old one, and replaces it
	InPlaceOverwrite,
	/// The metadata region keeps its size, and the blocks after the comment block move into padding
	GrowWithinPadding,
	/// The new block is smaller than the old one, and the difference becomes padding
	ShrinkIntoPadding,
	/// The metadata region is rebuilt, and the audio frames are moved
	FullRebuild,
}

impl Strategy {
	/// Whether this strategy only overwrites bytes inside the existing metadata region
	pub fn is_in_place(self) -> bool {
		self != Self::FullRebuild
	}
}

/// The bytes to write to a file, and where to write them
///
/// For in place strategies, `new_bytes` has the exact length of `range`. For [`Strategy::FullRebuild`],
/// `range` covers the entire metadata region, and the audio frames starting at
/// [`audio_offset`](RewritePlan::audio_offset) must follow `new_bytes`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewritePlan {
	pub(crate) strategy: Strategy,
	pub(crate) range: Range<u64>,
	pub(crate) new_bytes: Vec<u8>,
	pub(crate) audio_offset: u64,
}

impl RewritePlan {
	/// The chosen strategy
	pub fn strategy(&self) -> Strategy {
		self.strategy
	}

	/// The byte range of the original file that is replaced
	pub fn range(&self) -> Range<u64> {
		self.range.clone()
	}

	/// The replacement for [`range`](RewritePlan::range)
	pub fn new_bytes(&self) -> &[u8] {
		&self.new_bytes
	}

	/// The offset of the first audio frame in the original file
	pub fn audio_offset(&self) -> u64 {
		self.audio_offset
	}
}

/// Decide how to write `comment_payload` into the stream described by `chain`
///
/// This is pure, nothing is read or written.
///
/// The smallest run of blocks containing the existing comment block (or the first PADDING block,
/// for a stream without comments) that can hold the new comment block, the other non-padding blocks
/// of the run, and an optional PADDING block for what remains, is rewritten in place. Runs starting
/// at the comment block are tried first, then runs starting at each earlier PADDING block. Only when no
/// such run exists is the metadata rebuilt, with [`WriteOptions::preferred_padding`] bytes of padding.
///
/// # Errors
///
/// `comment_payload` does not fit into a metadata block ([`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData))
pub fn plan(
	chain: &BlockChain,
	comment_payload: &[u8],
	write_options: WriteOptions,
) -> Result<RewritePlan> {
	if comment_payload.len() > MAX_BLOCK_SIZE as usize {
		err!(TooMuchData);
	}

	let new_comment_size = BLOCK_HEADER_SIZE + comment_payload.len() as u64;

	let existing_comment = chain.comment_index();
	let anchor = existing_comment.or_else(|| {
		chain
			.blocks
			.iter()
			.position(|block| block.block_type() == BlockType::Padding)
	});

	if let Some(anchor) = anchor {
		if let Some(window) = find_window(&chain.blocks, anchor, new_comment_size) {
			let strategy = match existing_comment {
				Some(idx) => {
					let old_size = chain.blocks[idx].size();
					match new_comment_size.cmp(&old_size) {
						std::cmp::Ordering::Equal => Strategy::InPlaceOverwrite,
						std::cmp::Ordering::Less => Strategy::ShrinkIntoPadding,
						std::cmp::Ordering::Greater => Strategy::GrowWithinPadding,
					}
				},
				None => Strategy::GrowWithinPadding,
			};

			log::debug!(
				"Rewriting blocks {}..={} in place ({strategy:?}, {} byte(s) of padding left)",
				window.start,
				window.end,
				window.free
			);

			let new_bytes = encode_window(&chain.blocks, anchor, &window, comment_payload)?;
			let range = chain.blocks[window.start].descriptor.header_offset
				..chain.blocks[window.end].descriptor.end();

			return Ok(RewritePlan {
				strategy,
				range,
				new_bytes,
				audio_offset: chain.audio_offset,
			});
		}
	}

	log::debug!("Not enough padding to write in place, rebuilding the metadata");

	Ok(RewritePlan {
		strategy: Strategy::FullRebuild,
		range: 0..chain.audio_offset,
		new_bytes: rebuild(chain, comment_payload, write_options)?,
		audio_offset: chain.audio_offset,
	})
}

// A single PADDING block, including its header
const MAX_PADDING_SIZE: u64 = BLOCK_HEADER_SIZE + (1 << 24) - 1;

struct Window {
	// Both inclusive
	start: usize,
	end: usize,
	free: u64,
}

// Windows start at the anchor, or at one of the PADDING blocks before it, nearest first.
// STREAMINFO (index 0) is never part of a window.
fn find_window(blocks: &[Block], anchor: usize, new_comment_size: u64) -> Option<Window> {
	let earlier_padding = (1..anchor)
		.rev()
		.filter(|&idx| blocks[idx].block_type() == BlockType::Padding);

	std::iter::once(anchor)
		.chain(earlier_padding)
		.find_map(|start| find_window_from(blocks, start, anchor, new_comment_size))
}

fn find_window_from(
	blocks: &[Block],
	start: usize,
	anchor: usize,
	new_comment_size: u64,
) -> Option<Window> {
	let mut window_size = 0;
	let mut content_size = new_comment_size;

	for (end, block) in blocks.iter().enumerate().skip(start) {
		window_size += block.size();

		// The anchor itself is always replaced, and any padding is absorbed
		if end != anchor && block.block_type() != BlockType::Padding {
			content_size += block.size();
		}

		if end < anchor {
			continue;
		}

		let Some(free) = window_size.checked_sub(content_size) else {
			continue;
		};

		// A leftover needs room for a PADDING block header
		if free != 0 && free < BLOCK_HEADER_SIZE {
			continue;
		}

		if free > MAX_PADDING_SIZE {
			continue;
		}

		let mut window = Window { start, end, free };

		// Merge with any padding directly after the window
		for block in &blocks[end + 1..] {
			if block.block_type() != BlockType::Padding
				|| window.free + block.size() > MAX_PADDING_SIZE
			{
				break;
			}

			window.end += 1;
			window.free += block.size();
		}

		return Some(window);
	}

	None
}

enum Entry<'a> {
	Comment,
	Kept(&'a Block),
}

// Only the final entry can carry the "last" flag, and only when `ends_chain` is set
fn write_entries(
	out: &mut Vec<u8>,
	entries: Vec<Entry<'_>>,
	comment_payload: &[u8],
	ends_chain: bool,
) -> Result<()> {
	let entry_count = entries.len();
	for (idx, entry) in entries.into_iter().enumerate() {
		let last = ends_chain && idx + 1 == entry_count;
		match entry {
			Entry::Comment => write_block(out, BlockType::VorbisComment, last, comment_payload)?,
			Entry::Kept(block) => block.write_to(out, last)?,
		}
	}

	Ok(())
}

fn encode_window(
	blocks: &[Block],
	anchor: usize,
	window: &Window,
	comment_payload: &[u8],
) -> Result<Vec<u8>> {
	let reaches_end = window.end + 1 == blocks.len();

	// The new comment block takes the place of the anchor
	let entries = (window.start..=window.end)
		.filter_map(|idx| match blocks[idx].block_type() {
			_ if idx == anchor => Some(Entry::Comment),
			BlockType::Padding => None,
			_ => Some(Entry::Kept(&blocks[idx])),
		})
		.collect::<Vec<_>>();

	let mut out = Vec::new();
	write_entries(
		&mut out,
		entries,
		comment_payload,
		reaches_end && window.free == 0,
	)?;

	if window.free != 0 {
		write_padding(
			&mut out,
			(window.free - BLOCK_HEADER_SIZE) as u32,
			reaches_end,
		)?;
	}

	Ok(out)
}

fn rebuild(
	chain: &BlockChain,
	comment_payload: &[u8],
	write_options: WriteOptions,
) -> Result<Vec<u8>> {
	let mut entries = Vec::with_capacity(chain.blocks.len() + 1);
	for block in &chain.blocks {
		match block.block_type() {
			BlockType::Padding => {},
			BlockType::VorbisComment => entries.push(Entry::Comment),
			_ => entries.push(Entry::Kept(block)),
		}
	}

	if chain.comments.is_none() {
		// Directly after STREAMINFO
		entries.insert(entries.len().min(1), Entry::Comment);
	}

	let padding = write_options
		.preferred_padding
		.map(|padding| padding.min(MAX_BLOCK_SIZE));

	let mut out = STREAM_MARKER.to_vec();
	write_entries(&mut out, entries, comment_payload, padding.is_none())?;

	if let Some(padding) = padding {
		write_padding(&mut out, padding, true)?;
	}

	Ok(out)
}
