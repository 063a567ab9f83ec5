//! Reading the metadata block chain of a FLAC stream

use super::block::{Block, BlockDescriptor, BlockType, STREAM_MARKER, STREAMINFO_SIZE};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::container_err;
use crate::util::io::SeekStreamLen;
use crate::vorbis::{VorbisComments, read_comments};

use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom};

/// The metadata blocks of a FLAC stream
///
/// Every block but PADDING keeps its payload, so that it can be moved verbatim.
pub struct BlockChain {
	pub(crate) blocks: Vec<Block>,
	pub(crate) audio_offset: u64,
	pub(crate) file_length: u64,
	pub(crate) comments: Option<VorbisComments>,
}

impl BlockChain {
	/// The descriptors of all metadata blocks, in stream order
	pub fn descriptors(&self) -> impl ExactSizeIterator<Item = &BlockDescriptor> + Clone {
		self.blocks.iter().map(|block| &block.descriptor)
	}

	/// The offset of the first audio frame
	pub fn audio_offset(&self) -> u64 {
		self.audio_offset
	}

	/// The length of the file the chain was read from
	pub fn file_length(&self) -> u64 {
		self.file_length
	}

	/// The decoded VORBIS_COMMENT block, if the stream has one
	pub fn comments(&self) -> Option<&VorbisComments> {
		self.comments.as_ref()
	}

	/// The total size of all PADDING blocks, including their headers
	pub fn padding(&self) -> u64 {
		self.blocks
			.iter()
			.filter(|block| block.block_type() == BlockType::Padding)
			.map(Block::size)
			.sum()
	}

	pub(crate) fn comment_index(&self) -> Option<usize> {
		self.blocks
			.iter()
			.position(|block| block.block_type() == BlockType::VorbisComment)
	}
}

pub(in crate::flac) fn verify_flac<R>(data: &mut R) -> Result<()>
where
	R: Read,
{
	let mut marker = [0; 4];
	match data.read_exact(&mut marker) {
		Err(e) if e.kind() == IoErrorKind::UnexpectedEof => {
			container_err!(@BAIL NotAFlacFile)
		},
		res => res?,
	}

	if marker != STREAM_MARKER {
		container_err!(@BAIL NotAFlacFile);
	}

	Ok(())
}

/// Read the metadata block chain of a FLAC stream
///
/// The reader is read from the start, and is left at the first audio frame. `parsing_mode` applies
/// to the VORBIS_COMMENT block, see [`read_comments`].
///
/// # Errors
///
/// * The stream does not start with `fLaC` ([`ContainerError::NotAFlacFile`](crate::error::ContainerError::NotAFlacFile))
/// * The chain is damaged in any way ([`ContainerError::MalformedBlockChain`](crate::error::ContainerError::MalformedBlockChain))
/// * There is more than one VORBIS_COMMENT block ([`ContainerError::DuplicateCommentBlock`](crate::error::ContainerError::DuplicateCommentBlock))
///
/// # Examples
///
/// ```rust,no_run
/// use naklo::config::ParsingMode;
/// use naklo::flac::read_chain;
/// use std::fs::File;
///
/// # fn main() -> naklo::error::Result<()> {
/// let mut file = File::open("track01.flac")?;
/// let chain = read_chain(&mut file, ParsingMode::BestAttempt)?;
///
/// for descriptor in chain.descriptors() {
/// 	println!("{:?}: {} bytes", descriptor.block_type(), descriptor.length());
/// }
/// # Ok(()) }
/// ```
pub fn read_chain<R>(data: &mut R, parsing_mode: ParsingMode) -> Result<BlockChain>
where
	R: Read + Seek,
{
	let file_length = data.stream_len_hack()?;
	data.seek(SeekFrom::Start(0))?;

	verify_flac(data)?;

	let mut blocks: Vec<Block> = Vec::new();
	let mut comments = None;

	loop {
		if data.stream_position()? >= file_length {
			container_err!(@BAIL MalformedBlockChain, "Reached the end of the file before the last metadata block");
		}

		let block = match Block::read(data, file_length) {
			Ok(block) => block,
			Err(e) if e.is_unexpected_eof() => {
				container_err!(@BAIL MalformedBlockChain, "Reached the end of the file before the last metadata block")
			},
			Err(e) => return Err(e),
		};

		match block.block_type() {
			BlockType::StreamInfo if !blocks.is_empty() => {
				container_err!(@BAIL MalformedBlockChain, "File contains more than one STREAMINFO block")
			},
			BlockType::StreamInfo if block.descriptor.length != STREAMINFO_SIZE => {
				container_err!(@BAIL MalformedBlockChain, "File has an invalid STREAMINFO block size (!= 34)")
			},
			_ if blocks.is_empty() && block.block_type() != BlockType::StreamInfo => {
				container_err!(@BAIL MalformedBlockChain, "File missing mandatory STREAMINFO block")
			},
			BlockType::VorbisComment => {
				if comments.is_some() {
					container_err!(@BAIL DuplicateCommentBlock);
				}

				let len = u64::from(block.descriptor.length);
				match read_comments(&mut &block.content[..], len, parsing_mode) {
					Ok(vorbis_comments) => comments = Some(vorbis_comments),
					Err(e) => {
						log::warn!("Unable to decode VORBIS_COMMENT block: {e}");
						container_err!(@BAIL MalformedBlockChain, "Invalid VORBIS_COMMENT block");
					},
				}
			},
			_ => {},
		}

		let last = block.descriptor.last;
		blocks.push(block);

		if last {
			break;
		}
	}

	let audio_offset = data.stream_position()?;
	log::debug!(
		"Read {} metadata block(s), audio starts at {audio_offset}",
		blocks.len()
	);

	Ok(BlockChain {
		blocks,
		audio_offset,
		file_length,
		comments,
	})
}
