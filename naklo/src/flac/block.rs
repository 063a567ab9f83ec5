use crate::error::Result;
use crate::macros::{container_err, try_vec};

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// The marker every FLAC stream starts with
pub const STREAM_MARKER: [u8; 4] = *b"fLaC";

pub(in crate::flac) const BLOCK_ID_STREAMINFO: u8 = 0;
pub(in crate::flac) const BLOCK_ID_PADDING: u8 = 1;
pub(in crate::flac) const BLOCK_ID_APPLICATION: u8 = 2;
pub(in crate::flac) const BLOCK_ID_SEEKTABLE: u8 = 3;
pub(in crate::flac) const BLOCK_ID_VORBIS_COMMENTS: u8 = 4;
pub(in crate::flac) const BLOCK_ID_CUESHEET: u8 = 5;
pub(in crate::flac) const BLOCK_ID_PICTURE: u8 = 6;
// Forbidden, to avoid confusion with a frame sync code
pub(in crate::flac) const BLOCK_ID_INVALID: u8 = 127;

pub(crate) const BLOCK_HEADER_SIZE: u64 = 4;
pub(crate) const MAX_BLOCK_SIZE: u32 = (1 << 24) - 1;
pub(crate) const STREAMINFO_SIZE: u32 = 34;

/// The type of a metadata block
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
	/// STREAMINFO, always the first block
	StreamInfo,
	/// PADDING, a content-ignored region
	Padding,
	/// APPLICATION
	Application,
	/// SEEKTABLE
	SeekTable,
	/// VORBIS_COMMENT, at most one per stream
	VorbisComment,
	/// CUESHEET
	CueSheet,
	/// PICTURE
	Picture,
	/// Any of the reserved block types (7..=126)
	Reserved(u8),
}

impl BlockType {
	/// Get a `BlockType` from the 7 bit block type of a block header
	///
	/// This returns `None` for the invalid block type 127, or anything out of range.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::flac::BlockType;
	///
	/// assert_eq!(BlockType::from_u8(4), Some(BlockType::VorbisComment));
	/// assert_eq!(BlockType::from_u8(127), None);
	/// ```
	pub fn from_u8(ty: u8) -> Option<Self> {
		match ty {
			BLOCK_ID_STREAMINFO => Some(Self::StreamInfo),
			BLOCK_ID_PADDING => Some(Self::Padding),
			BLOCK_ID_APPLICATION => Some(Self::Application),
			BLOCK_ID_SEEKTABLE => Some(Self::SeekTable),
			BLOCK_ID_VORBIS_COMMENTS => Some(Self::VorbisComment),
			BLOCK_ID_CUESHEET => Some(Self::CueSheet),
			BLOCK_ID_PICTURE => Some(Self::Picture),
			BLOCK_ID_INVALID.. => None,
			_ => Some(Self::Reserved(ty)),
		}
	}

	/// The 7 bit block type
	pub fn as_u8(self) -> u8 {
		match self {
			Self::StreamInfo => BLOCK_ID_STREAMINFO,
			Self::Padding => BLOCK_ID_PADDING,
			Self::Application => BLOCK_ID_APPLICATION,
			Self::SeekTable => BLOCK_ID_SEEKTABLE,
			Self::VorbisComment => BLOCK_ID_VORBIS_COMMENTS,
			Self::CueSheet => BLOCK_ID_CUESHEET,
			Self::Picture => BLOCK_ID_PICTURE,
			Self::Reserved(ty) => ty,
		}
	}
}

/// The position and shape of a metadata block within a file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockDescriptor {
	pub(crate) block_type: BlockType,
	pub(crate) last: bool,
	pub(crate) length: u32,
	pub(crate) header_offset: u64,
}

impl BlockDescriptor {
	/// The block type
	pub fn block_type(&self) -> BlockType {
		self.block_type
	}

	/// Whether this block has the last-metadata-block flag set
	pub fn is_last(&self) -> bool {
		self.last
	}

	/// The payload length, excluding the 4 byte header
	pub fn length(&self) -> u32 {
		self.length
	}

	/// The offset of the block header
	pub fn header_offset(&self) -> u64 {
		self.header_offset
	}

	/// The offset of the payload
	pub fn payload_offset(&self) -> u64 {
		self.header_offset + BLOCK_HEADER_SIZE
	}

	/// The offset immediately after the payload
	pub fn end(&self) -> u64 {
		self.payload_offset() + u64::from(self.length)
	}
}

pub(crate) struct Block {
	pub(crate) descriptor: BlockDescriptor,
	// Always empty for PADDING, which is never loaded
	pub(crate) content: Vec<u8>,
}

impl Block {
	pub(crate) fn read<R>(data: &mut R, file_length: u64) -> Result<Self>
	where
		R: Read + Seek,
	{
		let header_offset = data.stream_position()?;

		let byte = data.read_u8()?;
		let last = (byte & 0x80) != 0;
		let ty = byte & 0x7F;

		let size = data.read_u24::<BigEndian>()?;
		log::trace!("Reading FLAC block, type: {ty}, size: {size}");

		let Some(block_type) = BlockType::from_u8(ty) else {
			container_err!(@BAIL MalformedBlockChain, "Encountered the invalid block type 127");
		};

		let descriptor = BlockDescriptor {
			block_type,
			last,
			length: size,
			header_offset,
		};

		if descriptor.end() > file_length {
			container_err!(@BAIL MalformedBlockChain, "Metadata block extends past the end of the file");
		}

		let mut content = Vec::new();
		if block_type == BlockType::Padding {
			data.seek(SeekFrom::Current(i64::from(size)))?;
		} else {
			content = try_vec![0; size as usize];
			data.read_exact(&mut content)?;
		}

		Ok(Self {
			descriptor,
			content,
		})
	}

	pub(crate) fn block_type(&self) -> BlockType {
		self.descriptor.block_type
	}

	/// The size of the block, including its header
	pub(crate) fn size(&self) -> u64 {
		BLOCK_HEADER_SIZE + u64::from(self.descriptor.length)
	}

	/// Write the block with its original content, and a new last-block flag
	pub(crate) fn write_to<W>(&self, writer: &mut W, last: bool) -> Result<()>
	where
		W: Write,
	{
		if self.block_type() == BlockType::Padding {
			return write_padding(writer, self.descriptor.length, last);
		}

		write_block(writer, self.block_type(), last, &self.content)
	}
}

pub(crate) fn write_block_header<W>(
	writer: &mut W,
	block_type: BlockType,
	last: bool,
	length: u32,
) -> Result<()>
where
	W: Write,
{
	let mut byte = block_type.as_u8();
	if last {
		byte |= 0x80;
	}

	writer.write_u8(byte)?;
	writer.write_u24::<BigEndian>(length)?;

	log::trace!("Wrote a block header (ty: {block_type:?}, size: {length}, last: {last})");
	Ok(())
}

pub(crate) fn write_block<W>(
	writer: &mut W,
	block_type: BlockType,
	last: bool,
	content: &[u8],
) -> Result<()>
where
	W: Write,
{
	if content.len() > MAX_BLOCK_SIZE as usize {
		crate::macros::err!(TooMuchData);
	}

	write_block_header(writer, block_type, last, content.len() as u32)?;
	writer.write_all(content)?;

	Ok(())
}

pub(crate) fn write_padding<W>(writer: &mut W, length: u32, last: bool) -> Result<()>
where
	W: Write,
{
	write_block_header(writer, BlockType::Padding, last, length)?;
	std::io::copy(&mut std::io::repeat(0).take(u64::from(length)), writer)?;

	Ok(())
}
