use naklo::config::ParsingMode;
use naklo::flac::{BlockType, read_chain};
use naklo::vorbis::encode_comments;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builds a FLAC stream in memory
///
/// The stream always starts with a zeroed STREAMINFO block, and ends with [`audio()`].
pub struct FlacBuilder {
	blocks: Vec<(u8, Vec<u8>)>,
}

impl FlacBuilder {
	pub fn new() -> Self {
		Self {
			blocks: vec![(0, vec![0; 34])],
		}
	}

	pub fn comments(self, vendor: &str, items: &[(&str, &str)]) -> Self {
		let payload = encode_comments(vendor, items.iter().copied()).unwrap();
		self.block(4, payload)
	}

	pub fn padding(self, length: usize) -> Self {
		self.block(1, vec![0; length])
	}

	pub fn block(mut self, ty: u8, content: Vec<u8>) -> Self {
		self.blocks.push((ty, content));
		self
	}

	pub fn build(&self) -> Vec<u8> {
		let mut data = b"fLaC".to_vec();

		for (idx, (ty, content)) in self.blocks.iter().enumerate() {
			let mut header = *ty;
			if idx + 1 == self.blocks.len() {
				header |= 0x80;
			}

			let length = (content.len() as u32).to_be_bytes();
			data.push(header);
			data.extend_from_slice(&length[1..]);
			data.extend_from_slice(content);
		}

		data.extend_from_slice(&audio());
		data
	}
}

/// Something resembling audio frames, long enough that a misplaced byte shows
pub fn audio() -> Vec<u8> {
	let mut audio = vec![0xFF, 0xF8, 0x69, 0x18];
	audio.extend((0..8192_u32).map(|i| (i.wrapping_mul(31) % 251) as u8));
	audio
}

/// The audio frames of a stream
pub fn audio_of(data: &[u8]) -> &[u8] {
	let chain = read_chain(&mut Cursor::new(data), ParsingMode::BestAttempt).unwrap();
	&data[chain.audio_offset() as usize..]
}

/// The types and lengths of all metadata blocks of a stream
pub fn blocks_of(data: &[u8]) -> Vec<(BlockType, u32)> {
	read_chain(&mut Cursor::new(data), ParsingMode::BestAttempt)
		.unwrap()
		.descriptors()
		.map(|d| (d.block_type(), d.length()))
		.collect()
}

/// The comments of a stream, with their keys
pub fn comments_of(data: &[u8]) -> Vec<(String, String)> {
	let chain = read_chain(&mut Cursor::new(data), ParsingMode::BestAttempt).unwrap();
	chain
		.comments()
		.map(|c| {
			c.items()
				.map(|(k, v)| (k.to_owned(), v.to_owned()))
				.collect()
		})
		.unwrap_or_default()
}

/// Write every `(name, content)` pair into a new temporary directory
pub fn temp_dir(files: &[(&str, Vec<u8>)]) -> (TempDir, Vec<PathBuf>) {
	let dir = tempfile::tempdir().unwrap();

	let paths = files
		.iter()
		.map(|(name, content)| {
			let path = dir.path().join(name);
			std::fs::write(&path, content).unwrap();
			path
		})
		.collect();

	(dir, paths)
}

pub fn read(path: impl AsRef<Path>) -> Vec<u8> {
	std::fs::read(path).unwrap()
}
