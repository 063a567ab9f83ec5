//! Traits for the targets of [`apply_to`](crate::flac::write::apply_to)
//!
//! [`apply_to_path`](crate::flac::write::apply_to_path) is the usual way to write a file. These
//! traits let a rebuild happen in an already opened [`File`], or in memory.

use crate::error::NakloError;

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> crate::error::Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Shortening a target after its metadata was rebuilt smaller
///
/// # Examples
///
/// ```rust
/// use naklo::io::Truncate;
///
/// let mut data = vec![1, 2, 3, 4, 5];
/// Truncate::truncate(&mut data, 3).unwrap();
///
/// assert_eq!(data, vec![1, 2, 3]);
/// ```
pub trait Truncate {
	/// The error returned by [`truncate`](Truncate::truncate)
	type Error: Into<NakloError>;

	/// Cut the target down to `new_len` bytes
	///
	/// # Errors
	///
	/// Depends on the target, a `Vec<u8>` can't fail.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(new_len as usize);
		Ok(())
	}
}

impl<T> Truncate for Cursor<T>
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

/// The current size of a target, checked against a plan before a rebuild
///
/// # Examples
///
/// ```rust
/// use naklo::io::Length;
///
/// let data = vec![1, 2, 3, 4, 5];
/// assert_eq!(Length::len(&data).unwrap(), 5);
/// ```
pub trait Length {
	/// The error returned by [`len`](Length::len)
	type Error: Into<NakloError>;

	/// The size of the target in bytes
	///
	/// # Errors
	///
	/// Depends on the target, a `Vec<u8>` can't fail.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

/// Anything a FLAC stream can be rewritten in
///
/// Implemented for every type with [`Read`], [`Write`], [`Seek`], [`Truncate`] and [`Length`].
/// naklo trusts these implementations, a `len` that is off **will** corrupt the stream.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<NakloError>,
	<Self as Length>::Error: Into<NakloError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<NakloError>,
	<T as Length>::Error: Into<NakloError>,
{
}
