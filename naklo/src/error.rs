//! Contains the errors that can arise within naklo
//!
//! The primary error is [`NakloError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! Errors are grouped the same way a batch run fails: problems with the tag file and the tag model
//! abort the run before any file is touched, while [`ContainerError`]s and [`WriteError`]s only
//! ever concern a single target file. [`NakloError::category`] exposes that grouping for callers
//! that need to map failures to exit statuses.

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, NakloError>`
pub type Result<T> = std::result::Result<T, NakloError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// Errors that occur while locating, reading, or parsing a tag file
	TagFile(TagFileError),
	/// Errors that occur while building per-file bindings from a parsed tag file
	Model(ModelError),
	/// Errors that occur while reading a FLAC metadata block chain
	Container(ContainerError),
	/// Errors that occur while writing the new metadata to a target file
	Write(WriteError),

	// Data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// Errors that arise from the tag file itself
#[derive(Debug)]
#[non_exhaustive]
pub enum TagFileError {
	/// No tag file could be found
	NotFound,
	/// The tag file exists, but could not be read
	Unreadable(std::io::Error),
	/// A value line appeared before any `%header`, or a header has no name
	///
	/// `line` is 1-based.
	MissingTagName {
		/// The offending line
		line: usize,
	},
	/// The tag file does not contain a single `%header`
	EmptyTagFile,
	/// A header line has content after its name
	///
	/// Only raised with [`ParsingMode::Strict`](crate::config::ParsingMode::Strict), other modes
	/// discard the content.
	TrailingHeaderContent {
		/// The offending line
		line: usize,
	},
}

impl Display for TagFileError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotFound => write!(f, "No tag file could be found"),
			Self::Unreadable(err) => write!(f, "Unable to read the tag file: {err}"),
			Self::MissingTagName { line } => {
				write!(f, "Line {line}: expected a `%tagname` header")
			},
			Self::EmptyTagFile => write!(f, "The tag file does not contain any `%tagname` headers"),
			Self::TrailingHeaderContent { line } => write!(
				f,
				"Line {line}: unexpected content after the tag name in a header"
			),
		}
	}
}

/// Errors that arise while turning tag records into per-file bindings
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
	/// A target selector names a file (or index) absent from the file list
	UnresolvedTargetReference(String),
	/// A tag key is not a valid Vorbis comment field name
	InvalidKey(String),
}

impl Display for ModelError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnresolvedTargetReference(target) => write!(
				f,
				"Target \"{target}\" does not refer to any file in the file list"
			),
			Self::InvalidKey(key) => write!(f, "\"{key}\" is not a valid Vorbis comment field name"),
		}
	}
}

/// Errors that arise while reading a FLAC container
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContainerError {
	/// The file does not start with the `fLaC` stream marker
	NotAFlacFile,
	/// The metadata block chain is inconsistent
	MalformedBlockChain(&'static str),
	/// The stream contains more than one VORBIS_COMMENT block
	DuplicateCommentBlock,
}

impl Display for ContainerError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotAFlacFile => write!(f, "FLAC: File missing \"fLaC\" stream marker"),
			Self::MalformedBlockChain(description) => write!(f, "FLAC: {description}"),
			Self::DuplicateCommentBlock => write!(
				f,
				"FLAC: Streams are only allowed one Vorbis Comments block per stream"
			),
		}
	}
}

/// Errors that arise while writing to a target file
#[derive(Debug)]
#[non_exhaustive]
pub enum WriteError {
	/// Writing into the existing metadata region failed
	PartialWrite(std::io::Error),
	/// The rebuilt file could not be created or moved over the original
	ReplaceFailed(std::io::Error),
}

impl Display for WriteError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::PartialWrite(err) => write!(f, "Failed to write metadata in place: {err}"),
			Self::ReplaceFailed(err) => write!(f, "Failed to replace the original file: {err}"),
		}
	}
}

/// A coarse classification of [`NakloError`]s
///
/// Every category has its own [exit code](ErrorCategory::exit_code), so that a front end can
/// report distinguishable statuses without matching on every [`ErrorKind`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorCategory {
	/// The tag file is missing or unreadable
	TagFileMissing,
	/// The tag file could not be parsed, or contains an invalid key
	Parse,
	/// The tag file references a target that does not exist
	UnresolvedReference,
	/// A target file is not a (well-formed) FLAC file
	Container,
	/// A target file could not be written
	Write,
	/// Anything else (I/O, allocation, ...)
	Other,
}

impl ErrorCategory {
	/// The process exit code associated with this category
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::error::ErrorCategory;
	///
	/// assert_eq!(ErrorCategory::TagFileMissing.exit_code(), 13);
	/// ```
	pub const fn exit_code(self) -> i32 {
		match self {
			Self::TagFileMissing => 13,
			Self::Parse => 2,
			Self::UnresolvedReference => 3,
			Self::Container => 4,
			Self::Write => 5,
			Self::Other => 1,
		}
	}
}

/// Errors that could occur within naklo
pub struct NakloError {
	pub(crate) kind: ErrorKind,
}

impl NakloError {
	/// Create a `NakloError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::error::{ErrorKind, NakloError};
	///
	/// let too_much_data = NakloError::new(ErrorKind::TooMuchData);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::error::{ContainerError, ErrorKind, NakloError};
	///
	/// let error = NakloError::from(ContainerError::NotAFlacFile);
	/// if let ErrorKind::Container(ContainerError::NotAFlacFile) = error.kind() {
	/// 	println!("That's no FLAC file!");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Returns the [`ErrorCategory`] of this error
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::error::{ErrorCategory, ModelError, NakloError};
	///
	/// let error = NakloError::from(ModelError::UnresolvedTargetReference(String::from("14")));
	/// assert_eq!(error.category(), ErrorCategory::UnresolvedReference);
	/// ```
	pub fn category(&self) -> ErrorCategory {
		match self.kind {
			ErrorKind::TagFile(TagFileError::NotFound | TagFileError::Unreadable(_)) => {
				ErrorCategory::TagFileMissing
			},
			ErrorKind::TagFile(_) | ErrorKind::Model(ModelError::InvalidKey(_)) => {
				ErrorCategory::Parse
			},
			ErrorKind::Model(_) => ErrorCategory::UnresolvedReference,
			ErrorKind::Container(_) => ErrorCategory::Container,
			ErrorKind::Write(_) => ErrorCategory::Write,
			_ => ErrorCategory::Other,
		}
	}

	pub(crate) fn is_unexpected_eof(&self) -> bool {
		matches!(&self.kind, ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
	}
}

impl std::error::Error for NakloError {}

impl Debug for NakloError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<TagFileError> for NakloError {
	fn from(input: TagFileError) -> Self {
		Self {
			kind: ErrorKind::TagFile(input),
		}
	}
}

impl From<ModelError> for NakloError {
	fn from(input: ModelError) -> Self {
		Self {
			kind: ErrorKind::Model(input),
		}
	}
}

impl From<ContainerError> for NakloError {
	fn from(input: ContainerError) -> Self {
		Self {
			kind: ErrorKind::Container(input),
		}
	}
}

impl From<WriteError> for NakloError {
	fn from(input: WriteError) -> Self {
		Self {
			kind: ErrorKind::Write(input),
		}
	}
}

impl From<std::io::Error> for NakloError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for NakloError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::collections::TryReserveError> for NakloError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for NakloError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for NakloError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::TagFile(ref err) => write!(f, "{err}"),
			ErrorKind::Model(ref err) => write!(f, "{err}"),
			ErrorKind::Container(ref err) => write!(f, "{err}"),
			ErrorKind::Write(ref err) => write!(f, "{err}"),

			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
