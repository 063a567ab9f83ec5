use crate::config::ParsingMode;

/// What happens to the comments already present in a file
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum CommentPolicy {
	/// The new comment block only contains the tags bound to the file
	#[default]
	Replace,
	/// Existing comments are kept, unless the tag file mentions their key
	Merge,
}

/// Options to control how naklo writes to a file
///
/// This acts as a dumping ground for all sorts of settings. As such, this is best
/// used as an application global config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) uppercase_keys: bool,
	pub(crate) comment_policy: CommentPolicy,
	pub(crate) parsing_mode: ParsingMode,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			uppercase_keys: true,
			comment_policy: CommentPolicy::Replace,
			parsing_mode: ParsingMode::BestAttempt,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// When a file has to be rebuilt, a PADDING block of this size is placed at the end of the
	/// metadata, so that later edits can happen in place.
	///
	/// NOTES:
	///
	/// * Existing padding is only ever consumed or grown in place, this is not a target size for it
	/// * The size is clamped to the largest possible block size
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to upper case field names when writing
	///
	/// Vorbis comment field names are case-insensitive, but upper case is the convention.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::WriteOptions;
	///
	/// // Write `artist=...` rather than `ARTIST=...`
	/// let options = WriteOptions::new().uppercase_keys(false);
	/// ```
	pub fn uppercase_keys(mut self, uppercase_keys: bool) -> Self {
		self.uppercase_keys = uppercase_keys;
		self
	}

	/// What to do with existing comments, see [`CommentPolicy`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::{CommentPolicy, WriteOptions};
	///
	/// // Only touch the fields mentioned in the tag file
	/// let options = WriteOptions::new().comment_policy(CommentPolicy::Merge);
	/// ```
	pub fn comment_policy(mut self, comment_policy: CommentPolicy) -> Self {
		self.comment_policy = comment_policy;
		self
	}

	/// How strictly the existing VORBIS_COMMENT block is decoded
	///
	/// With anything but [`ParsingMode::Strict`], fields that are not valid UTF-8 are read as
	/// Latin-1, and are written back as UTF-8.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::{ParsingMode, WriteOptions};
	///
	/// // Refuse to touch files with badly encoded comments
	/// let options = WriteOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 1024,
	///     uppercase_keys: true,
	///     comment_policy: CommentPolicy::Replace,
	///     parsing_mode: ParsingMode::BestAttempt,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
