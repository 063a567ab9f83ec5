/// How repeated keys within one section of a tag file are handled
///
/// Vorbis comments allow a field name to appear any number of times, so nothing is lost by
/// default.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum DuplicatePolicy {
	/// Every value is kept as an independent comment
	#[default]
	Accumulate,
	/// Only the values of the last occurrence are kept
	LastWins,
}

/// Options to control how tag records are bound to target files
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ModelOptions {
	pub(crate) duplicates: DuplicatePolicy,
	pub(crate) number_tracks: bool,
}

impl Default for ModelOptions {
	/// The default implementation for `ModelOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ModelOptions {
	/// 	duplicates: DuplicatePolicy::Accumulate,
	/// 	number_tracks: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ModelOptions {
	/// Creates a new `ModelOptions`, alias for `Default` implementation
	///
	/// See also: [`ModelOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::ModelOptions;
	///
	/// let model_options = ModelOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			duplicates: DuplicatePolicy::Accumulate,
			number_tracks: false,
		}
	}

	/// How repeated keys within one section are handled, see [`DuplicatePolicy`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::{DuplicatePolicy, ModelOptions};
	///
	/// // I only ever want one ARTIST per file
	/// let model_options = ModelOptions::new().duplicates(DuplicatePolicy::LastWins);
	/// ```
	pub fn duplicates(&mut self, duplicates: DuplicatePolicy) -> Self {
		self.duplicates = duplicates;
		*self
	}

	/// Whether to number the files
	///
	/// When enabled, every file gets a `tracknumber` (its 1-based position in the file list) and a
	/// `tracktotal` (the length of the file list), unless the tag file sets them itself.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::ModelOptions;
	///
	/// let model_options = ModelOptions::new().number_tracks(true);
	/// ```
	pub fn number_tracks(&mut self, number_tracks: bool) -> Self {
		self.number_tracks = number_tracks;
		*self
	}
}
