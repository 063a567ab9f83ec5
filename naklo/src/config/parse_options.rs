/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust
/// use naklo::config::{ParseOptions, ParsingMode};
/// use naklo::tagfile;
///
/// # fn main() -> naklo::error::Result<()> {
/// let text = "%artist  Pink Floyd\n";
///
/// // `BestAttempt` (the default) drops the content after the tag name
/// let records = tagfile::parse(text, ParseOptions::new())?;
/// assert!(records[0].values().is_empty());
///
/// // `Strict` refuses it
/// assert!(tagfile::parse(text, ParseOptions::new().parsing_mode(ParsingMode::Strict)).is_err());
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// Header lines carrying content after the tag name are rejected.
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// Content after the tag name of a header line is discarded, and a warning is logged.
	#[default]
	BestAttempt,
	/// Least eager to error, may produce invalid/partial output
	///
	/// Behaves like [`ParsingMode::BestAttempt`], without the warning.
	Relaxed,
}

/// Options to control how naklo parses a tag file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) join_lines: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	join_lines: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			join_lines: false,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether to join the body lines of a header into a single value
	///
	/// By default, every body line becomes its own value, and is written as a separate comment
	/// with the same field name. When enabled, the lines are joined with `\n` instead.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::ParseOptions;
	/// use naklo::tagfile;
	///
	/// # fn main() -> naklo::error::Result<()> {
	/// let text = "%description\nFirst line\nSecond line\n";
	///
	/// let records = tagfile::parse(text, ParseOptions::new().join_lines(true))?;
	/// assert_eq!(records[0].values(), ["First line\nSecond line"]);
	/// # Ok(()) }
	/// ```
	pub fn join_lines(&mut self, join_lines: bool) -> Self {
		self.join_lines = join_lines;
		*self
	}
}
