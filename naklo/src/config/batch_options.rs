/// Options to control how a batch of files is processed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct BatchOptions {
	pub(crate) jobs: usize,
}

impl Default for BatchOptions {
	/// The default implementation for `BatchOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// BatchOptions {
	/// 	jobs: 1,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl BatchOptions {
	/// Creates a new `BatchOptions`, alias for `Default` implementation
	///
	/// See also: [`BatchOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::BatchOptions;
	///
	/// let batch_options = BatchOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self { jobs: 1 }
	}

	/// The number of files to process at the same time
	///
	/// Files are independent of each other, so they can be written on separate threads. A value
	/// of `0` is treated as `1`.
	///
	/// NOTE: The same path must never appear twice in one batch when `jobs > 1`.
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::config::BatchOptions;
	///
	/// let batch_options = BatchOptions::new().jobs(4);
	/// ```
	pub fn jobs(&mut self, jobs: usize) -> Self {
		self.jobs = jobs.max(1);
		*self
	}
}
