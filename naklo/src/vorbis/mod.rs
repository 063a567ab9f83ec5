//! Vorbis comments, as stored in a FLAC VORBIS_COMMENT block
//!
//! The block payload is laid out as follows (all integers little-endian):
//!
//! ```text
//! u32 vendor_length | vendor | u32 count | count * (u32 length | "KEY=value")
//! ```
//!
//! Unlike in Ogg streams, there is no framing bit.

pub(crate) mod read;
pub(crate) mod write;

pub use read::read_comments;
pub use write::encode_comments;

/// The vendor string used for newly created comment blocks
pub const DEFAULT_VENDOR: &str = concat!("naklo ", env!("CARGO_PKG_VERSION"));

/// The contents of a VORBIS_COMMENT block
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct VorbisComments {
	pub(crate) vendor: String,
	pub(crate) items: Vec<(String, String)>,
}

impl VorbisComments {
	/// Create a new empty `VorbisComments`
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::vorbis::VorbisComments;
	///
	/// let vorbis_comments = VorbisComments::new("naklo");
	/// assert!(vorbis_comments.is_empty());
	/// ```
	pub fn new(vendor: impl Into<String>) -> Self {
		Self {
			vendor: vendor.into(),
			items: Vec::new(),
		}
	}

	/// Returns the vendor string
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Sets the vendor string
	pub fn set_vendor(&mut self, vendor: String) {
		self.vendor = vendor
	}

	/// All `(key, value)` pairs, in stream order
	///
	/// Keys are returned as they were stored.
	pub fn items(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
		self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Gets all values for a key, in stream order
	///
	/// NOTE: The key is case-insensitive
	///
	/// # Examples
	///
	/// ```rust
	/// use naklo::vorbis::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	/// comments.push(String::from("ARTIST"), String::from("Nick Mason"));
	/// comments.push(String::from("artist"), String::from("Rick Wright"));
	///
	/// assert_eq!(comments.get_all("Artist").count(), 2);
	/// ```
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + Clone + 'a {
		self.items
			.iter()
			.filter_map(move |(k, v)| (k.eq_ignore_ascii_case(key)).then_some(v.as_str()))
	}

	/// Pushes an item to the end of the comment list
	pub fn push(&mut self, key: String, value: String) {
		self.items.push((key, value))
	}

	/// Removes all items with a key, keeping the order of the rest
	///
	/// NOTE: The key is case-insensitive
	pub fn remove(&mut self, key: &str) {
		self.items.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
	}

	/// The number of items
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether there are no items
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
