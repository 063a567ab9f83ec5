use super::{DEFAULT_VENDOR, VorbisComments};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{err, try_vec};

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

/// Read the payload of a VORBIS_COMMENT block
///
/// `len` is the size of the payload, and every length field is checked against it.
///
/// Fields that are not valid UTF-8 are read as Latin-1, unless `parsing_mode` is [`ParsingMode::Strict`].
///
/// # Errors
///
/// * A length field exceeds the remaining payload ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
/// * A field is not valid UTF-8, with [`ParsingMode::Strict`] ([`ErrorKind::StringFromUtf8`](crate::error::ErrorKind::StringFromUtf8))
/// * `data` ends early
///
/// # Examples
///
/// ```rust
/// use naklo::config::ParsingMode;
/// use naklo::vorbis::{VorbisComments, encode_comments, read_comments};
///
/// # fn main() -> naklo::error::Result<()> {
/// let mut comments = VorbisComments::new("naklo");
/// comments.push(String::from("TITLE"), String::from("Money"));
///
/// let payload = encode_comments(comments.vendor(), comments.items())?;
/// let decoded = read_comments(&mut &payload[..], payload.len() as u64, ParsingMode::Strict)?;
/// assert_eq!(decoded, comments);
/// # Ok(()) }
/// ```
pub fn read_comments<R>(
	data: &mut R,
	mut len: u64,
	parsing_mode: ParsingMode,
) -> Result<VorbisComments>
where
	R: Read,
{
	len = len.saturating_sub(4);

	let vendor_len = data.read_u32::<LittleEndian>()?;
	if u64::from(vendor_len) > len {
		err!(SizeMismatch);
	}

	let mut vendor_bytes = try_vec![0; vendor_len as usize];
	data.read_exact(&mut vendor_bytes)?;

	len -= u64::from(vendor_len);

	let vendor = match String::from_utf8(vendor_bytes) {
		Ok(vendor) => vendor,
		Err(_) => {
			log::warn!("Vendor string is not valid UTF-8, replacing it with \"{DEFAULT_VENDOR}\"");
			String::from(DEFAULT_VENDOR)
		},
	};

	let number_of_items = data.read_u32::<LittleEndian>()?;
	len = len.saturating_sub(4);

	// Every item needs at least its own length field
	if u64::from(number_of_items) > (len >> 2) {
		err!(SizeMismatch);
	}

	let mut tag = VorbisComments {
		vendor,
		items: Vec::with_capacity(number_of_items as usize),
	};

	for _ in 0..number_of_items {
		let comment_len = data.read_u32::<LittleEndian>()?;
		len = len.saturating_sub(4);
		if u64::from(comment_len) > len {
			err!(SizeMismatch);
		}

		let mut comment_bytes = try_vec![0; comment_len as usize];
		data.read_exact(&mut comment_bytes)?;

		len -= u64::from(comment_len);

		// KEY=VALUE
		let comment = match String::from_utf8(comment_bytes) {
			Ok(comment) => comment,
			Err(e) => {
				if parsing_mode == ParsingMode::Strict {
					return Err(e.into());
				}

				if parsing_mode == ParsingMode::BestAttempt {
					log::warn!("Comment field is not valid UTF-8, reading it as Latin-1");
				}

				e.into_bytes().into_iter().map(char::from).collect()
			},
		};
		let Some((key, value)) = comment.split_once('=') else {
			log::warn!("No separator found in field, discarding");
			continue;
		};

		tag.items.push((key.to_owned(), value.to_owned()));
	}

	Ok(tag)
}
