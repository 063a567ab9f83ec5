use crate::error::Result;
use crate::macros::err;

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

// The largest payload a FLAC metadata block can hold
const MAX_PAYLOAD_SIZE: usize = (1 << 24) - 1;

/// Encode the payload of a VORBIS_COMMENT block
///
/// Keys and values are written exactly as given.
///
/// # Errors
///
/// The payload would not fit into a FLAC metadata block ([`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData))
pub fn encode_comments<'a, I>(vendor: &str, items: I) -> Result<Vec<u8>>
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut packet = Cursor::new(Vec::new());

	let vendor_bytes = vendor.as_bytes();
	packet.write_u32::<LittleEndian>(vendor_bytes.len() as u32)?;
	packet.write_all(vendor_bytes)?;

	// Zero out the item count for later
	let item_count_pos = packet.stream_position()?;
	packet.write_u32::<LittleEndian>(0)?;

	let mut count = 0_u32;
	for (key, value) in items {
		let comment_len = key.len() + 1 + value.len();
		if packet.get_ref().len() + 4 + comment_len > MAX_PAYLOAD_SIZE {
			err!(TooMuchData);
		}

		packet.write_u32::<LittleEndian>(comment_len as u32)?;
		packet.write_all(key.as_bytes())?;
		packet.write_all(b"=")?;
		packet.write_all(value.as_bytes())?;

		count += 1;
	}

	if packet.get_ref().len() > MAX_PAYLOAD_SIZE {
		err!(TooMuchData);
	}

	// Seek back and write the item count
	packet.seek(SeekFrom::Start(item_count_pos))?;
	packet.write_u32::<LittleEndian>(count)?;

	log::trace!(
		"Encoded {count} comment(s), payload size: {}",
		packet.get_ref().len()
	);
	Ok(packet.into_inner())
}
