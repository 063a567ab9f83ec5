//! Carrying out a [`RewritePlan`] on a file
//!
//! In place plans overwrite a range of the file. Rebuilds go through a temporary file that replaces
//! the original.

use super::plan::RewritePlan;
use crate::error::{NakloError, Result, WriteError};
use crate::macros::err;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

/// Carry out a [`RewritePlan`] on the file at `path`
///
/// In place plans only overwrite the planned range. A [`FullRebuild`](super::Strategy::FullRebuild)
/// writes the new file next to the original, and renames it over the original once complete. The
/// original is never truncated.
///
/// # Errors
///
/// * `path` can not be opened for writing, or writing in place fails ([`WriteError::PartialWrite`])
/// * `path` can not be opened for a rebuild ([`WriteError::ReplaceFailed`])
/// * The new file can not be written ([`WriteError::PartialWrite`]), or put in place of the original ([`WriteError::ReplaceFailed`])
pub fn apply_to_path<P>(path: P, plan: &RewritePlan) -> Result<()>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();

	if !plan.strategy.is_in_place() {
		return replace(path, plan);
	}

	let mut file = OpenOptions::new()
		.write(true)
		.open(path)
		.map_err(WriteError::PartialWrite)?;
	overwrite(&mut file, plan)
		.and_then(|()| file.sync_data())
		.map_err(WriteError::PartialWrite)?;

	log::debug!(
		"Wrote {} byte(s) in place to `{}`",
		plan.new_bytes.len(),
		path.display()
	);
	Ok(())
}

/// Carry out a [`RewritePlan`] on a [`FileLike`]
///
/// Unlike [`apply_to_path`], a [`FullRebuild`](super::Strategy::FullRebuild) rewrites `file` and
/// truncates it, which is not atomic.
///
/// # Errors
///
/// * `file` is shorter than the stream the plan was made for ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
/// * Writing fails ([`WriteError::PartialWrite`])
pub fn apply_to<F>(file: &mut F, plan: &RewritePlan) -> Result<()>
where
	F: FileLike,
	NakloError: From<<F as Truncate>::Error>,
	NakloError: From<<F as Length>::Error>,
{
	if plan.strategy.is_in_place() {
		overwrite(file, plan).map_err(WriteError::PartialWrite)?;
		return Ok(());
	}

	let file_length = Length::len(&*file)?;
	if file_length < plan.audio_offset {
		err!(SizeMismatch);
	}

	file.seek(SeekFrom::Start(plan.audio_offset))?;
	let mut audio = Vec::new();
	file.read_to_end(&mut audio)?;

	file.rewind()?;
	file.write_all(&plan.new_bytes)
		.and_then(|()| file.write_all(&audio))
		.and_then(|()| file.flush())
		.map_err(WriteError::PartialWrite)?;

	let new_length = (plan.new_bytes.len() + audio.len()) as u64;
	file.truncate(new_length)?;

	Ok(())
}

fn overwrite<W>(writer: &mut W, plan: &RewritePlan) -> std::io::Result<()>
where
	W: Write + Seek,
{
	writer.seek(SeekFrom::Start(plan.range.start))?;
	writer.write_all(&plan.new_bytes)?;
	writer.flush()
}

fn replace(path: &Path, plan: &RewritePlan) -> Result<()> {
	let mut original = File::open(path).map_err(WriteError::ReplaceFailed)?;
	let permissions = original
		.metadata()
		.map_err(WriteError::ReplaceFailed)?
		.permissions();

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	// Removed on drop, unless persisted
	let mut temp = tempfile::Builder::new()
		.prefix(".naklo")
		.suffix(".tmp")
		.tempfile_in(dir)
		.map_err(WriteError::ReplaceFailed)?;

	log::debug!(
		"Rebuilding `{}` through `{}`",
		path.display(),
		temp.path().display()
	);

	write_rebuilt(temp.as_file_mut(), &mut original, plan).map_err(WriteError::PartialWrite)?;
	temp.as_file()
		.set_permissions(permissions)
		.map_err(WriteError::ReplaceFailed)?;

	drop(original);
	temp.persist(path)
		.map_err(|e| WriteError::ReplaceFailed(e.error))?;

	Ok(())
}

fn write_rebuilt(temp: &mut File, original: &mut File, plan: &RewritePlan) -> std::io::Result<()> {
	temp.write_all(&plan.new_bytes)?;

	original.seek(SeekFrom::Start(plan.audio_offset))?;
	let audio_length = std::io::copy(original, temp)?;
	log::trace!("Copied {audio_length} byte(s) of audio frames");

	temp.sync_all()
}
