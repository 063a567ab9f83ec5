//! Writing the bindings of a whole file list
//!
//! Files are independent of each other. A failure in one file is recorded in the [`BatchReport`],
//! and the remaining files are still written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use naklo::batch;
//! use naklo::config::{BatchOptions, ModelOptions, ParseOptions, WriteOptions};
//! use naklo::tagfile;
//!
//! # fn main() -> naklo::error::Result<()> {
//! let records = tagfile::read_from_path("tags.txt", ParseOptions::new())?;
//! let files = batch::read_file_list("files.txt")?;
//!
//! let report = batch::run(
//! 	&records,
//! 	&files,
//! 	ModelOptions::new(),
//! 	WriteOptions::new(),
//! 	BatchOptions::new().jobs(4),
//! )?;
//!
//! for file in report.files() {
//! 	match file.result() {
//! 		Ok(outcome) => println!("{}: {outcome:?}", file.file_identifier()),
//! 		Err(e) => eprintln!("{}: {e}", file.file_identifier()),
//! 	}
//! }
//! # Ok(()) }
//! ```

use crate::config::{
	BatchOptions, ModelOptions, WriteOptions, apply_global_options, global_options,
};
use crate::error::{NakloError, Result};
use crate::flac::{WriteOutcome, write_binding};
use crate::model::{self, TargetBinding};
use crate::tagfile::TagRecord;
use crate::tagfile::line;

use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// The result of writing a single file
#[derive(Debug)]
pub struct FileReport {
	pub(crate) file_identifier: String,
	pub(crate) path: PathBuf,
	pub(crate) result: Result<WriteOutcome>,
}

impl FileReport {
	/// The file list entry
	pub fn file_identifier(&self) -> &str {
		&self.file_identifier
	}

	/// The path that was written
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// What happened to the file
	pub fn result(&self) -> &Result<WriteOutcome> {
		&self.result
	}

	/// Whether the file was written successfully, or already up to date
	pub fn is_ok(&self) -> bool {
		self.result.is_ok()
	}
}

/// The results of a batch, in file list order
#[derive(Debug)]
pub struct BatchReport {
	pub(crate) files: Vec<FileReport>,
}

impl BatchReport {
	/// All file reports, in file list order
	pub fn files(&self) -> &[FileReport] {
		&self.files
	}

	/// The reports of all files that failed
	pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
		self.files.iter().filter(|file| !file.is_ok())
	}

	/// Whether every file succeeded
	pub fn is_success(&self) -> bool {
		self.files.iter().all(FileReport::is_ok)
	}

	/// The error of the first failed file, in file list order
	pub fn first_error(&self) -> Option<&NakloError> {
		self.files.iter().find_map(|file| file.result.as_ref().err())
	}

	/// The process exit code for this batch
	///
	/// This is `0` when every file succeeded, and the [exit code](crate::error::ErrorCategory::exit_code)
	/// of the first failure otherwise.
	pub fn exit_code(&self) -> i32 {
		self.first_error()
			.map_or(0, |error| error.category().exit_code())
	}
}

/// Write every binding to its file
///
/// With [`BatchOptions::jobs`] greater than 1, files are written on that many threads. The report
/// is always in the order of `bindings`.
///
/// # Examples
///
/// ```rust,no_run
/// use naklo::batch;
/// use naklo::config::{BatchOptions, ModelOptions, WriteOptions};
/// use naklo::tagfile::TagRecord;
///
/// # fn main() -> naklo::error::Result<()> {
/// let records = [TagRecord::new("album", ["Animals"])];
/// let bindings = naklo::model::build(&records, &["01.flac", "02.flac"], ModelOptions::new())?;
///
/// let report = batch::apply(&bindings, WriteOptions::new(), BatchOptions::new());
/// assert!(report.is_success());
/// # Ok(()) }
/// ```
pub fn apply(
	bindings: &[TargetBinding],
	write_options: WriteOptions,
	batch_options: BatchOptions,
) -> BatchReport {
	let jobs = batch_options.jobs.min(bindings.len()).max(1);
	log::debug!("Writing {} file(s) with {jobs} job(s)", bindings.len());

	if jobs == 1 {
		let files = bindings
			.iter()
			.map(|binding| apply_file(binding, write_options))
			.collect();
		return BatchReport { files };
	}

	let pool = match ThreadPoolBuilder::new()
		.num_threads(jobs)
		.thread_name(|idx| format!("naklo-{idx}"))
		.build()
	{
		Ok(pool) => pool,
		Err(e) => {
			log::warn!("Unable to start {jobs} worker threads ({e}), writing one file at a time");
			return apply(bindings, write_options, BatchOptions::new());
		},
	};

	// Global options are thread local
	let options = global_options();
	let files = pool.install(|| {
		bindings
			.par_iter()
			.map_init(
				|| apply_global_options(options),
				|_, binding| apply_file(binding, write_options),
			)
			.collect()
	});

	BatchReport { files }
}

/// Write a single binding, and report the outcome
pub fn apply_file(binding: &TargetBinding, write_options: WriteOptions) -> FileReport {
	let result = write_binding(binding, write_options);

	match &result {
		Ok(outcome) => log::debug!("{}: {outcome:?}", binding.file_identifier()),
		Err(e) => log::warn!("{}: {e}", binding.file_identifier()),
	}

	FileReport {
		file_identifier: binding.file_identifier().to_owned(),
		path: binding.path().to_path_buf(),
		result,
	}
}

/// Bind `records` to `files`, and write them
///
/// The bindings are built before any file is opened, so a tag file that can not be resolved
/// against `files` leaves every file untouched.
///
/// # Errors
///
/// See [`model::build`]. Errors with individual files are part of the [`BatchReport`].
pub fn run<S>(
	records: &[TagRecord],
	files: &[S],
	model_options: ModelOptions,
	write_options: WriteOptions,
	batch_options: BatchOptions,
) -> Result<BatchReport>
where
	S: AsRef<Path>,
{
	let bindings = model::build(records, files, model_options)?;
	Ok(apply(&bindings, write_options, batch_options))
}

/// Read a file list, one path per line
///
/// Lines without any meaningful characters are skipped (see [`tagfile`](crate::tagfile)).
///
/// # Errors
///
/// `path` can not be read, or is not valid UTF-8
pub fn read_file_list<P>(path: P) -> Result<Vec<PathBuf>>
where
	P: AsRef<Path>,
{
	let text = std::fs::read_to_string(path)?;

	let files = text
		.lines()
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.filter(|line| !line::is_meaningless(line))
		.map(PathBuf::from)
		.collect::<Vec<_>>();

	log::debug!("Read {} path(s) from the file list", files.len());
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::{BatchReport, FileReport, read_file_list};
	use crate::error::{ContainerError, ErrorCategory, NakloError};
	use crate::flac::{Strategy, WriteOutcome};

	use std::path::PathBuf;

	fn report(identifier: &str, result: crate::error::Result<WriteOutcome>) -> FileReport {
		FileReport {
			file_identifier: identifier.to_owned(),
			path: PathBuf::from(identifier),
			result,
		}
	}

	#[test_log::test]
	fn exit_code_of_first_failure() {
		let batch = BatchReport {
			files: vec![
				report("01.flac", Ok(WriteOutcome::Written(Strategy::FullRebuild))),
				report("02.flac", Err(NakloError::from(ContainerError::NotAFlacFile))),
				report("03.flac", Err(NakloError::from(std::io::Error::other("gone")))),
			],
		};

		assert!(!batch.is_success());
		assert_eq!(batch.failures().count(), 2);
		assert_eq!(batch.exit_code(), ErrorCategory::Container.exit_code());
	}

	#[test_log::test]
	fn successful_batch() {
		let batch = BatchReport {
			files: vec![report("01.flac", Ok(WriteOutcome::Unchanged))],
		};

		assert!(batch.is_success());
		assert_eq!(batch.exit_code(), 0);
	}

	#[test_log::test]
	fn file_list() {
		let dir = tempfile::tempdir().unwrap();
		let list = dir.path().join("files.txt");
		std::fs::write(&list, "01 - Pigs on the Wing.flac\r\n\n  \t\nDogs.flac\n").unwrap();

		assert_eq!(
			read_file_list(&list).unwrap(),
			[
				PathBuf::from("01 - Pigs on the Wing.flac"),
				PathBuf::from("Dogs.flac")
			]
		);
	}
}
