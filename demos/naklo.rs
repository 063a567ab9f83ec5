#![allow(missing_docs)]

use naklo::batch;
use naklo::config::{
	BatchOptions, CommentPolicy, ModelOptions, ParseOptions, ParsingMode, WriteOptions,
};
use naklo::error::NakloError;
use naklo::flac::WriteOutcome;
use naklo::{model, tagfile};

use structopt::StructOpt;

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(name = "naklo", about = "Write Vorbis comments to FLAC files from a tag file")]
struct Opt {
	/// The tag file, looked for in the current directory when absent
	#[structopt(short, long, parse(from_os_str))]
	tags: Option<PathBuf>,

	/// A file with one title per line, applied to the files in order
	#[structopt(long, parse(from_os_str))]
	titles: Option<PathBuf>,

	/// A file with one target path per line, added before FILES
	#[structopt(short, long, parse(from_os_str))]
	list: Option<PathBuf>,

	/// The number of files to write at the same time
	#[structopt(short, long, default_value = "1")]
	jobs: usize,

	/// Padding to leave when a file has to be rebuilt
	#[structopt(short, long)]
	padding: Option<u32>,

	/// Keep existing comments that the tag file does not mention
	#[structopt(short, long)]
	merge: bool,

	/// Add TRACKNUMBER and TRACKTOTAL from the file order
	#[structopt(short, long)]
	number_tracks: bool,

	/// Reject headers with content after the tag name, and comment fields that are not UTF-8
	#[structopt(short, long)]
	strict: bool,

	#[structopt(parse(from_os_str))]
	files: Vec<PathBuf>,
}

fn fail(error: &NakloError) -> ! {
	eprintln!("ERROR: {error}");
	std::process::exit(error.category().exit_code());
}

fn main() {
	env_logger::init();

	let opt = Opt::from_args();

	let tag_file = match opt.tags {
		Some(path) => path,
		None => tagfile::discover(".").unwrap_or_else(|e| fail(&e)),
	};

	let parsing_mode = if opt.strict {
		ParsingMode::Strict
	} else {
		ParsingMode::BestAttempt
	};

	let parse_options = ParseOptions::new().parsing_mode(parsing_mode);
	let records = tagfile::read_from_path(&tag_file, parse_options).unwrap_or_else(|e| fail(&e));

	let mut files = match opt.list {
		Some(list) => batch::read_file_list(list).unwrap_or_else(|e| fail(&e)),
		None => Vec::new(),
	};
	files.extend(opt.files);

	if files.is_empty() {
		eprintln!("ERROR: No files provided!");
		std::process::exit(1);
	}

	let model_options = ModelOptions::new().number_tracks(opt.number_tracks);

	let mut write_options = WriteOptions::new().parsing_mode(parsing_mode);
	if let Some(padding) = opt.padding {
		write_options = write_options.preferred_padding(padding);
	}
	if opt.merge {
		write_options = write_options.comment_policy(CommentPolicy::Merge);
	}

	let mut bindings = model::build(&records, &files, model_options).unwrap_or_else(|e| fail(&e));
	if let Some(titles) = opt.titles {
		let titles = tagfile::read_titles_from_path(titles).unwrap_or_else(|e| fail(&e));
		model::apply_titles(&mut bindings, titles);
	}

	let report = batch::apply(&bindings, write_options, BatchOptions::new().jobs(opt.jobs));

	for file in report.files() {
		match file.result() {
			Ok(WriteOutcome::Unchanged) => println!("{}: unchanged", file.file_identifier()),
			Ok(WriteOutcome::Written(strategy)) => {
				println!("{}: written ({strategy:?})", file.file_identifier())
			},
			Err(e) => eprintln!("{}: ERROR: {e}", file.file_identifier()),
		}
	}

	std::process::exit(report.exit_code());
}
