use crate::util::{FlacBuilder, audio, audio_of, comments_of, read, temp_dir};

use naklo::batch;
use naklo::config::{
	BatchOptions, GlobalOptions, ModelOptions, ParseOptions, WriteOptions, apply_global_options,
};
use naklo::error::{ErrorCategory, ErrorKind, ModelError};
use naklo::flac::WriteOutcome;
use naklo::tagfile;

const ANIMALS: &str = "\
%album
Animals
%artist
Pink Floyd

%file
1 5
%title
Pigs on the Wing

%file
2
%title
Dogs
";

fn comment(key: &str, value: &str) -> (String, String) {
	(key.to_owned(), value.to_owned())
}

#[test_log::test]
fn sections_are_bound_to_files() {
	let records = tagfile::parse(ANIMALS, ParseOptions::new()).unwrap();
	let files = (1..=5)
		.map(|i| (format!("{i:02}.flac"), FlacBuilder::new().padding(512).build()))
		.collect::<Vec<_>>();
	let files = files
		.iter()
		.map(|(name, content)| (name.as_str(), content.clone()))
		.collect::<Vec<_>>();
	let (_dir, paths) = temp_dir(&files);

	let report = batch::run(
		&records,
		&paths,
		ModelOptions::new(),
		WriteOptions::new(),
		BatchOptions::new(),
	)
	.unwrap();
	assert!(report.is_success());
	assert_eq!(report.exit_code(), 0);

	assert_eq!(
		comments_of(&read(&paths[0])),
		[
			comment("ALBUM", "Animals"),
			comment("ARTIST", "Pink Floyd"),
			comment("TITLE", "Pigs on the Wing")
		]
	);
	assert_eq!(
		comments_of(&read(&paths[1])),
		[
			comment("ALBUM", "Animals"),
			comment("ARTIST", "Pink Floyd"),
			comment("TITLE", "Dogs")
		]
	);
	assert_eq!(
		comments_of(&read(&paths[2])),
		[comment("ALBUM", "Animals"), comment("ARTIST", "Pink Floyd")]
	);
	assert_eq!(comments_of(&read(&paths[4])), comments_of(&read(&paths[0])));
}

#[test_log::test]
fn unresolved_reference_touches_nothing() {
	let records = tagfile::parse("%title\nFoo\n%file\n3\n%title\nBar\n", ParseOptions::new())
		.unwrap();
	let original = FlacBuilder::new().padding(512).build();
	let (_dir, paths) = temp_dir(&[("01.flac", original.clone()), ("02.flac", original.clone())]);

	let err = batch::run(
		&records,
		&paths,
		ModelOptions::new(),
		WriteOptions::new(),
		BatchOptions::new(),
	)
	.unwrap_err();

	assert!(matches!(
		err.kind(),
		ErrorKind::Model(ModelError::UnresolvedTargetReference(target)) if target == "3"
	));
	assert_eq!(err.category(), ErrorCategory::UnresolvedReference);

	for path in &paths {
		assert_eq!(read(path), original);
	}
}

#[test_log::test]
fn failures_are_isolated() {
	let records = tagfile::parse("%album\nAnimals\n", ParseOptions::new()).unwrap();
	let flac = FlacBuilder::new().build();
	let (_dir, paths) = temp_dir(&[
		("01.flac", flac.clone()),
		("02.flac", b"not a flac file".to_vec()),
		("03.flac", flac),
	]);

	let report = batch::run(
		&records,
		&paths,
		ModelOptions::new(),
		WriteOptions::new(),
		BatchOptions::new(),
	)
	.unwrap();

	let results = report
		.files()
		.iter()
		.map(|file| file.is_ok())
		.collect::<Vec<_>>();
	assert_eq!(results, [true, false, true]);
	assert_eq!(report.exit_code(), ErrorCategory::Container.exit_code());

	assert_eq!(read(&paths[1]), b"not a flac file");
	assert_eq!(
		comments_of(&read(&paths[2])),
		[comment("ALBUM", "Animals")]
	);
}

#[test_log::test]
fn parallel_jobs_report_in_order() {
	let mut text = String::from("%album\nAnimals\n");
	for i in 1..=16 {
		text.push_str(&format!("%file\n{i}\n%title\nTrack {i}\n"));
	}
	let records = tagfile::parse(&text, ParseOptions::new()).unwrap();

	let names = (1..=16).map(|i| format!("{i:02}.flac")).collect::<Vec<_>>();
	let files = names
		.iter()
		.enumerate()
		.map(|(i, name)| {
			// Every other file has to be rebuilt
			let builder = FlacBuilder::new();
			let builder = if i % 2 == 0 { builder.padding(256) } else { builder };
			(name.as_str(), builder.build())
		})
		.collect::<Vec<_>>();
	let (_dir, paths) = temp_dir(&files);

	let report = batch::run(
		&records,
		&paths,
		ModelOptions::new().number_tracks(true),
		WriteOptions::new(),
		BatchOptions::new().jobs(4),
	)
	.unwrap();

	assert!(report.is_success());
	for (idx, file) in report.files().iter().enumerate() {
		assert_eq!(file.path(), paths[idx]);
		assert!(matches!(file.result(), Ok(WriteOutcome::Written(_))));

		let written = read(&paths[idx]);
		assert_eq!(audio_of(&written), audio());

		let track = (idx + 1).to_string();
		assert_eq!(
			comments_of(&written),
			[
				comment("ALBUM", "Animals"),
				comment("TITLE", &format!("Track {track}")),
				comment("TRACKNUMBER", &track),
				comment("TRACKTOTAL", "16"),
			]
		);
	}
}

#[test_log::test]
fn workers_inherit_global_options() {
	let records = tagfile::parse("%album\nAnimals\n", ParseOptions::new()).unwrap();
	let names = (1..=4).map(|i| format!("{i:02}.flac")).collect::<Vec<_>>();
	let files = names
		.iter()
		.map(|name| (name.as_str(), FlacBuilder::new().padding(256).build()))
		.collect::<Vec<_>>();
	let (_dir, paths) = temp_dir(&files);

	// Too small for the STREAMINFO block
	apply_global_options(GlobalOptions::new().allocation_limit(16));
	let report = batch::run(
		&records,
		&paths,
		ModelOptions::new(),
		WriteOptions::new(),
		BatchOptions::new().jobs(2),
	)
	.unwrap();
	apply_global_options(GlobalOptions::default());

	assert_eq!(report.failures().count(), 4);
	for (file, (_, original)) in report.files().iter().zip(&files) {
		let err = file.result().as_ref().unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::TooMuchData));
		assert_eq!(&read(file.path()), original);
	}
}
