use crate::util::{FlacBuilder, audio, audio_of, blocks_of, comments_of, read, temp_dir};

use std::io::Cursor;

use naklo::config::{CommentPolicy, ModelOptions, WriteOptions};
use naklo::error::{ContainerError, ErrorKind};
use naklo::flac::{BlockType, Strategy, WriteOutcome, write_binding, write_binding_to};
use naklo::model::{self, TargetBinding};
use naklo::tagfile::TagRecord;

fn bind(path: &std::path::Path, records: &[TagRecord]) -> TargetBinding {
	model::build(records, &[path], ModelOptions::new())
		.unwrap()
		.remove(0)
}

fn animals() -> Vec<TagRecord> {
	vec![
		TagRecord::new("artist", ["Pink Floyd"]),
		TagRecord::new("album", ["Animals"]),
		TagRecord::new("title", ["Pigs (Three Different Ones)"]),
	]
}

#[test_log::test]
fn enough_padding_is_written_in_place() {
	let original = FlacBuilder::new()
		.block(3, vec![0x11; 36])
		.comments("reference libFLAC 1.3.2 20170101", &[("TITLE", "Pigs")])
		.padding(1024)
		.build();
	let (_dir, paths) = temp_dir(&[("pigs.flac", original.clone())]);

	let outcome = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::GrowWithinPadding));

	let written = read(&paths[0]);
	assert_eq!(written.len(), original.len());
	assert_eq!(audio_of(&written), audio());

	// The SEEKTABLE in front of the comments is untouched
	assert_eq!(written[..4 + 38 + 40], original[..4 + 38 + 40]);

	assert_eq!(
		comments_of(&written),
		[
			(String::from("ARTIST"), String::from("Pink Floyd")),
			(String::from("ALBUM"), String::from("Animals")),
			(
				String::from("TITLE"),
				String::from("Pigs (Three Different Ones)")
			),
		]
	);
}

#[test_log::test]
fn insufficient_padding_rebuilds() {
	let picture = (0..=255).collect::<Vec<u8>>();
	let original = FlacBuilder::new()
		.block(6, picture.clone())
		.comments("reference libFLAC 1.3.2 20170101", &[("TITLE", "Pigs")])
		.build();
	let (dir, paths) = temp_dir(&[("pigs.flac", original)]);

	let outcome = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::FullRebuild));

	let written = read(&paths[0]);
	assert_eq!(audio_of(&written), audio());

	let blocks = blocks_of(&written);
	assert_eq!(blocks[0], (BlockType::StreamInfo, 34));
	assert_eq!(blocks[1], (BlockType::Picture, 256));
	assert_eq!(blocks[2].0, BlockType::VorbisComment);
	assert_eq!(
		blocks[3],
		(BlockType::Padding, WriteOptions::DEFAULT_PREFERRED_PADDING)
	);

	let picture_offset = 4 + 38 + 4;
	assert_eq!(&written[picture_offset..picture_offset + 256], picture);

	// Nothing is left behind
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

	// The new padding makes the next edit cheap
	let sheep = [TagRecord::new("title", ["Sheep"])];
	let outcome = write_binding(&bind(&paths[0], &sheep), WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::ShrinkIntoPadding));
	assert_eq!(read(&paths[0]).len(), written.len());
}

#[cfg(unix)]
#[test_log::test]
fn rebuild_keeps_permissions() {
	use std::os::unix::fs::PermissionsExt;

	let original = FlacBuilder::new().build();
	let (_dir, paths) = temp_dir(&[("dogs.flac", original)]);

	std::fs::set_permissions(&paths[0], std::fs::Permissions::from_mode(0o640)).unwrap();

	let outcome = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::FullRebuild));

	let mode = std::fs::metadata(&paths[0]).unwrap().permissions().mode();
	assert_eq!(mode & 0o777, 0o640);
}

#[test_log::test]
fn second_application_is_identical() {
	let original = FlacBuilder::new()
		.comments("libFLAC", &[("TITLE", "Dogs"), ("DATE", "1977")])
		.padding(16)
		.build();
	let (_dir, paths) = temp_dir(&[("dogs.flac", original)]);

	let binding = bind(&paths[0], &animals());
	for write_options in [
		WriteOptions::new(),
		WriteOptions::new().comment_policy(CommentPolicy::Merge),
	] {
		write_binding(&binding, write_options).unwrap();
		let first = read(&paths[0]);

		let outcome = write_binding(&binding, write_options).unwrap();
		assert_eq!(outcome, WriteOutcome::Unchanged);
		assert_eq!(read(&paths[0]), first);
	}
}

#[test_log::test]
fn merge_keeps_unmentioned_comments() {
	let original = FlacBuilder::new()
		.comments("libFLAC", &[("TITLE", "Dogs"), ("DATE", "1977")])
		.padding(256)
		.build();
	let (_dir, paths) = temp_dir(&[("dogs.flac", original)]);

	let records = [
		TagRecord::new("title", ["Dogs"]),
		TagRecord::new("artist", ["Pink Floyd"]),
	];
	let write_options = WriteOptions::new().comment_policy(CommentPolicy::Merge);
	write_binding(&bind(&paths[0], &records), write_options).unwrap();

	assert_eq!(
		comments_of(&read(&paths[0])),
		[
			(String::from("DATE"), String::from("1977")),
			(String::from("TITLE"), String::from("Dogs")),
			(String::from("ARTIST"), String::from("Pink Floyd")),
		]
	);
}

#[test_log::test]
fn empty_value_removes_key() {
	let original = FlacBuilder::new()
		.comments("libFLAC", &[("TITLE", "Dogs"), ("DATE", "1977")])
		.padding(256)
		.build();
	let (_dir, paths) = temp_dir(&[("dogs.flac", original)]);

	let records = [TagRecord::new("date", Vec::<String>::new())];
	let write_options = WriteOptions::new().comment_policy(CommentPolicy::Merge);
	write_binding(&bind(&paths[0], &records), write_options).unwrap();

	assert_eq!(
		comments_of(&read(&paths[0])),
		[(String::from("TITLE"), String::from("Dogs"))]
	);
}

#[test_log::test]
fn not_a_flac_file_is_untouched() {
	let mut original = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
	original.extend(FlacBuilder::new().build());
	let (_dir, paths) = temp_dir(&[("sheep.mp3", original.clone())]);

	let err = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::Container(ContainerError::NotAFlacFile)
	));
	assert_eq!(read(&paths[0]), original);
}

#[test_log::test]
fn duplicate_comment_blocks_are_untouched() {
	let original = FlacBuilder::new()
		.comments("libFLAC", &[("ARTIST", "Artist 1")])
		.comments("libFLAC", &[("ARTIST", "Artist 2")])
		.padding(1024)
		.build();
	let (_dir, paths) = temp_dir(&[("sheep.flac", original.clone())]);

	let err = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::Container(ContainerError::DuplicateCommentBlock)
	));
	assert_eq!(read(&paths[0]), original);
}

#[test_log::test]
fn truncated_chain_is_untouched() {
	let mut original = FlacBuilder::new()
		.comments("libFLAC", &[("ARTIST", "Pink Floyd")])
		.build();
	original.truncate(4 + 38 + 10);
	let (_dir, paths) = temp_dir(&[("sheep.flac", original.clone())]);

	let err = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::Container(ContainerError::MalformedBlockChain(_))
	));
	assert_eq!(read(&paths[0]), original);
}

#[test_log::test]
fn reserved_blocks_are_preserved() {
	let reserved = b"some future block".to_vec();
	let application = b"naklAPPLICATION DATA".to_vec();
	let original = FlacBuilder::new()
		.block(2, application.clone())
		.block(100, reserved.clone())
		.build();

	let mut file = Cursor::new(original);
	let binding = bind(std::path::Path::new("memory.flac"), &animals());
	let outcome = write_binding_to(&mut file, &binding, WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::FullRebuild));

	let written = file.into_inner();
	assert_eq!(audio_of(&written), audio());

	let blocks = blocks_of(&written);
	assert_eq!(
		blocks.iter().map(|(ty, _)| *ty).collect::<Vec<_>>(),
		[
			BlockType::StreamInfo,
			BlockType::VorbisComment,
			BlockType::Application,
			BlockType::Reserved(100),
			BlockType::Padding,
		]
	);

	let application_offset = 4 + 38 + 4 + blocks[1].1 as usize + 4;
	let reserved_offset = application_offset + application.len() + 4;
	assert_eq!(
		&written[application_offset..application_offset + application.len()],
		application
	);
	assert_eq!(
		&written[reserved_offset..reserved_offset + reserved.len()],
		reserved
	);
}

#[test_log::test]
fn padding_before_comments_is_used() {
	let original = FlacBuilder::new()
		.padding(4096)
		.comments("reference libFLAC 1.3.2 20170101", &[("TITLE", "Pigs")])
		.build();
	let (_dir, paths) = temp_dir(&[("pigs.flac", original.clone())]);

	let outcome = write_binding(&bind(&paths[0], &animals()), WriteOptions::new()).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::GrowWithinPadding));

	let written = read(&paths[0]);
	assert_eq!(written.len(), original.len());
	assert_eq!(audio_of(&written), audio());
	assert_eq!(
		blocks_of(&written)
			.iter()
			.map(|(ty, _)| *ty)
			.collect::<Vec<_>>(),
		[BlockType::StreamInfo, BlockType::VorbisComment, BlockType::Padding]
	);
	assert_eq!(comments_of(&written).len(), 3);
}

#[test_log::test]
fn rebuild_in_open_file() {
	let original = FlacBuilder::new()
		.comments("reference libFLAC 1.3.2 20170101", &[("TITLE", "Pigs")])
		.build();
	let (_dir, paths) = temp_dir(&[("pigs.flac", original)]);

	let mut file = std::fs::OpenOptions::new()
		.read(true)
		.write(true)
		.open(&paths[0])
		.unwrap();
	let binding = bind(&paths[0], &animals());
	let write_options = WriteOptions::new().preferred_padding(0);
	let outcome = write_binding_to(&mut file, &binding, write_options).unwrap();
	assert_eq!(outcome, WriteOutcome::Written(Strategy::FullRebuild));
	drop(file);

	let written = read(&paths[0]);
	assert_eq!(audio_of(&written), audio());
	assert_eq!(
		blocks_of(&written)
			.iter()
			.map(|(ty, _)| *ty)
			.collect::<Vec<_>>(),
		[BlockType::StreamInfo, BlockType::VorbisComment]
	);
}
