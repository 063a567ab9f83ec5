#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use naklo::config::{ParsingMode, WriteOptions};
use naklo::flac::{plan, read_chain, write};

// The first byte picks the size of the new comment block, the rest is the file
fuzz_target!(|data: &[u8]| {
	let Some((&size, file)) = data.split_first() else {
		return;
	};

	let Ok(chain) = read_chain(&mut Cursor::new(file), ParsingMode::BestAttempt) else {
		return;
	};

	// An empty vendor string and no items, followed by filler
	let payload = vec![0; 8 + usize::from(size) * 8];
	let Ok(plan) = plan(&chain, &payload, WriteOptions::new()) else {
		return;
	};

	let mut rewritten = Cursor::new(file.to_vec());
	write::apply_to(&mut rewritten, &plan).unwrap();

	// Anything that was read once has to be readable after a rewrite
	let rewritten = rewritten.into_inner();
	let new_chain = read_chain(&mut Cursor::new(&rewritten[..]), ParsingMode::BestAttempt).unwrap();
	assert_eq!(
		&rewritten[new_chain.audio_offset() as usize..],
		&file[chain.audio_offset() as usize..]
	);
});
