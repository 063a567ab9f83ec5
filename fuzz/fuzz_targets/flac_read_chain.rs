#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use naklo::config::ParsingMode;

fuzz_target!(|data: Vec<u8>| {
	let _ = naklo::flac::read_chain(&mut Cursor::new(data), ParsingMode::BestAttempt);
});
