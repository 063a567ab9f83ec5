#![no_main]

use libfuzzer_sys::fuzz_target;
use naklo::config::{ModelOptions, ParseOptions, ParsingMode};

fuzz_target!(|data: &[u8]| {
	let Ok(text) = std::str::from_utf8(data) else {
		return;
	};

	for mode in [
		ParsingMode::Strict,
		ParsingMode::BestAttempt,
		ParsingMode::Relaxed,
	] {
		let Ok(records) = naklo::tagfile::parse(text, ParseOptions::new().parsing_mode(mode)) else {
			continue;
		};

		let _ = naklo::model::build(&records, &["1.flac", "2.flac", "3.flac"], ModelOptions::new());
	}
});
