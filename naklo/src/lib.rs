//! Write Vorbis comments to a batch of FLAC files, from a single tag file.
//!
//! A tag file describes the tags for a whole album at once:
//!
//! ```text
//! %album
//! Animals
//! %artist
//! Pink Floyd
//!
//! %file
//! 1 5
//! %title
//! Pigs on the Wing
//!
//! %file
//! 2
//! %title
//! Dogs
//! ```
//!
//! Tags before the first `%file` apply to every file, the others only apply to the files they
//! select. See [`tagfile`] for the syntax, and [`model`] for how sections are bound to files.
//!
//! # Examples
//!
//! ## Tagging a list of files
//!
//! ```rust,no_run
//! # fn main() -> naklo::error::Result<()> {
//! use naklo::batch;
//! use naklo::config::{BatchOptions, ModelOptions, ParseOptions, WriteOptions};
//! use naklo::tagfile;
//!
//! let records = tagfile::read_from_path("tags.txt", ParseOptions::new())?;
//! let files = [
//! 	"01 - Pigs on the Wing 1.flac",
//! 	"02 - Dogs.flac",
//! 	"03 - Pigs (Three Different Ones).flac",
//! 	"04 - Sheep.flac",
//! 	"05 - Pigs on the Wing 2.flac",
//! ];
//!
//! let report = batch::run(
//! 	&records,
//! 	&files,
//! 	ModelOptions::new(),
//! 	WriteOptions::new(),
//! 	BatchOptions::new(),
//! )?;
//!
//! std::process::exit(report.exit_code());
//! # }
//! ```
//!
//! ## Step by step
//!
//! ```rust,no_run
//! # fn main() -> naklo::error::Result<()> {
//! use naklo::config::{ModelOptions, ParseOptions, ParsingMode, WriteOptions};
//! use naklo::flac::{self, write};
//! use naklo::{model, tagfile};
//! use std::fs::File;
//!
//! let records = tagfile::parse("%title\nSheep\n", ParseOptions::new())?;
//! let bindings = model::build(&records, &["04 - Sheep.flac"], ModelOptions::new())?;
//!
//! let binding = &bindings[0];
//! let chain = flac::read_chain(&mut File::open(binding.path())?, ParsingMode::BestAttempt)?;
//!
//! let comments = flac::compose_comments(chain.comments(), binding, WriteOptions::new());
//! let payload = naklo::vorbis::encode_comments(comments.vendor(), comments.items())?;
//!
//! let plan = flac::plan(&chain, &payload, WriteOptions::new())?;
//! println!("Writing with {:?}", plan.strategy());
//!
//! write::apply_to_path(binding.path(), &plan)?;
//! # Ok(()) }
//! ```
//!
//! # Notes
//!
//! * Only the VORBIS_COMMENT and PADDING blocks of a file are ever rewritten
//! * Files are rewritten in place whenever the existing padding allows it. Otherwise, the new file
//!   is written next to the original, and renamed over it.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod batch;
pub mod config;
pub mod error;
pub mod flac;
pub(crate) mod macros;
pub mod model;
pub mod tagfile;
mod util;
pub mod vorbis;

pub use util::io;
