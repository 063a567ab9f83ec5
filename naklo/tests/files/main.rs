#![allow(missing_docs)]

mod batch;
mod flac;
mod util;
