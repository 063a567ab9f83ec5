//! Various configuration options to control naklo

mod batch_options;
mod global_options;
mod model_options;
mod parse_options;
mod write_options;

pub use batch_options::BatchOptions;
pub use global_options::{GlobalOptions, apply_global_options};
pub use model_options::{DuplicatePolicy, ModelOptions};
pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::{CommentPolicy, WriteOptions};

pub(crate) use global_options::global_options;
