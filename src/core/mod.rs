//! Core types - pure abstractions shared across the codebase.

mod error;
mod mode;
mod state;

pub use error::{EmbedError, EmbedResult};
pub use mode::{BuildMode, BuildRunner, Decision, run_gated};
pub use state::{CancelToken, setup_shutdown_handler};
