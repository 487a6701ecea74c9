//! Watch runtime: a debounced notify watcher feeding a single sync processor.

mod debounce;
mod error;
pub mod git;
pub mod paths;
mod runtime;

pub use error::DaemonError;
pub use runtime::{init_tracing, init_tracing_with, run, start_blocking, WatchOptions};
