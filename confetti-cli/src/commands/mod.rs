pub mod project;
pub mod status;
pub mod sync;
pub mod watch;
