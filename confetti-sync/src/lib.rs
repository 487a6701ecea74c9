//! # confetti-sync
//!
//! Hidden-artifact synchronization engine.
//!
//! Build a [`Synchronizer`] for a project root, then call
//! [`Synchronizer::upsert_hidden_component`] for each changed file,
//! [`Synchronizer::upsert_hidden_map`] to rebuild the Map, or
//! [`Synchronizer::save_standard_hidden_files`] for a full standard resync.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod map;
pub mod naming;
pub mod pipeline;
pub mod transport;
pub mod writer;

pub use config::SyncConfig;
pub use error::{SyncError, TransportError};
pub use naming::{classify, Classification};
pub use pipeline::{SyncOutcome, Synchronizer};
pub use transport::{Transport, UreqTransport};
pub use writer::{write_file, WriteResult};
