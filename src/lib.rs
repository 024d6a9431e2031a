// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy Checkpoint
//!
//! Sync checkpoint persistence for the Solidafy job orchestrator.
//!
//! After every sync job the connector's state is classified, checked against
//! the connection's previous state, and stored so the next run can resume
//! incrementally.
//!
//! ## Features
//!
//! - **State Classification**: Legacy blobs, per-stream and global state messages
//! - **Migration Guard**: Refuses an incomplete legacy to per-stream migration
//! - **Downgrade Policy**: Allow, warn on or reject per-stream to legacy moves
//! - **Pluggable Stores**: In-memory, atomic JSON files, control-plane HTTP API
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_checkpoint::{config::Settings, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::from_file("checkpoint.yaml")?.apply_env_overrides();
//!     let persister = settings.build_persister()?;
//!
//!     let outcome = persister
//!         .persist(connection_id, sync_output.state.as_ref(), &configured_catalog)
//!         .await?;
//!     println!("persisted: {}", outcome.persisted());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     CheckpointPersister                        │
//! │  persist(connection_id, raw_state, catalog) → PersistOutcome   │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────┬──────────────┬──────────┐
//! │   classify   │  migration guards    │   convert    │  store   │
//! ├──────────────┼──────────────────────┼──────────────┼──────────┤
//! │ Legacy       │ is_migration         │ to_wire      │ Memory   │
//! │ Stream       │ validate_stream_...  │ from_wire    │ File     │
//! │ Global       │ DowngradePolicy      │              │ API      │
//! └──────────────┴──────────────────────┴──────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configured catalog model
pub mod catalog;

/// State classification, migration guards and wire conversion
pub mod state;

/// HTTP client for the control-plane API
pub mod http;

/// Checkpoint stores
pub mod store;

/// Feature flag sources
pub mod flags;

/// Checkpoint persistence coordinator
pub mod persister;

/// Settings loading
pub mod config;

/// Logging setup
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{ConfiguredCatalog, StreamDescriptor};
pub use persister::{CheckpointPersister, PersistOutcome};
pub use state::{StateType, SyncCheckpoint};
pub use store::StateStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
