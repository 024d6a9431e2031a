//! Checkpoint store module
//!
//! The store is the only collaborator the persister performs I/O against:
//! one read of the previous record, then at most one upsert.
//!
//! # Implementations
//!
//! - `InMemoryStateStore` - Shared map, for tests and embedded use
//! - `FileStateStore` - One JSON file per connection with atomic writes
//! - `ApiStateStore` - Control-plane HTTP API
//!
//! # Concurrency
//!
//! Callers must not persist the same connection concurrently. If they do,
//! every implementation here is last-write-wins.

mod api;
mod file;
mod memory;

pub use api::ApiStateStore;
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;

use crate::error::Result;
use crate::state::ConnectionState;
use crate::types::ConnectionId;
use async_trait::async_trait;

/// Storage for the latest checkpoint of each connection
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch the stored record, `None` if the connection never persisted state
    async fn get_state(&self, connection_id: ConnectionId) -> Result<Option<ConnectionState>>;

    /// Create or replace the stored record
    async fn create_or_update_state(
        &self,
        connection_id: ConnectionId,
        state: &ConnectionState,
    ) -> Result<()>;
}
