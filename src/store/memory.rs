//! In-memory state store

use super::StateStore;
use crate::error::Result;
use crate::state::ConnectionState;
use crate::types::ConnectionId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State store backed by a shared map
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<ConnectionId, ConnectionState>>>,
}

impl InMemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections with stored state
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    /// Whether no state is stored
    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get_state(&self, connection_id: ConnectionId) -> Result<Option<ConnectionState>> {
        Ok(self.states.read().await.get(&connection_id).cloned())
    }

    async fn create_or_update_state(
        &self,
        connection_id: ConnectionId,
        state: &ConnectionState,
    ) -> Result<()> {
        self.states
            .write()
            .await
            .insert(connection_id, state.clone());
        Ok(())
    }
}
