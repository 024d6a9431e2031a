//! Checkpoint persister
//!
//! Runs once per completed sync job. Classifies the connector's raw state,
//! guards the legacy to per-stream migration, then upserts the record.
//!
//! # Flow
//!
//! ```text
//! raw payload ─► classify ─► get previous ─► downgrade policy
//!                                 │
//!                                 ▼
//!                 is_migration && STREAM? ─► validate_stream_states
//!                                 │
//!                                 ▼
//!                         to_wire ─► upsert
//! ```
//!
//! Exactly one store read and at most one store write happen per call.
//! A failed validation aborts before the write.
//!
//! Precondition: the orchestrator never persists the same connection from two
//! jobs at once. This type does not lock.

use crate::catalog::ConfiguredCatalog;
use crate::error::Result;
use crate::flags::FeatureFlags;
use crate::state::{
    classify, is_migration, to_wire, validate_stream_states, DowngradePolicy, StateType,
    SyncCheckpoint,
};
use crate::store::StateStore;
use crate::types::{ConnectionId, JsonValue};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a persist call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The sync produced no state
    NoState,
    /// The state held nothing to store (e.g. an empty message list)
    Unclassified,
    /// The state was written
    Persisted { state_type: StateType },
}

impl PersistOutcome {
    /// Whether a record was written
    pub fn persisted(&self) -> bool {
        matches!(self, PersistOutcome::Persisted { .. })
    }
}

/// Coordinates classification, migration checks and storage
#[derive(Clone)]
pub struct CheckpointPersister {
    store: Arc<dyn StateStore>,
    flags: Arc<dyn FeatureFlags>,
    downgrade_policy: DowngradePolicy,
}

impl CheckpointPersister {
    /// Create a persister with the default downgrade policy
    pub fn new(store: Arc<dyn StateStore>, flags: Arc<dyn FeatureFlags>) -> Self {
        Self {
            store,
            flags,
            downgrade_policy: DowngradePolicy::default(),
        }
    }

    /// Set the downgrade policy
    #[must_use]
    pub fn with_downgrade_policy(mut self, policy: DowngradePolicy) -> Self {
        self.downgrade_policy = policy;
        self
    }

    /// Configured downgrade policy
    pub fn downgrade_policy(&self) -> DowngradePolicy {
        self.downgrade_policy
    }

    /// Persist the state produced by a sync job
    #[tracing::instrument(skip_all, fields(connection_id = %connection_id))]
    pub async fn persist(
        &self,
        connection_id: ConnectionId,
        state: Option<&JsonValue>,
        catalog: &ConfiguredCatalog,
    ) -> Result<PersistOutcome> {
        if state.is_none() {
            debug!("Sync produced no state, nothing to persist");
            return Ok(PersistOutcome::NoState);
        }

        let use_stream_capable_state = self.flags.use_stream_capable_state();
        let Some(checkpoint) = classify(state, use_stream_capable_state)? else {
            debug!("State payload holds no checkpoint, nothing to persist");
            return Ok(PersistOutcome::Unclassified);
        };
        let new_type = checkpoint.state_type();

        if let Some(previous) = self.store.get_state(connection_id).await? {
            let previous_type = StateType::from(previous.state_type);
            self.check_transition(previous_type, &checkpoint, catalog)?;
        } else {
            debug!("No previous state, first sync for this connection");
        }

        let record = to_wire(connection_id, &checkpoint);
        self.store
            .create_or_update_state(connection_id, &record)
            .await?;

        info!(state_type = %new_type, "Persisted connection state");
        Ok(PersistOutcome::Persisted {
            state_type: new_type,
        })
    }

    fn check_transition(
        &self,
        previous_type: StateType,
        checkpoint: &SyncCheckpoint,
        catalog: &ConfiguredCatalog,
    ) -> Result<()> {
        let new_type = checkpoint.state_type();
        self.downgrade_policy.check(previous_type, new_type)?;

        if is_migration(previous_type, new_type) {
            if let SyncCheckpoint::Stream(streams) = checkpoint {
                info!(
                    from = %previous_type,
                    to = %new_type,
                    "State migration detected, validating stream coverage"
                );
                validate_stream_states(streams, &catalog.incremental_stream_descriptors())?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for CheckpointPersister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointPersister")
            .field("downgrade_policy", &self.downgrade_policy)
            .finish_non_exhaustive()
    }
}
