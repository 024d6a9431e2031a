//! Legacy to per-stream migration guards
//!
//! The first per-stream checkpoint written for a connection that used to
//! store a legacy blob must cover every incremental stream. A stream left out
//! would restart from scratch, or worse from a stale position, on the next run.

use super::types::{StateType, StreamCheckpoint};
use crate::catalog::StreamDescriptor;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Did this sync move the connection from legacy to per-stream state?
pub fn is_migration(previous: StateType, new: StateType) -> bool {
    matches!((previous, new), (StateType::Legacy, StateType::Stream))
}

/// Did this sync move the connection from a per-stream shape back to legacy?
pub fn is_downgrade(previous: StateType, new: StateType) -> bool {
    matches!(
        (previous, new),
        (StateType::Stream | StateType::Global, StateType::Legacy)
    )
}

/// Check that every incremental stream has a checkpoint
///
/// The error lists every missing stream, sorted.
pub fn validate_stream_states(
    checkpoints: &[StreamCheckpoint],
    incremental_streams: &HashSet<StreamDescriptor>,
) -> Result<()> {
    let covered: HashSet<&StreamDescriptor> =
        checkpoints.iter().map(|c| &c.descriptor).collect();

    let mut missing: Vec<StreamDescriptor> = incremental_streams
        .iter()
        .filter(|descriptor| !covered.contains(descriptor))
        .cloned()
        .collect();

    if missing.is_empty() {
        debug!(
            streams = incremental_streams.len(),
            "Per-stream state covers every incremental stream"
        );
        return Ok(());
    }

    missing.sort();
    Err(Error::MigrationValidation { missing })
}

/// What to do when a connection goes from per-stream state back to legacy
///
/// A legacy blob is opaque, so stream coverage cannot be checked on a
/// downgrade. The policy decides whether the downgrade is allowed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowngradePolicy {
    /// Persist silently
    #[default]
    Allow,
    /// Persist and log a warning
    Warn,
    /// Refuse to persist
    Reject,
}

impl DowngradePolicy {
    /// Apply the policy to a state transition
    pub fn check(self, previous: StateType, new: StateType) -> Result<()> {
        if !is_downgrade(previous, new) {
            return Ok(());
        }

        match self {
            DowngradePolicy::Allow => Ok(()),
            DowngradePolicy::Warn => {
                warn!(%previous, %new, "Connection state downgraded to legacy");
                Ok(())
            }
            DowngradePolicy::Reject => Err(Error::DowngradeRejected {
                from: previous.to_string(),
                to: new.to_string(),
            }),
        }
    }
}
