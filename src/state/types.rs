//! Typed checkpoint model
//!
//! A [`SyncCheckpoint`] is built once per persist call from the raw payload
//! and never mutated afterwards. Its variant is the state discriminant.

use crate::catalog::StreamDescriptor;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// State Type
// ============================================================================

/// Internal discriminant of a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateType {
    /// One opaque blob per connection
    Legacy,
    /// One entry per stream
    Stream,
    /// Shared blob plus one entry per stream
    Global,
    /// Nothing stored yet
    Empty,
}

impl StateType {
    /// All discriminants
    pub const ALL: [StateType; 4] = [
        StateType::Legacy,
        StateType::Stream,
        StateType::Global,
        StateType::Empty,
    ];
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateType::Legacy => "LEGACY",
            StateType::Stream => "STREAM",
            StateType::Global => "GLOBAL",
            StateType::Empty => "EMPTY",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Checkpoints
// ============================================================================

/// Resume position for a single stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamCheckpoint {
    /// Stream identity
    pub descriptor: StreamDescriptor,
    /// Opaque resume payload
    pub state: JsonValue,
}

impl StreamCheckpoint {
    /// Create a stream checkpoint
    pub fn new(descriptor: StreamDescriptor, state: JsonValue) -> Self {
        Self { descriptor, state }
    }

    /// Stream name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Stream namespace
    pub fn namespace(&self) -> Option<&str> {
        self.descriptor.namespace.as_deref()
    }
}

/// Global checkpoint (CDC sources)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalCheckpoint {
    /// State shared by every stream
    pub shared_state: Option<JsonValue>,
    /// Per-stream entries
    pub stream_states: Vec<StreamCheckpoint>,
}

/// Typed checkpoint produced by classification
#[derive(Debug, Clone, PartialEq)]
pub enum SyncCheckpoint {
    /// No state
    Empty,
    /// Single opaque blob
    Legacy(JsonValue),
    /// Ordered per-stream entries
    Stream(Vec<StreamCheckpoint>),
    /// Shared blob plus per-stream entries
    Global(GlobalCheckpoint),
}

impl SyncCheckpoint {
    /// Build a per-stream checkpoint, rejecting duplicate descriptors
    pub fn stream(checkpoints: Vec<StreamCheckpoint>) -> Result<Self> {
        ensure_unique_descriptors(&checkpoints)?;
        Ok(Self::Stream(checkpoints))
    }

    /// Build a global checkpoint, rejecting duplicate descriptors
    pub fn global(global: GlobalCheckpoint) -> Result<Self> {
        ensure_unique_descriptors(&global.stream_states)?;
        Ok(Self::Global(global))
    }

    /// Discriminant of this checkpoint
    pub fn state_type(&self) -> StateType {
        match self {
            SyncCheckpoint::Empty => StateType::Empty,
            SyncCheckpoint::Legacy(_) => StateType::Legacy,
            SyncCheckpoint::Stream(_) => StateType::Stream,
            SyncCheckpoint::Global(_) => StateType::Global,
        }
    }

    /// Per-stream entries, empty for legacy and empty checkpoints
    pub fn stream_checkpoints(&self) -> &[StreamCheckpoint] {
        match self {
            SyncCheckpoint::Stream(streams) => streams,
            SyncCheckpoint::Global(global) => &global.stream_states,
            SyncCheckpoint::Empty | SyncCheckpoint::Legacy(_) => &[],
        }
    }

    /// Descriptors covered by this checkpoint
    pub fn descriptors(&self) -> HashSet<&StreamDescriptor> {
        self.stream_checkpoints()
            .iter()
            .map(|checkpoint| &checkpoint.descriptor)
            .collect()
    }
}

/// Reject checkpoints that carry the same stream twice
pub(crate) fn ensure_unique_descriptors(checkpoints: &[StreamCheckpoint]) -> Result<()> {
    let mut seen = HashSet::with_capacity(checkpoints.len());
    for checkpoint in checkpoints {
        if !seen.insert(&checkpoint.descriptor) {
            return Err(Error::malformed(format!(
                "duplicate state for stream '{}'",
                checkpoint.descriptor
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Connector State Messages
// ============================================================================

/// Type tag of a connector state message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateMessageType {
    Global,
    Stream,
    Legacy,
}

/// State message as emitted by a source connector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateMessage {
    /// Message type, absent for pre-typed connectors
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub state_type: Option<StateMessageType>,

    /// Stream section (STREAM messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamStateMessage>,

    /// Global section (GLOBAL messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalStateMessage>,

    /// Legacy blob, kept by connectors for backwards compatibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

/// Stream section of a state message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamStateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_descriptor: Option<StreamDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_state: Option<JsonValue>,
}

/// Global section of a state message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_state: Option<JsonValue>,

    #[serde(default)]
    pub stream_states: Vec<StreamStateMessage>,
}

impl StreamStateMessage {
    /// Convert into a typed stream checkpoint
    pub fn into_checkpoint(self) -> Result<StreamCheckpoint> {
        let descriptor = self
            .stream_descriptor
            .ok_or_else(|| Error::malformed("stream state without stream_descriptor"))?;
        if descriptor.name.is_empty() {
            return Err(Error::malformed("stream descriptor with empty name"));
        }
        Ok(StreamCheckpoint::new(
            descriptor,
            self.stream_state.unwrap_or(JsonValue::Null),
        ))
    }
}
