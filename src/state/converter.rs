//! Wire record and conversion
//!
//! [`ConnectionState`] is the record exchanged with the control-plane state
//! API. Field names follow the API's camelCase JSON.

use super::resolver::ConnectionStateType;
use super::types::{ensure_unique_descriptors, GlobalCheckpoint, StreamCheckpoint, SyncCheckpoint};
use crate::catalog::StreamDescriptor;
use crate::error::Result;
use crate::types::{ConnectionId, JsonValue};
use serde::{Deserialize, Serialize};

/// Stored checkpoint record for a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub connection_id: ConnectionId,

    pub state_type: ConnectionStateType,

    /// Legacy blob
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_state: Option<Vec<WireStreamState>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_state: Option<WireGlobalState>,
}

/// Per-stream entry of a wire record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStreamState {
    pub stream_descriptor: StreamDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_state: Option<JsonValue>,
}

/// Global section of a wire record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGlobalState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_state: Option<JsonValue>,

    #[serde(default)]
    pub stream_states: Vec<WireStreamState>,
}

impl ConnectionState {
    /// Record with no state
    pub fn not_set(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state_type: ConnectionStateType::NotSet,
            state: None,
            stream_state: None,
            global_state: None,
        }
    }
}

/// Convert a typed checkpoint to its wire record
pub fn to_wire(connection_id: ConnectionId, checkpoint: &SyncCheckpoint) -> ConnectionState {
    let mut record = ConnectionState::not_set(connection_id);
    record.state_type = checkpoint.state_type().into();

    match checkpoint {
        SyncCheckpoint::Empty => {}
        SyncCheckpoint::Legacy(blob) => record.state = Some(blob.clone()),
        SyncCheckpoint::Stream(streams) => {
            record.stream_state = Some(streams.iter().map(stream_to_wire).collect());
        }
        SyncCheckpoint::Global(global) => {
            record.global_state = Some(WireGlobalState {
                shared_state: global.shared_state.clone(),
                stream_states: global.stream_states.iter().map(stream_to_wire).collect(),
            });
        }
    }

    record
}

/// Convert a wire record back to a typed checkpoint
pub fn from_wire(record: &ConnectionState) -> Result<SyncCheckpoint> {
    match record.state_type {
        ConnectionStateType::NotSet => Ok(SyncCheckpoint::Empty),
        ConnectionStateType::Legacy => Ok(SyncCheckpoint::Legacy(
            record.state.clone().unwrap_or(JsonValue::Null),
        )),
        ConnectionStateType::Stream => {
            let streams = streams_from_wire(record.stream_state.as_deref().unwrap_or_default());
            ensure_unique_descriptors(&streams)?;
            Ok(SyncCheckpoint::Stream(streams))
        }
        ConnectionStateType::Global => {
            let global = match &record.global_state {
                Some(wire) => GlobalCheckpoint {
                    shared_state: wire.shared_state.clone(),
                    stream_states: streams_from_wire(&wire.stream_states),
                },
                None => GlobalCheckpoint::default(),
            };
            SyncCheckpoint::global(global)
        }
    }
}

fn stream_to_wire(checkpoint: &StreamCheckpoint) -> WireStreamState {
    WireStreamState {
        stream_descriptor: checkpoint.descriptor.clone(),
        stream_state: Some(checkpoint.state.clone()),
    }
}

fn streams_from_wire(streams: &[WireStreamState]) -> Vec<StreamCheckpoint> {
    streams
        .iter()
        .map(|wire| {
            StreamCheckpoint::new(
                wire.stream_descriptor.clone(),
                wire.stream_state.clone().unwrap_or(JsonValue::Null),
            )
        })
        .collect()
}
