//! Raw payload classification
//!
//! Turns whatever the connector emitted into a typed [`SyncCheckpoint`].
//! The payload is either a list of connector state messages or a
//! pre-protocol blob that is stored as-is.

use super::types::{
    GlobalCheckpoint, GlobalStateMessage, StateMessage, StateMessageType, StreamStateMessage,
    SyncCheckpoint,
};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use tracing::debug;

/// Classify a raw state payload
///
/// `use_stream_capable_state` keeps STREAM and GLOBAL messages in their own
/// shape. When it is off they collapse to the legacy blob the connector sent
/// alongside them.
///
/// Returns `Ok(None)` when there is nothing to persist.
pub fn classify(
    raw: Option<&JsonValue>,
    use_stream_capable_state: bool,
) -> Result<Option<SyncCheckpoint>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let Ok(messages) = serde_json::from_value::<Vec<StateMessage>>(raw.clone()) else {
        debug!("State payload is not a message list, treating as legacy blob");
        return Ok(Some(SyncCheckpoint::Legacy(raw.clone())));
    };

    if messages.is_empty() {
        return Ok(None);
    }

    if messages.len() == 1 {
        let first_type = messages[0].state_type;
        let checkpoint = match first_type {
            None => SyncCheckpoint::Legacy(raw.clone()),
            Some(StateMessageType::Legacy) => legacy_from_data(&messages[0]),
            Some(StateMessageType::Stream) => {
                stream_checkpoint(messages, use_stream_capable_state)?
            }
            Some(StateMessageType::Global) => {
                global_checkpoint(&messages[0], use_stream_capable_state)?
            }
        };
        return Ok(Some(checkpoint));
    }

    if messages
        .iter()
        .all(|m| m.state_type == Some(StateMessageType::Stream))
    {
        stream_checkpoint(messages, use_stream_capable_state).map(Some)
    } else if messages.iter().all(|m| m.state_type.is_none()) {
        Ok(Some(SyncCheckpoint::Legacy(raw.clone())))
    } else {
        Err(Error::malformed(
            "state contains multiple global messages or conflicting state types",
        ))
    }
}

fn legacy_from_data(message: &StateMessage) -> SyncCheckpoint {
    SyncCheckpoint::Legacy(message.data.clone().unwrap_or(JsonValue::Null))
}

fn stream_checkpoint(
    messages: Vec<StateMessage>,
    use_stream_capable_state: bool,
) -> Result<SyncCheckpoint> {
    if !use_stream_capable_state {
        // The most recent message carries the connector's full legacy blob
        let last = messages.last().map(legacy_from_data);
        return Ok(last.unwrap_or(SyncCheckpoint::Legacy(JsonValue::Null)));
    }

    let checkpoints = messages
        .into_iter()
        .map(|message| {
            message
                .stream
                .ok_or_else(|| Error::malformed("STREAM state message without stream section"))
                .and_then(StreamStateMessage::into_checkpoint)
        })
        .collect::<Result<Vec<_>>>()?;

    SyncCheckpoint::stream(checkpoints)
}

fn global_checkpoint(
    message: &StateMessage,
    use_stream_capable_state: bool,
) -> Result<SyncCheckpoint> {
    if !use_stream_capable_state {
        return Ok(legacy_from_data(message));
    }

    let GlobalStateMessage {
        shared_state,
        stream_states,
    } = message
        .global
        .clone()
        .ok_or_else(|| Error::malformed("GLOBAL state message without global section"))?;

    let stream_states = stream_states
        .into_iter()
        .map(StreamStateMessage::into_checkpoint)
        .collect::<Result<Vec<_>>>()?;

    SyncCheckpoint::global(GlobalCheckpoint {
        shared_state,
        stream_states,
    })
}
