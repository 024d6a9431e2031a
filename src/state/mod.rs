//! State classification and migration module
//!
//! Everything needed to turn a connector's raw state payload into a record
//! that is safe to store.
//!
//! # Overview
//!
//! The state module provides:
//! - `classify` - Raw payload to typed `SyncCheckpoint`
//! - `ConnectionStateType` - Wire tokens and their mapping to `StateType`
//! - `is_migration` / `validate_stream_states` - Legacy to per-stream guards
//! - `to_wire` / `from_wire` - Conversion to the stored `ConnectionState`

mod classifier;
mod converter;
mod migration;
mod resolver;
mod types;

pub use classifier::classify;
pub use converter::{from_wire, to_wire, ConnectionState, WireGlobalState, WireStreamState};
pub use migration::{is_downgrade, is_migration, validate_stream_states, DowngradePolicy};
pub use resolver::{resolve_state_type, state_type_token, ConnectionStateType};
pub use types::{
    GlobalCheckpoint, GlobalStateMessage, StateMessage, StateMessageType, StateType,
    StreamCheckpoint, StreamStateMessage, SyncCheckpoint,
};

#[cfg(test)]
mod tests;
