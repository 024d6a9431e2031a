//! Wire state-type tokens
//!
//! The control-plane API tags every stored record with one of
//! `legacy`, `stream`, `global` or `not_set`. The mapping to [`StateType`]
//! is one-to-one in both directions.

use super::types::StateType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State type as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ConnectionStateType {
    Legacy,
    Stream,
    Global,
    NotSet,
}

impl ConnectionStateType {
    /// Wire token
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStateType::Legacy => "legacy",
            ConnectionStateType::Stream => "stream",
            ConnectionStateType::Global => "global",
            ConnectionStateType::NotSet => "not_set",
        }
    }
}

impl fmt::Display for ConnectionStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStateType {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "legacy" => Ok(ConnectionStateType::Legacy),
            "stream" => Ok(ConnectionStateType::Stream),
            "global" => Ok(ConnectionStateType::Global),
            "not_set" => Ok(ConnectionStateType::NotSet),
            other => Err(Error::unknown_state_type(other)),
        }
    }
}

impl TryFrom<String> for ConnectionStateType {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        token.parse()
    }
}

impl From<ConnectionStateType> for StateType {
    fn from(wire: ConnectionStateType) -> Self {
        match wire {
            ConnectionStateType::Legacy => StateType::Legacy,
            ConnectionStateType::Stream => StateType::Stream,
            ConnectionStateType::Global => StateType::Global,
            ConnectionStateType::NotSet => StateType::Empty,
        }
    }
}

impl From<StateType> for ConnectionStateType {
    fn from(internal: StateType) -> Self {
        match internal {
            StateType::Legacy => ConnectionStateType::Legacy,
            StateType::Stream => ConnectionStateType::Stream,
            StateType::Global => ConnectionStateType::Global,
            StateType::Empty => ConnectionStateType::NotSet,
        }
    }
}

/// Resolve a wire token to the internal discriminant
pub fn resolve_state_type(token: &str) -> Result<StateType> {
    token.parse::<ConnectionStateType>().map(StateType::from)
}

/// Wire token of an internal discriminant
pub fn state_type_token(state_type: StateType) -> &'static str {
    ConnectionStateType::from(state_type).as_str()
}
