//! Error types for Solidafy Checkpoint
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Callers pick a remediation from [`Error::kind`]: transport failures may be
//! retried by the orchestrator, migration failures need a full resync.

use crate::catalog::StreamDescriptor;
use thiserror::Error;

/// The main error type for Solidafy Checkpoint
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("State store error: {message}")]
    Store { message: String },

    // ============================================================================
    // Payload Errors
    // ============================================================================
    #[error("Malformed state payload: {message}")]
    MalformedState { message: String },

    #[error("Unknown state type '{token}'")]
    UnknownStateType { token: String },

    // ============================================================================
    // Migration Errors
    // ============================================================================
    #[error(
        "Job ran during migration from legacy state to per-stream state. \
         Streams without state: {}. The job must be retried with a full resync \
         in order to properly store state",
        format_descriptors(.missing)
    )]
    MigrationValidation { missing: Vec<StreamDescriptor> },

    #[error("Refusing to downgrade connection state from {from} to {to}")]
    DowngradeRejected { from: String, to: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad error classes used by callers to choose a remediation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid settings, fix the configuration
    Configuration,
    /// Store unreachable or rejecting, eligible for the caller's retry policy
    Transport,
    /// The checkpoint payload could not be classified
    MalformedPayload,
    /// Incomplete state migration, requires a full resync
    MigrationValidation,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a malformed state error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedState {
            message: message.into(),
        }
    }

    /// Create an unknown state type error
    pub fn unknown_state_type(token: impl Into<String>) -> Self {
        Self::UnknownStateType {
            token: token.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_) => ErrorKind::Configuration,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::Timeout { .. }
            | Error::Store { .. }
            | Error::Io(_) => ErrorKind::Transport,
            Error::MalformedState { .. } | Error::UnknownStateType { .. } => {
                ErrorKind::MalformedPayload
            }
            Error::MigrationValidation { .. } | Error::DowngradeRejected { .. } => {
                ErrorKind::MigrationValidation
            }
        }
    }

    /// Check if the orchestrator may retry the call as-is
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if the job must be re-run as a full resync
    pub fn requires_full_resync(&self) -> bool {
        self.kind() == ErrorKind::MigrationValidation
    }
}

fn format_descriptors(descriptors: &[StreamDescriptor]) -> String {
    descriptors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for Solidafy Checkpoint
pub type Result<T> = std::result::Result<T, Error>;
