//! Configured catalog model
//!
//! The configured catalog is owned by the orchestrator and is read-only here.
//! It is only consulted to find out which streams need a resume checkpoint.

use crate::types::{DestinationSyncMode, JsonValue, SyncMode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Stream Descriptor
// ============================================================================

/// Identity of a stream, shared by catalog entries and checkpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Stream name
    pub name: String,

    /// Optional namespace (schema, database, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl StreamDescriptor {
    /// Create a descriptor without a namespace
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Create a descriptor with a namespace
    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// Stream namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: JsonValue,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,
}

impl CatalogStream {
    /// Descriptor identifying this stream
    pub fn descriptor(&self) -> StreamDescriptor {
        StreamDescriptor {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

/// Configured stream for sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Destination sync mode
    #[serde(default)]
    pub destination_sync_mode: DestinationSyncMode,

    /// Cursor field to use
    #[serde(default)]
    pub cursor_field: Option<Vec<String>>,

    /// Primary key to use
    #[serde(default)]
    pub primary_key: Option<Vec<Vec<String>>>,
}

impl ConfiguredStream {
    /// Create a configured stream with the given sync mode
    pub fn new(name: impl Into<String>, namespace: Option<String>, sync_mode: SyncMode) -> Self {
        Self {
            stream: CatalogStream {
                name: name.into(),
                namespace,
                json_schema: JsonValue::Object(serde_json::Map::new()),
                supported_sync_modes: vec![SyncMode::FullRefresh, SyncMode::Incremental],
            },
            sync_mode,
            destination_sync_mode: DestinationSyncMode::default(),
            cursor_field: None,
            primary_key: None,
        }
    }
}

impl ConfiguredCatalog {
    /// Create a catalog from configured streams
    pub fn new(streams: Vec<ConfiguredStream>) -> Self {
        Self { streams }
    }

    /// Descriptors of every stream configured for incremental sync
    pub fn incremental_stream_descriptors(&self) -> HashSet<StreamDescriptor> {
        extract_incremental_stream_descriptors(self)
    }
}

/// Collect the streams that need a resume checkpoint between runs
pub fn extract_incremental_stream_descriptors(
    catalog: &ConfiguredCatalog,
) -> HashSet<StreamDescriptor> {
    catalog
        .streams
        .iter()
        .filter(|configured| configured.sync_mode == SyncMode::Incremental)
        .map(|configured| configured.stream.descriptor())
        .collect()
}
