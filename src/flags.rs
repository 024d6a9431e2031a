//! Feature flags
//!
//! The per-stream capability flag is read once per persist call and handed to
//! classification as a plain boolean.

/// Environment variable enabling per-stream state
pub const USE_STREAM_CAPABLE_STATE_ENV: &str = "USE_STREAM_CAPABLE_STATE";

/// Source of feature flags
pub trait FeatureFlags: Send + Sync {
    /// Whether STREAM and GLOBAL state keep their shape when persisted
    fn use_stream_capable_state(&self) -> bool;
}

/// Flags read from process environment variables on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVariableFeatureFlags;

impl FeatureFlags for EnvVariableFeatureFlags {
    fn use_stream_capable_state(&self) -> bool {
        std::env::var(USE_STREAM_CAPABLE_STATE_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false)
    }
}

/// Flags fixed at construction
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFeatureFlags {
    pub use_stream_capable_state: bool,
}

impl StaticFeatureFlags {
    /// Create flags with the given per-stream capability
    pub fn new(use_stream_capable_state: bool) -> Self {
        Self {
            use_stream_capable_state,
        }
    }
}

impl FeatureFlags for StaticFeatureFlags {
    fn use_stream_capable_state(&self) -> bool {
        self.use_stream_capable_state
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
