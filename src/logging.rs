//! Logging setup
//!
//! The library only emits `tracing` events. Embedding processes that do not
//! install their own subscriber can call [`init`].

use crate::types::LogLevel;

/// Install a fmt subscriber honouring `RUST_LOG`, defaulting to `level`
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(level: LogLevel) -> bool {
    let level: tracing::Level = level.into();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(LogLevel::Debug);
        assert!(!init(LogLevel::Info));
    }
}
