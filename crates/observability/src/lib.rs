//! Logging setup shared by the storefront binaries.

pub mod tracing;

/// Install the global subscriber, format picked from `LOG_FORMAT`.
///
/// Calling it again is a no-op.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}
