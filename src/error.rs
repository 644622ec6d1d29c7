//! Error types for restoring a saved sort

/// Errors raised when a [`crate::Snapshot`] cannot be turned back into an engine.
///
/// A failed restore never yields a partially initialized engine.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The blob is not valid JSON or is missing fields.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u64, expected: u32 },

    /// The fields parse but describe a state the engine can never reach.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Convenience alias for snapshot results.
pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;
