//! Error types for board-core operations.

/// All errors that can occur in board-core operations.
///
/// The engine has no fatal class: a snapshot decode failure leaves the
/// previous view in place, and rendering failures fall back to escaped text.
/// Errors exist so callers can log them with context.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Snapshot decode failed: {source}")]
    SnapshotDecode {
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using BoardError.
pub type Result<T> = std::result::Result<T, BoardError>;
