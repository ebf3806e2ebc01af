//! Error types for dp-store

use thiserror::Error;

/// Ledger operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error (L001)
    #[error("[L001] Ledger connection failed: {0}")]
    ConnectionError(String),

    /// Schema setup error (L002)
    #[error("[L002] Ledger schema setup failed: {0}")]
    SchemaError(String),

    /// Query execution error (L003)
    #[error("[L003] Ledger query failed: {0}")]
    QueryError(String),

    /// A record for this file already exists (L004)
    #[error("[L004] '{file}' is already recorded as applied")]
    DuplicateRecord { file: String },

    /// Mutex poisoned (L005)
    #[error("[L005] Ledger mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Stored row could not be decoded (L006)
    #[error("[L006] Corrupt ledger row: {0}")]
    CorruptRecord(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Whether a DuckDB error message reports a unique or primary key violation.
///
/// duckdb::Error does not expose structured constraint variants, so the
/// message is the only thing to go on.
pub(crate) fn is_unique_violation(message: &str) -> bool {
    let msg = message.to_ascii_lowercase();
    msg.contains("constraint")
        && (msg.contains("duplicate key")
            || msg.contains("unique constraint")
            || msg.contains("primary key or unique"))
}
