//! Record store trait definition

use crate::error::StoreResult;
use async_trait::async_trait;
use dp_core::{AppliedRecord, ChangeFileName};

/// Persistent store of the [`AppliedRecord`]s of one target database.
///
/// File name uniqueness is the store's job: [`insert`](Self::insert) must
/// reject a second record for the same file even when two runs race.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the record table if it does not exist. Idempotent; must run
    /// before the first read or insert.
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// Every applied record, in no particular order
    async fn find_all(&self) -> StoreResult<Vec<AppliedRecord>>;

    /// Record `file` as applied.
    ///
    /// Fails with [`StoreError::DuplicateRecord`](crate::StoreError::DuplicateRecord)
    /// if the file is already recorded.
    async fn insert(&self, file: &ChangeFileName) -> StoreResult<AppliedRecord>;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;
}
