//! Inventory collection: what has been applied and what is waiting.

use crate::error::RunnerResult;
use dp_core::{local_set, pending, ChangeFileName};
use dp_store::RecordStore;
use std::collections::HashSet;
use std::path::Path;

/// File names of every applied record. Empty on a first run.
pub async fn applied_set(store: &dyn RecordStore) -> RunnerResult<HashSet<ChangeFileName>> {
    let records = store.find_all().await?;
    Ok(records.into_iter().map(|r| r.file).collect())
}

/// Compute the pending sequence for `dir`: local change files with no applied
/// record, in ordinal order.
pub async fn collect_pending(
    store: &dyn RecordStore,
    dir: &Path,
    extension: &str,
) -> RunnerResult<Vec<ChangeFileName>> {
    let applied = applied_set(store).await?;
    let local = local_set(dir, extension)?;
    log::debug!(
        "Inventory: {} applied, {} local change files",
        applied.len(),
        local.len()
    );
    Ok(pending(&applied, &local))
}
