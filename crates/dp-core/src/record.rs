//! Durable evidence that a change file has been applied.

use crate::change_file::ChangeFileName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the applied-records ledger.
///
/// Created exactly once, right after the change file was applied
/// successfully. The ledger never updates or deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRecord {
    /// Identity assigned by the store
    pub id: i64,

    /// The applied change file; unique across the ledger
    pub file: ChangeFileName,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}
