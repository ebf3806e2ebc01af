//! DuckDB ledger implementation

use crate::error::{is_unique_violation, StoreError, StoreResult};
use crate::schema::{CREATE_RECORDS, INSERT_RECORD, SELECT_ALL_RECORDS, SELECT_RECORD};
use crate::traits::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dp_core::{AppliedRecord, ChangeFileName};
use duckdb::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Applied-records ledger backed by a DuckDB file.
///
/// A ledger handle is scoped to one target database (see
/// `TargetConfig::label`): it only sees and creates records for that target,
/// so pointing the same change directory at another database starts from an
/// empty applied set. Callers run [`RecordStore::ensure_schema`] before
/// recording.
pub struct DuckDbLedger {
    conn: Mutex<Connection>,
    target: String,
}

impl DuckDbLedger {
    /// Open an in-memory ledger for `target`
    pub fn in_memory(target: impl Into<String>) -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn, target))
    }

    /// Open (or create) a ledger file at `path` for `target`
    pub fn from_path(path: &Path, target: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::with_connection(conn, target))
    }

    /// Open from a path string (handles the `:memory:` special case)
    pub fn new(path: &str, target: impl Into<String>) -> StoreResult<Self> {
        if path == ":memory:" {
            Self::in_memory(target)
        } else {
            Self::from_path(Path::new(path), target)
        }
    }

    fn with_connection(conn: Connection, target: impl Into<String>) -> Self {
        Self {
            conn: Mutex::new(conn),
            target: target.into(),
        }
    }

    /// The target database this handle records for
    pub fn target(&self) -> &str {
        &self.target
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }

    fn ensure_schema_sync(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(CREATE_RECORDS)
            .map_err(|e| StoreError::SchemaError(e.to_string()))
    }

    fn find_all_sync(&self) -> StoreResult<Vec<AppliedRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(SELECT_ALL_RECORDS)
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        let rows = stmt
            .query_map(params![self.target], read_row)
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| StoreError::QueryError(e.to_string()))?;
            records.push(raw.into_record()?);
        }
        Ok(records)
    }

    fn insert_sync(&self, file: &ChangeFileName) -> StoreResult<AppliedRecord> {
        let conn = self.lock()?;
        let now_ms = Utc::now().timestamp_millis();

        conn.execute(INSERT_RECORD, params![self.target, file.as_str(), now_ms])
            .map_err(|e| {
                let msg = e.to_string();
                if is_unique_violation(&msg) {
                    StoreError::DuplicateRecord {
                        file: file.to_string(),
                    }
                } else {
                    StoreError::QueryError(format!("insert of '{file}' failed: {msg}"))
                }
            })?;

        let raw = conn
            .query_row(SELECT_RECORD, params![self.target, file.as_str()], read_row)
            .map_err(|e| StoreError::QueryError(format!("read-back of '{file}' failed: {e}")))?;
        raw.into_record()
    }
}

/// A record row as stored, before validation.
struct RawRecord {
    id: i64,
    file: String,
    created_at_ms: i64,
}

fn read_row(row: &Row<'_>) -> duckdb::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        file: row.get(1)?,
        created_at_ms: row.get(2)?,
    })
}

impl RawRecord {
    fn into_record(self) -> StoreResult<AppliedRecord> {
        let file = ChangeFileName::try_new(self.file.clone()).ok_or_else(|| {
            StoreError::CorruptRecord(format!("id {}: invalid file name '{}'", self.id, self.file))
        })?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at_ms).ok_or_else(
            || {
                StoreError::CorruptRecord(format!(
                    "id {}: timestamp {} out of range",
                    self.id, self.created_at_ms
                ))
            },
        )?;
        Ok(AppliedRecord {
            id: self.id,
            file,
            created_at,
        })
    }
}

#[async_trait]
impl RecordStore for DuckDbLedger {
    async fn ensure_schema(&self) -> StoreResult<()> {
        self.ensure_schema_sync()?;
        log::debug!("Ledger schema ready for target {}", self.target);
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<AppliedRecord>> {
        self.find_all_sync()
    }

    async fn insert(&self, file: &ChangeFileName) -> StoreResult<AppliedRecord> {
        let record = self.insert_sync(file)?;
        log::debug!("Recorded {} as applied (id {})", record.file, record.id);
        Ok(record)
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
