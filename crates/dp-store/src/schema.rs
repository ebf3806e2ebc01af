//! DDL for the applied-records ledger.

/// Idempotent schema setup.
///
/// One ledger file may serve several target databases, so uniqueness is on
/// `(target, update_file)`. `created_at` is written by the ledger in UTC so the
/// stored value does not depend on the session time zone.
pub(crate) const CREATE_RECORDS: &str = "
CREATE SEQUENCE IF NOT EXISTS db_update_records_id_seq START 1;
CREATE TABLE IF NOT EXISTS db_update_records (
    id          BIGINT PRIMARY KEY DEFAULT nextval('db_update_records_id_seq'),
    created_at  TIMESTAMP NOT NULL,
    target      VARCHAR NOT NULL,
    update_file VARCHAR NOT NULL,
    UNIQUE (target, update_file)
);
";

pub(crate) const INSERT_RECORD: &str = "INSERT INTO db_update_records (target, update_file, created_at) \
     VALUES (?, ?, epoch_ms(CAST(? AS BIGINT)))";

pub(crate) const SELECT_RECORD: &str = "SELECT id, update_file, epoch_ms(created_at) FROM db_update_records \
     WHERE target = ? AND update_file = ?";

pub(crate) const SELECT_ALL_RECORDS: &str = "SELECT id, update_file, epoch_ms(created_at) FROM db_update_records \
     WHERE target = ? ORDER BY id";
