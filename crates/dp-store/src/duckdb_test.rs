use super::*;
use tempfile::tempdir;

const TARGET: &str = "root@127.0.0.1:3306/app";

fn name(s: &str) -> ChangeFileName {
    ChangeFileName::new(s)
}

async fn ready(ledger: DuckDbLedger) -> DuckDbLedger {
    ledger.ensure_schema().await.unwrap();
    ledger
}

async fn memory_ledger() -> DuckDbLedger {
    ready(DuckDbLedger::in_memory(TARGET).unwrap()).await
}

async fn file_ledger(path: &Path, target: &str) -> DuckDbLedger {
    ready(DuckDbLedger::from_path(path, target).unwrap()).await
}

async fn files(ledger: &DuckDbLedger) -> Vec<String> {
    ledger
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.file.into_inner())
        .collect()
}

#[tokio::test]
async fn test_in_memory_starts_empty() {
    let ledger = memory_ledger().await;
    assert_eq!(ledger.store_type(), "duckdb");
    assert_eq!(ledger.target(), TARGET);
    assert!(ledger.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_new_handles_memory_path() {
    let ledger = ready(DuckDbLedger::new(":memory:", TARGET).unwrap()).await;
    assert!(ledger.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_queries_before_schema_setup_fail() {
    let ledger = DuckDbLedger::in_memory(TARGET).unwrap();
    assert!(matches!(
        ledger.find_all().await,
        Err(StoreError::QueryError(_))
    ));
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let ledger = memory_ledger().await;
    ledger.insert(&name("001_init.sql")).await.unwrap();

    ledger.ensure_schema().await.unwrap();
    ledger.ensure_schema().await.unwrap();

    assert_eq!(ledger.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_returns_stored_record() {
    let ledger = memory_ledger().await;
    let before = Utc::now().timestamp_millis();

    let record = ledger.insert(&name("001_init.sql")).await.unwrap();

    assert_eq!(record.file, "001_init.sql");
    assert!(record.created_at.timestamp_millis() >= before);
    assert!(record.created_at.timestamp_millis() <= Utc::now().timestamp_millis());
}

#[tokio::test]
async fn test_insert_assigns_distinct_ids() {
    let ledger = memory_ledger().await;
    let first = ledger.insert(&name("001_init.sql")).await.unwrap();
    let second = ledger.insert(&name("002_add_col.sql")).await.unwrap();
    assert_ne!(first.id, second.id);

    let all = ledger.find_all().await.unwrap();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let ledger = memory_ledger().await;
    ledger.insert(&name("001_init.sql")).await.unwrap();

    let err = ledger.insert(&name("001_init.sql")).await.unwrap_err();
    match err {
        StoreError::DuplicateRecord { file } => assert_eq!(file, "001_init.sql"),
        other => panic!("expected DuplicateRecord, got {other}"),
    }

    assert_eq!(ledger.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_names_differing_in_case_are_distinct() {
    let ledger = memory_ledger().await;
    ledger.insert(&name("001_init.sql")).await.unwrap();
    ledger.insert(&name("001_INIT.sql")).await.unwrap();
    assert_eq!(ledger.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.duckdb");

    {
        let ledger = file_ledger(&path, TARGET).await;
        ledger.insert(&name("001_init.sql")).await.unwrap();
    }

    let ledger = file_ledger(&path, TARGET).await;
    assert_eq!(files(&ledger).await, vec!["001_init.sql"]);

    let err = ledger.insert(&name("001_init.sql")).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRecord { .. }));
}

#[tokio::test]
async fn test_records_are_scoped_to_target() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.duckdb");
    let staging = "deploy@staging.db:3306/app";
    let prod = "deploy@prod.db:3306/app";

    {
        let ledger = file_ledger(&path, staging).await;
        ledger.insert(&name("001_init.sql")).await.unwrap();
    }

    {
        let ledger = file_ledger(&path, prod).await;
        assert!(files(&ledger).await.is_empty());
        ledger.insert(&name("001_init.sql")).await.unwrap();
        ledger.insert(&name("002_add_col.sql")).await.unwrap();
    }

    let ledger = file_ledger(&path, staging).await;
    assert_eq!(files(&ledger).await, vec!["001_init.sql"]);
}

#[test]
fn test_from_path_in_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let result = DuckDbLedger::from_path(&dir.path().join("missing").join("ledger.duckdb"), TARGET);
    assert!(matches!(result, Err(StoreError::ConnectionError(_))));
}

#[test]
fn test_unique_violation_detection() {
    assert!(is_unique_violation(
        "Constraint Error: Duplicate key \"target: a@b:1/c, update_file: 001.sql\" violates unique constraint."
    ));
    assert!(is_unique_violation(
        "Constraint Error: PRIMARY KEY or UNIQUE constraint violated: duplicated key"
    ));
    assert!(!is_unique_violation(
        "Catalog Error: Table with name db_update_records does not exist!"
    ));
}
