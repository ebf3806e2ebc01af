//! dp-store - Applied-records ledger for dbpatch
//!
//! This crate provides the `RecordStore` trait the runner records progress
//! through, and a DuckDB-backed implementation of it.

pub mod duckdb;
pub mod error;
pub(crate) mod schema;
pub mod traits;

pub use crate::duckdb::DuckDbLedger;
pub use error::{StoreError, StoreResult};
pub use traits::RecordStore;
