//! dp-core - Core library for dbpatch
//!
//! This crate provides the change-file name type, configuration parsing,
//! local inventory collection, and the diff engine that decides which change
//! files still need to be applied.

pub mod change_file;
pub mod config;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod record;

pub use change_file::{is_change_file, ChangeFileName};
pub use config::{ChangesConfig, Config, LedgerConfig, TargetConfig};
pub use diff::pending;
pub use error::{CoreError, CoreResult};
pub use inventory::local_set;
pub use record::AppliedRecord;
