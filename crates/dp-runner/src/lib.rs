//! dp-runner - Change file application for dbpatch
//!
//! Collects the applied and local inventories, builds the per-platform client
//! invocation, and drives each pending change file through the
//! `Pending -> Applying -> Applied | Failed` state machine, recording every
//! success in the ledger before moving on.

pub mod applier;
pub mod client;
pub mod error;
pub mod inventory;
pub mod invocation;

pub use applier::{ApplyEvent, ApplyReport, Applier, FileOutcome, FileState};
pub use client::{ClientOutput, ClientRunner, ShellClient};
pub use error::{RunnerError, RunnerResult};
pub use inventory::{applied_set, collect_pending};
pub use invocation::{Invocation, Platform};
