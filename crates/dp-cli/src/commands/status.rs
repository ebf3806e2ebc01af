//! Status command implementation

use anyhow::{Context, Result};
use dp_core::{local_set, pending, AppliedRecord, ChangeFileName};
use serde::Serialize;
use std::collections::HashSet;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Applied and pending change files of one directory
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) target: String,
    pub(crate) applied: Vec<AppliedEntry>,
    pub(crate) pending: Vec<ChangeFileName>,
}

/// An applied record plus whether its file is still present locally
#[derive(Debug, Serialize)]
pub(crate) struct AppliedEntry {
    #[serde(flatten)]
    pub(crate) record: AppliedRecord,
    pub(crate) present: bool,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let report = build_report(&ctx).await?;

    match args.output {
        StatusOutput::Table => print_table(&report),
        StatusOutput::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize status")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub(crate) async fn build_report(ctx: &RuntimeContext) -> Result<StatusReport> {
    let records = ctx
        .store
        .find_all()
        .await
        .context("Failed to read applied records")?;
    let local = local_set(&ctx.dir, &ctx.config.changes.extension)
        .context("Failed to list change files")?;

    let applied_names: HashSet<ChangeFileName> = records.iter().map(|r| r.file.clone()).collect();
    let pending = pending(&applied_names, &local);

    let mut applied: Vec<AppliedEntry> = records
        .into_iter()
        .map(|record| AppliedEntry {
            present: local.contains(&record.file),
            record,
        })
        .collect();
    applied.sort_by(|a, b| a.record.file.cmp(&b.record.file));

    Ok(StatusReport {
        target: ctx.target_label(),
        applied,
        pending,
    })
}

fn print_table(report: &StatusReport) {
    println!("Target: {}", report.target);
    println!();

    println!("Applied ({}):", report.applied.len());
    for entry in &report.applied {
        let missing = if entry.present { "" } else { "  (missing locally)" };
        println!(
            "  {}  {}{}",
            entry.record.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.record.file,
            missing
        );
    }

    println!();
    println!("Pending ({}):", report.pending.len());
    for file in &report.pending {
        println!("  {}", file);
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
