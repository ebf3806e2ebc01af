//! Apply command implementation

use anyhow::{Context, Result};
use dp_runner::{collect_pending, Applier, ApplyEvent, ClientRunner, FileState, ShellClient};
use std::sync::Arc;

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let client: Arc<dyn ClientRunner> = Arc::new(ShellClient::new());
    run(&ctx, client, args.dry_run).await
}

/// Collect, diff, and apply using an explicit client.
pub(crate) async fn run(
    ctx: &RuntimeContext,
    client: Arc<dyn ClientRunner>,
    dry_run: bool,
) -> Result<()> {
    ctx.verbose(&format!(
        "Scanning {} for *.{} change files",
        ctx.dir.display(),
        ctx.config.changes.extension
    ));
    let pending = collect_pending(
        ctx.store.as_ref(),
        &ctx.dir,
        &ctx.config.changes.extension,
    )
    .await
    .context("Failed to collect change files")?;

    if pending.is_empty() {
        println!("Nothing to apply, done.");
        return Ok(());
    }

    if dry_run {
        println!(
            "Dry run - would apply {} change file{} to {}:",
            pending.len(),
            plural(pending.len()),
            ctx.target_label()
        );
        for file in &pending {
            let command = client.describe(&ctx.change_path(file), &ctx.config.db)?;
            println!("  {}", file);
            println!("      {}", command);
        }
        return Ok(());
    }

    println!(
        "Applying {} change file{} to {}",
        pending.len(),
        plural(pending.len()),
        ctx.target_label()
    );

    let applier = Applier::new(
        client,
        ctx.store.clone(),
        ctx.config.db.clone(),
        ctx.dir.clone(),
    )
    .with_progress(print_progress);

    let report = applier.apply_all(&pending).await;
    let applied = report.applied_count();
    let records = report
        .into_result()
        .with_context(|| format!("Run halted after applying {applied} of {} file(s)", pending.len()))?;

    println!();
    println!(
        "Success, applied {} change file{}",
        records.len(),
        plural(records.len())
    );
    Ok(())
}

fn print_progress(event: &ApplyEvent<'_>) {
    match event {
        ApplyEvent::Applying { file, index, total } => {
            println!("  [{}/{}] {}", index + 1, total, file);
        }
        ApplyEvent::Finished(outcome) => match outcome.state {
            FileState::Applied if outcome.is_recorded() => {
                println!("        applied ({:.2}s)", outcome.duration.as_secs_f64());
            }
            FileState::Applied => println!("        applied, NOT recorded"),
            FileState::Failed => println!("        FAILED"),
            FileState::Pending | FileState::Applying => {}
        },
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
