//! Mark command implementation
//!
//! Records change files as applied without running them. This is how a file
//! that was applied but never recorded gets back into the ledger.

use anyhow::{bail, Context, Result};
use dp_core::{is_change_file, ChangeFileName};

use crate::cli::{GlobalArgs, MarkArgs};
use crate::context::RuntimeContext;

/// Execute the mark command
pub async fn execute(args: &MarkArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    mark(&ctx, &args.files).await
}

pub(crate) async fn mark(ctx: &RuntimeContext, files: &[String]) -> Result<()> {
    let extension = &ctx.config.changes.extension;

    // Validate everything before recording anything
    let mut names = Vec::with_capacity(files.len());
    for file in files {
        let Some(name) = ChangeFileName::try_new(file.as_str()) else {
            bail!("'{file}' is not a bare file name");
        };
        if !is_change_file(&name, extension) {
            bail!("'{file}' is not a change file (expected extension .{extension})");
        }
        if !ctx.change_path(&name).is_file() {
            bail!("'{file}' not found in {}", ctx.dir.display());
        }
        names.push(name);
    }

    for name in &names {
        let record = ctx
            .store
            .insert(name)
            .await
            .with_context(|| format!("Failed to mark {name} as applied"))?;
        println!(
            "Marked {} as applied ({})",
            record.file,
            record.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "mark_test.rs"]
mod tests;
