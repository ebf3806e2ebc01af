//! Diff engine: which local change files have not been applied yet.

use crate::change_file::ChangeFileName;
use std::collections::HashSet;

/// Compute the pending sequence `local - applied`, sorted ordinally.
///
/// The sort is byte-wise ascending on the file name and is the only ordering
/// guarantee: name change files with zero-padded numeric prefixes so that
/// ordinal order matches the order they must run in. An empty result means
/// there is nothing to do.
pub fn pending(
    applied: &HashSet<ChangeFileName>,
    local: &HashSet<ChangeFileName>,
) -> Vec<ChangeFileName> {
    let mut files: Vec<ChangeFileName> = local.difference(applied).cloned().collect();
    files.sort_unstable();
    files
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
