//! Local inventory: the change files present in the change directory.

use crate::change_file::{is_change_file, ChangeFileName};
use crate::error::{CoreError, CoreResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Collect the change files directly inside `dir`.
///
/// The listing is not recursive. Directories (including symlinks to
/// directories) are skipped, as is every entry whose extension does not match
/// `extension` case-insensitively.
pub fn local_set(dir: &Path, extension: &str) -> CoreResult<HashSet<ChangeFileName>> {
    let dir_error = |source: std::io::Error| CoreError::DirectoryRead {
        path: dir.display().to_string(),
        source,
    };

    let mut files = HashSet::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!(
                "Skipping change directory entry with a non UTF-8 name: {}",
                path.display()
            );
            continue;
        };
        if !is_change_file(&name, extension) {
            log::debug!("Ignoring non-change file: {name}");
            continue;
        }

        if let Some(file) = ChangeFileName::try_new(name) {
            files.insert(file);
        }
    }

    Ok(files)
}

#[cfg(test)]
#[path = "inventory_test.rs"]
mod tests;
