//! Strongly-typed change file name.
//!
//! A change file is identified by its bare file name only: no directory, no
//! checksum. Two files with the same name are the same change.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A non-empty bare file name of a change file (e.g. `001_init.sql`).
///
/// Ordering is byte-wise on the underlying string, which is the order pending
/// change files are applied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChangeFileName(String);

impl<'de> Deserialize<'de> for ChangeFileName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ChangeFileName::try_new(s).ok_or_else(|| {
            serde::de::Error::custom("ChangeFileName must be a non-empty bare file name")
        })
    }
}

impl ChangeFileName {
    /// Create a new name, panicking if it is empty or contains a path separator.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(
            is_bare_name(&s),
            "ChangeFileName must be a non-empty bare file name"
        );
        Self(s)
    }

    /// Try to create a new name, returning `None` if it is empty or contains
    /// a path separator.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if is_bare_name(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_bare_name(s: &str) -> bool {
    !s.is_empty() && !s.contains('/') && !s.contains('\\')
}

impl std::fmt::Display for ChangeFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChangeFileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for ChangeFileName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::ops::Deref for ChangeFileName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ChangeFileName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChangeFileName {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("ChangeFileName must be a non-empty bare file name")
    }
}

impl TryFrom<&str> for ChangeFileName {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("ChangeFileName must be a non-empty bare file name")
    }
}

impl PartialEq<str> for ChangeFileName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChangeFileName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Check whether `file_name` carries the change-file `extension`.
///
/// The extension is whatever follows the last `.`, compared ignoring ASCII
/// case, so `V1.SQL` matches `sql`. A dotfile such as `.sql` counts as a
/// change file; a name without a `.` never does.
pub fn is_change_file(file_name: &str, extension: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
#[path = "change_file_test.rs"]
mod tests;
