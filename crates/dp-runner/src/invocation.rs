//! Platform-specific construction of the database client invocation.
//!
//! The client reads the change file from stdin through a shell redirect, so
//! every platform wraps the same command line in its own shell. The
//! differences live in the `ShellStrategy` entries; nothing else branches on the OS.

use crate::error::{RunnerError, RunnerResult};
use dp_core::TargetConfig;
use std::path::Path;

/// Operating system families with a known invocation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// POSIX shell (`/bin/sh -c`)
    Unix,
    /// Windows command interpreter (`cmd /C`)
    Windows,
}

impl Platform {
    /// Map an OS name as reported by `std::env::consts::OS`
    pub fn detect(os: &str) -> RunnerResult<Self> {
        match os {
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "illumos"
            | "solaris" | "android" => Ok(Platform::Unix),
            "windows" => Ok(Platform::Windows),
            other => Err(RunnerError::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    fn strategy(self) -> &'static ShellStrategy {
        match self {
            Platform::Unix => &POSIX_SHELL,
            Platform::Windows => &CMD_SHELL,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Unix => write!(f, "unix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// How one platform wraps the client command line.
struct ShellStrategy {
    shell: &'static str,
    flag: &'static str,
    quote: fn(&str) -> String,
}

const POSIX_SHELL: ShellStrategy = ShellStrategy {
    shell: "/bin/sh",
    flag: "-c",
    quote: quote_posix,
};

const CMD_SHELL: ShellStrategy = ShellStrategy {
    shell: "cmd",
    flag: "/C",
    quote: quote_cmd,
};

const REDACTED: &str = "****";

/// A fully built client invocation: program plus arguments.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Platform the invocation was built for
    pub platform: Platform,

    /// Shell executable
    pub program: String,

    /// Shell arguments; the last one is the client command line
    pub args: Vec<String>,

    redacted: String,
}

impl Invocation {
    /// Build the invocation that feeds `file` to the client on `platform`.
    ///
    /// `file` should be absolute; it is passed to the shell as-is.
    pub fn build(platform: Platform, target: &TargetConfig, file: &Path) -> Self {
        let strategy = platform.strategy();
        let command_line = client_command_line(strategy, target, file, false);
        let redacted = format!(
            "{} {} {}",
            strategy.shell,
            strategy.flag,
            client_command_line(strategy, target, file, true)
        );

        Self {
            platform,
            program: strategy.shell.to_string(),
            args: vec![strategy.flag.to_string(), command_line],
            redacted,
        }
    }

    /// The invocation as a single line with the password masked
    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.redacted)
            .finish()
    }
}

fn client_command_line(
    strategy: &ShellStrategy,
    target: &TargetConfig,
    file: &Path,
    redact: bool,
) -> String {
    let q = strategy.quote;
    let password = if redact {
        REDACTED.to_string()
    } else {
        q(&target.password)
    };
    format!(
        "{} -h{} -P{} -u{} --password={} {} < {}",
        target.client_bin,
        q(&target.host),
        target.port,
        q(&target.user),
        password,
        q(&target.name),
        q(&file.display().to_string()),
    )
}

/// Quote `s` for a POSIX shell, leaving plain words untouched.
fn quote_posix(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Quote `s` for cmd.exe when it contains whitespace or metacharacters.
fn quote_cmd(s: &str) -> String {
    let needs_quotes =
        s.is_empty() || s.chars().any(|c| c.is_whitespace() || "&|<>^()%!\"".contains(c));
    if needs_quotes {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "invocation_test.rs"]
mod tests;
