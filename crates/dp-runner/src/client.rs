//! The external database client as a capability.
//!
//! [`ShellClient`] shells out to the configured client binary. Tests swap in
//! their own [`ClientRunner`] so the applier can be exercised without a real
//! database.

use crate::error::{RunnerError, RunnerResult};
use crate::invocation::{Invocation, Platform};
use async_trait::async_trait;
use dp_core::TargetConfig;
use std::path::Path;
use std::process::Stdio;

/// Captured output of a successful client run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Applies one change file to the target database.
#[async_trait]
pub trait ClientRunner: Send + Sync {
    /// Feed `file` (an absolute path) to the database described by `target`.
    ///
    /// Returns `Ok` only if the client ran and reported success.
    async fn apply(&self, file: &Path, target: &TargetConfig) -> RunnerResult<ClientOutput>;

    /// Render the invocation for `file` without running it
    fn describe(&self, file: &Path, target: &TargetConfig) -> RunnerResult<String>;
}

/// Runs the configured client binary through the platform shell.
///
/// The platform is resolved per call, so an unsupported OS only fails once a
/// file actually needs to be applied.
#[derive(Debug, Clone)]
pub struct ShellClient {
    os: String,
}

impl ShellClient {
    /// Client for the OS this binary runs on
    pub fn new() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Client that builds invocations for `os`
    pub fn for_os(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    fn invocation(&self, file: &Path, target: &TargetConfig) -> RunnerResult<Invocation> {
        let platform = Platform::detect(&self.os)?;
        Ok(Invocation::build(platform, target, file))
    }
}

impl Default for ShellClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientRunner for ShellClient {
    async fn apply(&self, file: &Path, target: &TargetConfig) -> RunnerResult<ClientOutput> {
        let invocation = self.invocation(file, target)?;
        log::debug!("CMD: {}", invocation);

        let output = shell_command(&invocation)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RunnerError::ClientLaunch {
                file: file.display().to_string(),
                source: e,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(RunnerError::ClientFailed {
                file: file.display().to_string(),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        Ok(ClientOutput { stdout, stderr })
    }

    fn describe(&self, file: &Path, target: &TargetConfig) -> RunnerResult<String> {
        Ok(self.invocation(file, target)?.redacted().to_string())
    }
}

/// The process for `invocation`, arguments passed exactly as built.
///
/// cmd.exe parses its own command line and does not understand the `\"`
/// escapes the default Windows argument quoting produces, so the client
/// command line is appended raw there.
pub(crate) fn shell_command(invocation: &Invocation) -> tokio::process::Command {
    let mut command = tokio::process::Command::new(&invocation.program);

    #[cfg(windows)]
    if invocation.platform == Platform::Windows {
        if let [flag, line] = invocation.args.as_slice() {
            command.arg(flag).raw_arg(line);
            return command;
        }
    }

    command.args(&invocation.args);
    command
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
