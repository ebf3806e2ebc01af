//! Sequential application of pending change files.
//!
//! Every file moves `Pending -> Applying -> Applied` or
//! `Pending -> Applying -> Failed`. An applied file is recorded in the ledger
//! before the next one starts. The first failure halts the run and leaves the
//! remaining files `Pending`; they are never attempted.

use crate::client::ClientRunner;
use crate::error::{RunnerError, RunnerResult};
use dp_core::{AppliedRecord, ChangeFileName, TargetConfig};
use dp_store::RecordStore;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle state of one change file within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Not attempted yet
    Pending,
    /// Client invocation in flight
    Applying,
    /// Client succeeded
    Applied,
    /// Client failed or could not be started
    Failed,
}

impl FileState {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition(self, next: FileState) -> bool {
        matches!(
            (self, next),
            (FileState::Pending, FileState::Applying)
                | (FileState::Applying, FileState::Applied)
                | (FileState::Applying, FileState::Failed)
        )
    }
}

impl std::fmt::Display for FileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileState::Pending => write!(f, "pending"),
            FileState::Applying => write!(f, "applying"),
            FileState::Applied => write!(f, "applied"),
            FileState::Failed => write!(f, "failed"),
        }
    }
}

/// What happened to one change file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: ChangeFileName,
    pub state: FileState,

    /// Ledger record, present once the file is applied and recorded
    pub record: Option<AppliedRecord>,

    /// Time spent applying and recording
    pub duration: Duration,

    /// Failure message, if the file failed or could not be recorded
    pub error: Option<String>,
}

impl FileOutcome {
    fn pending(file: &ChangeFileName) -> Self {
        Self {
            file: file.clone(),
            state: FileState::Pending,
            record: None,
            duration: Duration::ZERO,
            error: None,
        }
    }

    fn advance(&mut self, next: FileState) {
        debug_assert!(
            self.state.can_transition(next),
            "illegal transition {} -> {} for {}",
            self.state,
            next,
            self.file
        );
        log::debug!("{}: {} -> {}", self.file, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: &RunnerError) {
        self.advance(FileState::Failed);
        self.error = Some(err.to_string());
    }

    /// Applied and recorded in the ledger
    pub fn is_recorded(&self) -> bool {
        self.state == FileState::Applied && self.record.is_some()
    }
}

/// Progress notifications emitted while a run is in flight
#[derive(Debug)]
pub enum ApplyEvent<'a> {
    /// `file` is about to be handed to the client
    Applying {
        file: &'a ChangeFileName,
        index: usize,
        total: usize,
    },
    /// `outcome` reached its final state for this run
    Finished(&'a FileOutcome),
}

type ProgressFn = Box<dyn Fn(&ApplyEvent<'_>) + Send + Sync>;

/// Result of a run: every pending file with its final state.
#[derive(Debug)]
pub struct ApplyReport {
    pub outcomes: Vec<FileOutcome>,

    /// The error that stopped the run, if any
    pub halted: Option<RunnerError>,
}

impl ApplyReport {
    /// Number of files the client applied successfully
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == FileState::Applied)
            .count()
    }

    /// The created records, or the error that halted the run
    pub fn into_result(self) -> RunnerResult<Vec<AppliedRecord>> {
        match self.halted {
            Some(err) => Err(err),
            None => Ok(self.outcomes.into_iter().filter_map(|o| o.record).collect()),
        }
    }
}

/// Applies pending change files one at a time.
pub struct Applier {
    client: Arc<dyn ClientRunner>,
    store: Arc<dyn RecordStore>,
    target: TargetConfig,
    dir: PathBuf,
    progress: Option<ProgressFn>,
}

impl Applier {
    /// Create an applier for change files located in `dir`
    pub fn new(
        client: Arc<dyn ClientRunner>,
        store: Arc<dyn RecordStore>,
        target: TargetConfig,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            store,
            target,
            dir: dir.into(),
            progress: None,
        }
    }

    /// Call `f` for every [`ApplyEvent`]
    pub fn with_progress(mut self, f: impl Fn(&ApplyEvent<'_>) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    fn emit(&self, event: ApplyEvent<'_>) {
        if let Some(progress) = &self.progress {
            progress(&event);
        }
    }

    /// Apply `pending` in order, stopping at the first failure.
    pub async fn apply_all(&self, pending: &[ChangeFileName]) -> ApplyReport {
        let mut outcomes: Vec<FileOutcome> = pending.iter().map(FileOutcome::pending).collect();
        let total = outcomes.len();

        for index in 0..total {
            let outcome = &mut outcomes[index];
            self.emit(ApplyEvent::Applying {
                file: &outcome.file,
                index,
                total,
            });

            let started = Instant::now();
            let result = self.apply_one(outcome).await;
            outcome.duration = started.elapsed();
            self.emit(ApplyEvent::Finished(outcome));

            if let Err(err) = result {
                let skipped = total - index - 1;
                if skipped > 0 {
                    log::warn!("Halting run: {skipped} pending file(s) not attempted");
                }
                return ApplyReport {
                    outcomes,
                    halted: Some(err),
                };
            }
        }

        ApplyReport {
            outcomes,
            halted: None,
        }
    }

    async fn apply_one(&self, outcome: &mut FileOutcome) -> RunnerResult<()> {
        outcome.advance(FileState::Applying);

        let path = match self.resolve(&outcome.file) {
            Ok(path) => path,
            Err(err) => {
                outcome.fail(&err);
                return Err(err);
            }
        };

        match self.client.apply(&path, &self.target).await {
            Ok(output) => {
                if !output.stdout.is_empty() {
                    log::debug!("{} stdout:\n{}", outcome.file, output.stdout);
                }
                if !output.stderr.is_empty() {
                    log::debug!("{} stderr:\n{}", outcome.file, output.stderr);
                }
                outcome.advance(FileState::Applied);
                log::info!("Imported file: {}", outcome.file);
            }
            Err(err) => {
                log::error!("{err}");
                outcome.fail(&err);
                return Err(err);
            }
        }

        match self.store.insert(&outcome.file).await {
            Ok(record) => {
                outcome.record = Some(record);
                Ok(())
            }
            Err(source) => {
                let err = RunnerError::RecordFailed {
                    file: outcome.file.to_string(),
                    source,
                };
                log::error!("{err}");
                outcome.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Absolute path of `file`, without `.` components.
    fn resolve(&self, file: &ChangeFileName) -> RunnerResult<PathBuf> {
        let joined = self.dir.join(file.as_str());
        let absolute = if joined.is_absolute() {
            joined
        } else {
            std::env::current_dir()
                .map_err(|e| RunnerError::PathResolution {
                    file: file.to_string(),
                    source: e,
                })?
                .join(joined)
        };
        Ok(strip_cur_dir(&absolute))
    }
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
