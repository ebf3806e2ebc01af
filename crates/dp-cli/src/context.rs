//! Runtime context for CLI commands

use anyhow::{Context, Result};
use dp_core::Config;
use dp_store::{DuckDbLedger, RecordStore};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Runtime context containing the loaded config and the ledger connection
pub struct RuntimeContext {
    /// The loaded configuration
    pub config: Config,

    /// Absolute change directory
    pub dir: PathBuf,

    /// Applied-records ledger
    pub store: Arc<dyn RecordStore>,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Load configuration and open the ledger for the configured target.
    ///
    /// Both failures are fatal and happen before any change file is touched.
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let dir = absolute_dir(&args.dir)?;

        // Load config from custom path or the change directory
        let config = if let Some(config_path) = &args.config {
            Config::load(config_path).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&dir).context("Failed to load configuration")?
        };

        if !dir.is_dir() {
            anyhow::bail!("Change directory not found: {}", dir.display());
        }

        let store: Arc<dyn RecordStore> = Arc::new(open_ledger(&config, &dir)?);
        store
            .ensure_schema()
            .await
            .context("Failed to prepare the ledger")?;
        log::debug!("Ledger: {} at {}", store.store_type(), config.ledger.path);

        Ok(Self {
            config,
            dir,
            store,
            verbose: args.verbose,
        })
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Absolute path of a change file in the change directory
    pub fn change_path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// `user@host:port/name` of the target database
    pub fn target_label(&self) -> String {
        self.config.db.label()
    }
}

fn open_ledger(config: &Config, dir: &Path) -> Result<DuckDbLedger> {
    let target = config.db.label();
    let Some(path) = config.ledger_path_absolute(dir) else {
        return DuckDbLedger::in_memory(target).context("Failed to open in-memory ledger");
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create ledger directory {}", parent.display()))?;
    }
    DuckDbLedger::from_path(&path, target)
        .with_context(|| format!("Failed to open ledger at {}", path.display()))
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to determine the current directory")?
            .join(dir)
    };
    Ok(absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}
