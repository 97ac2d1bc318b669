//! File logger for the mindmap CLI. Each run writes to
//! `~/.mindmap/logs/{timestamp}_{id}/log` and echoes to stderr.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

static CURRENT_LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

pub struct MindmapLogger {
    level: LevelFilter,
    file: Mutex<File>,
    run_id: String,
    log_path: PathBuf,
}

impl MindmapLogger {
    /// Open a fresh run directory under `logs_root`.
    pub fn new(level: LevelFilter, logs_root: &Path) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid = Uuid::new_v4().to_string();
        let short = uuid.split('-').next().unwrap_or("run");
        let run_id = format!("{timestamp}_{short}");

        let log_dir = logs_root.join(&run_id);
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            level,
            file: Mutex::new(file),
            run_id,
            log_path,
        })
    }

    pub fn default_logs_root() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".mindmap").join("logs"))
    }

    /// Install the logger process-wide.
    pub fn init(level: LevelFilter) -> Result<()> {
        let logger = Self::new(level, &Self::default_logs_root()?)?;
        let run_id = logger.run_id.clone();
        let log_path = logger.log_path().to_path_buf();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;
        let _ = CURRENT_LOG_PATH.set(log_path.clone());

        log::info!("mindmap run {} logging to {}", run_id, log_path.display());
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Path of the active log file, once [`MindmapLogger::init`] has run.
pub fn current_log_path() -> Option<&'static Path> {
    CURRENT_LOG_PATH.get().map(PathBuf::as_path)
}

impl Log for MindmapLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let message = format!("{} {} [{}] {}", timestamp, record.level(), record.target(), record.args());

        if let Ok(mut file) = self.file.lock() {
            // A failed log write must not take the command down with it.
            let _ = writeln!(file, "{}", message);
        }
        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
