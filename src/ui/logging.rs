//! Logging utilities
//!
//! Logs go to a size-rotated file in the user cache directory; writing to the
//! terminal would tear up the TUI.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use env_logger::{Builder, Target, fmt::TimestampPrecision};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use log::LevelFilter;
use std::fs::{create_dir_all, remove_file};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "swipe_news.log";

/// Size at which the log file is rotated.
const MAX_LOG_BYTES: usize = 1024 * 1024;

/// Rotated files kept next to the live one.
const KEPT_LOG_FILES: usize = 3;

/// Location of the log file.
///
/// Creates the containing directory if needed.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be determined or created.
pub fn log_file_path() -> Result<PathBuf>
{
    let project_dirs = ProjectDirs::from("", "", "swipe_news")
        .context("Failed to determine project directories")?;

    let log_dir = project_dirs.cache_dir();
    create_dir_all(log_dir).context("Failed to create log directory")?;

    Ok(log_dir.join(LOG_FILE_NAME))
}

/// Opens the rotating writer behind the logger.
fn open_log_writer(log_path: &Path) -> FileRotate<AppendCount>
{
    FileRotate::new(
        log_path,
        AppendCount::new(KEPT_LOG_FILES),
        ContentLimit::Bytes(MAX_LOG_BYTES),
        Compression::None,
        #[cfg(unix)]
        None,
    )
}

/// Initializes the logging system for the application.
///
/// Everything at `info` and above is logged, this crate at `debug`.
/// `RUST_LOG` overrides both.
///
/// # Arguments
///
/// * `log_path` - File to log into, see [`log_file_path`]
///
/// # Errors
///
/// Returns an error if a logger is already installed.
pub fn init_logging(log_path: &Path) -> Result<()>
{
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("swipe_news", LevelFilter::Debug)
        .parse_default_env()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .target(Target::Pipe(Box::new(open_log_writer(log_path))))
        .try_init()
        .context("Failed to install logger")
}

/// Removes the log file and its rotated copies.
///
/// # Arguments
///
/// * `log_path` - The live log file
///
/// # Returns
///
/// The number of files removed.
///
/// # Errors
///
/// Returns an error if an existing file cannot be removed.
pub fn clear_log_file(log_path: &Path) -> Result<usize>
{
    let rotated = (1..=KEPT_LOG_FILES).map(|index| {
        let mut name = log_path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    });

    let mut removed = 0;

    for path in std::iter::once(log_path.to_path_buf()).chain(rotated)
    {
        if path.exists()
        {
            remove_file(&path)
                .with_context(|| format!("Failed to remove log file: {}", path.display()))?;
            removed += 1;
        }
    }

    Ok(removed)
}
