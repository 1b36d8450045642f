//! Rolling file logs for the roadmap core.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend at most once per process.
//! - Capture panics as single-line `event=panic_captured` records.
//!
//! # Invariants
//! - A repeated `init_logging` with the same level and directory succeeds
//!   without side effects; a different pair is refused.
//! - Initialization reports failures as `LoggingError`, never by panicking.
//! - Records carry ids, indices and counts only. Task text, notes and
//!   stored blobs stay out of the log files.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "roadmap";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Severity threshold for the file logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Case-insensitive; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LoggingError::UnknownLevel(value.trim().to_string())),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    /// Log directory must be an absolute, non-empty path.
    InvalidDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// Logging already runs with a different level or directory.
    Conflict {
        active_level: LogLevel,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDir(dir) => {
                write!(f, "log directory must be absolute, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(message) => write!(f, "logger failed to start: {message}"),
            Self::Conflict {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already active at level `{active_level}` in `{}`",
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

struct ActiveLogger {
    level: LogLevel,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn accepts(&self, level: LogLevel, dir: &Path) -> Result<(), LoggingError> {
        if self.level == level && self.dir == dir {
            return Ok(());
        }
        Err(LoggingError::Conflict {
            active_level: self.level,
            active_dir: self.dir.clone(),
        })
    }
}

/// Starts rolling file logs named `roadmap*.log` under `log_dir`.
pub fn init_logging(level: LogLevel, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let dir = validate_dir(log_dir.as_ref())?;
    if let Some(active) = ACTIVE.get() {
        return active.accepts(level, &dir);
    }

    let active = ACTIVE.get_or_try_init(|| start_backend(level, &dir))?;
    // Another thread may have initialized first with its own settings.
    active.accepts(level, &dir)
}

fn start_backend(level: LogLevel, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=logging status=ok version={} level={} dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `Debug` in debug builds, `Info` in release builds.
pub fn default_log_level() -> LogLevel {
    if cfg!(debug_assertions) {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

fn validate_dir(dir: &Path) -> Result<PathBuf, LoggingError> {
    if dir.as_os_str().is_empty() || !dir.is_absolute() {
        return Err(LoggingError::InvalidDir(dir.to_path_buf()));
    }
    Ok(dir.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(info);
    }));
}

/// Flattens `value` to one line of at most `limit` chars, marking cuts with `...`.
fn one_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, LogLevel, LoggingError};
    use std::path::Path;

    #[test]
    fn level_parsing_is_lenient_about_case_and_spacing() {
        assert_eq!(LogLevel::parse(" INFO ").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse("Warning").unwrap(), LogLevel::Warn);
        assert!(matches!(
            LogLevel::parse("verbose"),
            Err(LoggingError::UnknownLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn relative_and_empty_dirs_are_rejected() {
        for dir in ["logs/dev", ""] {
            let err = init_logging(LogLevel::Info, dir).unwrap_err();
            assert!(matches!(err, LoggingError::InvalidDir(_)), "{dir}");
        }
    }

    #[test]
    fn one_line_flattens_and_caps() {
        assert_eq!(one_line("short", 10), "short");
        let flat = one_line("line1\nline2\rline3", 8);
        assert_eq!(flat, "line1 li...");
    }

    #[test]
    fn second_init_must_match_the_first() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logs");
        let other = root.path().join("elsewhere");

        init_logging(LogLevel::Info, &dir).unwrap();
        init_logging(LogLevel::Info, &dir).unwrap();

        assert!(matches!(
            init_logging(LogLevel::Debug, &dir),
            Err(LoggingError::Conflict { .. })
        ));
        assert!(matches!(
            init_logging(LogLevel::Info, &other),
            Err(LoggingError::Conflict { .. })
        ));

        let (level, active) = logging_status().unwrap();
        assert_eq!(level, LogLevel::Info);
        assert_eq!(active, dir);
        assert!(Path::new(&active).is_dir());
    }
}
