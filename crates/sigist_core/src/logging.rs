//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process.
//! - Pick sink and format from the deployment environment.
//!
//! # Invariants
//! - Initialization never panics.
//! - A second call with the same profile is a no-op; any other profile is rejected.

use crate::config::Environment;
use flexi_logger::{
    colored_default_format, default_format, detailed_format, Cleanup, Criterion, Duplicate,
    FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "sigist";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_MESSAGE_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    Level(String),
    #[error("log directory must be absolute, got `{0}`")]
    RelativeDir(PathBuf),
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Start(#[from] FlexiLoggerError),
    #[error("logging already initialized as {active}; refusing to switch to {requested}")]
    Conflict { active: String, requested: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Profile {
    level: LevelFilter,
    env: Environment,
    dir: Option<PathBuf>,
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "env={} level={}", self.env, self.level)?;
        if let Some(dir) = &self.dir {
            write!(f, " log_dir={}", dir.display())?;
        }
        Ok(())
    }
}

struct ActiveLogger {
    profile: Profile,
    _handle: LoggerHandle,
}

/// Starts process logging for `env`.
///
/// `test` logs plain lines to stderr and `dev` logs colored lines. `prod`
/// writes rotating files under `log_dir` with warnings mirrored to stderr,
/// or detailed stderr lines when no directory is given. `log_dir` is ignored
/// outside `prod`. `RUST_LOG` overrides `level` when set.
pub fn init_logging(
    level: &str,
    env: Environment,
    log_dir: Option<&Path>,
) -> Result<(), LoggingError> {
    let requested = Profile {
        level: parse_level(level)?,
        env,
        dir: match (env, log_dir) {
            (Environment::Prod, Some(dir)) if !dir.is_absolute() => {
                return Err(LoggingError::RelativeDir(dir.to_path_buf()))
            }
            (Environment::Prod, Some(dir)) => Some(dir.to_path_buf()),
            _ => None,
        },
    };

    let active = ACTIVE.get_or_try_init(|| start(requested.clone()))?;
    if active.profile != requested {
        return Err(LoggingError::Conflict {
            active: active.profile.to_string(),
            requested: requested.to_string(),
        });
    }
    Ok(())
}

/// Level and environment of the running logger, if one was started.
pub fn logging_status() -> Option<(LevelFilter, Environment)> {
    ACTIVE
        .get()
        .map(|active| (active.profile.level, active.profile.env))
}

fn start(profile: Profile) -> Result<ActiveLogger, LoggingError> {
    let spec = profile.level.as_str().to_ascii_lowercase();
    let logger = Logger::try_with_env_or_str(spec)?;

    let logger = match (profile.env, profile.dir.as_deref()) {
        (Environment::Prod, Some(dir)) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
                )
                .append()
                .write_mode(WriteMode::BufferAndFlush)
                .format_for_files(detailed_format)
                .duplicate_to_stderr(Duplicate::Warn)
                .format_for_stderr(detailed_format)
        }
        (Environment::Prod, None) => logger.log_to_stderr().format_for_stderr(detailed_format),
        (Environment::Dev, _) => logger
            .log_to_stderr()
            .format_for_stderr(colored_default_format),
        (Environment::Test, _) => logger.log_to_stderr().format_for_stderr(default_format),
    };

    let handle = logger.start()?;
    PANIC_HOOK.get_or_init(install_panic_hook);

    info!(
        "event=logging_init module=core status=ok {profile} os={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    Ok(ActiveLogger {
        profile,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = level.trim();
    let name = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match name.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::Level(trimmed.to_string())),
        Ok(level) => Ok(level),
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic module=core status=error location={location} payload={}",
            one_line(payload, PANIC_MESSAGE_LIMIT)
        );
        previous(info);
    }));
}

/// Flattens `text` to one line and caps it at `limit` characters.
fn one_line(text: &str, limit: usize) -> String {
    let mut out: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().nth(limit).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, parse_level, LoggingError};
    use crate::config::Environment;
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::Warn);
        assert!(matches!(parse_level("verbose"), Err(LoggingError::Level(_))));
        assert!(parse_level("off").is_err());
    }

    #[test]
    fn relative_prod_dir_is_rejected() {
        let err = init_logging("info", Environment::Prod, Some(Path::new("logs/prod")));
        assert!(matches!(err, Err(LoggingError::RelativeDir(_))));
    }

    #[test]
    fn panic_text_is_flattened_and_capped() {
        let line = one_line("line1\nline2\rline3", 8);
        assert_eq!(line, "line1 li...");
        assert_eq!(one_line("short", 8), "short");
    }

    #[test]
    fn init_is_idempotent_and_rejects_other_profiles() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", Environment::Prod, Some(log_dir.path())).unwrap();
        init_logging("INFO", Environment::Prod, Some(log_dir.path())).unwrap();

        for (level, env, dir) in [
            ("debug", Environment::Prod, Some(log_dir.path())),
            ("info", Environment::Prod, Some(other_dir.path())),
            ("info", Environment::Dev, None),
        ] {
            let err = init_logging(level, env, dir).unwrap_err();
            assert!(err.to_string().contains("refusing to switch"), "{err}");
        }

        assert_eq!(logging_status(), Some((LevelFilter::Info, Environment::Prod)));
    }
}
