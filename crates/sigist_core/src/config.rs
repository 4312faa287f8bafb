//! Service configuration shared by the binaries.
//!
//! Values arrive already parsed (flags, environment); this module owns the
//! typed shape and the blank-value checks.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown environment `{0}`; expected prod|dev|test")]
    UnknownEnvironment(String),
    #[error("unknown service kind `{0}`; expected feedback|users|email")]
    UnknownServiceKind(String),
    #[error("`{0}` must not be blank")]
    Blank(&'static str),
    #[error("port must be non-zero")]
    ZeroPort,
}

/// Deployment environment; selects the logging profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Prod,
    Dev,
    Test,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Self::Prod),
            "dev" | "development" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Prod => "prod",
            Self::Dev => "dev",
            Self::Test => "test",
        })
    }
}

/// Which table and routes a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// `user_feedback` records with token ids and publish-on-save.
    Feedback,
    /// `users` records with serial ids and publish-on-save.
    Users,
    /// Email signups.
    Email,
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "feedback" => Ok(Self::Feedback),
            "users" => Ok(Self::Users),
            "email" | "emails" => Ok(Self::Email),
            other => Err(ConfigError::UnknownServiceKind(other.to_string())),
        }
    }
}

impl Display for ServiceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Feedback => "feedback",
            Self::Users => "users",
            Self::Email => "email",
        })
    }
}

/// Complete runtime configuration of one service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub env: Environment,
    pub kind: ServiceKind,
    pub port: u16,
    pub log_level: String,
    /// Absolute directory for rotating log files (prod only).
    pub log_dir: Option<PathBuf>,
    pub db_file: PathBuf,
    pub event_topic: String,
    /// Spool file for published events; the log is used when unset.
    pub event_sink: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Blank("log_level"));
        }
        if self.db_file.as_os_str().is_empty() {
            return Err(ConfigError::Blank("db_file"));
        }
        if self.event_topic.trim().is_empty() {
            return Err(ConfigError::Blank("event_topic"));
        }
        Ok(())
    }
}
