//! Application configuration.
//!
//! Values are read once at startup from (lowest to highest precedence) a
//! `.env` file, the process environment and command-line overrides, then
//! frozen into an [`AppConfig`]. The env file is read into a map; it never
//! modifies the process environment.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanOptions;
use crate::types::{Port, PortRange, ScanTarget};
use crate::workflow::PollPolicy;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const KEY_HOST: &str = "IP";
pub const KEY_START_PORT: &str = "START_PORT";
pub const KEY_END_PORT: &str = "END_PORT";
pub const KEY_TIMEOUT: &str = "TIMEOUT";
pub const KEY_CONCURRENCY: &str = "SCAN_CONCURRENCY";
pub const KEY_POLL_ATTEMPTS: &str = "SECRET_POLL_MAX_ATTEMPTS";
pub const KEY_POLL_DELAY: &str = "SECRET_POLL_BACKOFF_MS";
pub const KEY_USER: &str = "WORKFLOW_USER";
pub const KEY_PROGRESS: &str = "SCAN_PROGRESS";

/// Env file read when no explicit path is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// User name sent to the remote service when none is configured.
pub const DEFAULT_USER: &str = "testUser";

/// Immutable run configuration, passed to the scanner and the engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target: ScanTarget,
    pub scan: ScanOptions,
    pub poll: PollPolicy,
    pub user: String,
}

impl AppConfig {
    /// Build the configuration from a key lookup.
    ///
    /// `IP`, `START_PORT`, `END_PORT` and `TIMEOUT` are required; every
    /// other key has a default.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(KEY_HOST)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::Missing(KEY_HOST))?;

        let start = parse_port(&lookup, KEY_START_PORT)?;
        let end = parse_port(&lookup, KEY_END_PORT)?;
        let range = PortRange::new(start, end)
            .map_err(|_| ConfigError::InvalidRange(start.as_u16(), end.as_u16()))?;

        let timeout_ms: u64 = parse_required(&lookup, KEY_TIMEOUT)?;
        if timeout_ms == 0 {
            return Err(invalid(KEY_TIMEOUT, "0", "must be greater than zero"));
        }

        let concurrency: usize = parse_optional(&lookup, KEY_CONCURRENCY)?
            .unwrap_or(ScanOptions::default().concurrency);
        if concurrency == 0 {
            return Err(invalid(KEY_CONCURRENCY, "0", "must be greater than zero"));
        }

        let max_attempts: u32 =
            parse_optional(&lookup, KEY_POLL_ATTEMPTS)?.unwrap_or(PollPolicy::DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(invalid(KEY_POLL_ATTEMPTS, "0", "must be greater than zero"));
        }
        let delay_ms: u64 = parse_optional(&lookup, KEY_POLL_DELAY)?.unwrap_or(0);

        let show_progress: bool = parse_optional(&lookup, KEY_PROGRESS)?.unwrap_or(false);

        let user = lookup(KEY_USER)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Ok(Self {
            target: ScanTarget::new(host, range, Duration::from_millis(timeout_ms)),
            scan: ScanOptions {
                concurrency,
                show_progress,
            },
            poll: PollPolicy::new(max_attempts).with_delay(Duration::from_millis(delay_ms)),
            user,
        })
    }

    /// Build from `overrides`, then the process environment, then the env
    /// file.
    pub fn load(env_file: Option<&Path>, overrides: &HashMap<&'static str, String>) -> ConfigResult<Self> {
        let file = load_env_file(env_file)?;
        debug!(entries = file.len(), "env file values");

        Self::from_lookup(|key| {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .or_else(|| file.get(key).cloned())
        })
    }
}

/// Read `path`, or `./.env` when no path is given. A missing default file
/// yields no values; an explicit path must be readable.
pub fn load_env_file(path: Option<&Path>) -> ConfigResult<HashMap<String, String>> {
    match path {
        Some(path) => read_env_file(path),
        None => read_optional_env_file(Path::new(DEFAULT_ENV_FILE)),
    }
}

/// Like [`read_env_file`], but a file that does not exist reads as empty.
/// Any other I/O failure is still an error.
fn read_optional_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    match read_env_file(path) {
        Err(ConfigError::EnvFile(err)) if err.not_found() => {
            debug!(path = %path.display(), "no env file");
            Ok(HashMap::new())
        }
        other => other,
    }
}

/// Read an env file into a map.
pub fn read_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let mut values = HashMap::new();
    for entry in dotenvy::from_path_iter(path)? {
        let (key, value) = entry?;
        values.insert(key, value);
    }
    Ok(values)
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_port<F>(lookup: &F, key: &'static str) -> ConfigResult<Port>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    raw.parse::<Port>()
        .map_err(|e| invalid(key, &raw, e.to_string()))
}

fn parse_required<T, F>(lookup: &F, key: &'static str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    parse_optional(lookup, key)?.ok_or(ConfigError::Missing(key))
}

fn parse_optional<T, F>(lookup: &F, key: &'static str) -> ConfigResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(key, &raw, e.to_string())),
    }
}
