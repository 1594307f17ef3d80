//! Command-line interface definitions for probewalk.
//!
//! Uses `clap` derive macros. The binary needs no arguments: each flag is
//! backed by its environment variable through clap's `env` attribute, and an
//! explicit flag wins over the variable. Keys missing from both fall back
//! to the `.env` file during config loading.

use crate::config::{
    KEY_CONCURRENCY, KEY_END_PORT, KEY_HOST, KEY_POLL_ATTEMPTS, KEY_POLL_DELAY, KEY_PROGRESS,
    KEY_START_PORT, KEY_TIMEOUT, KEY_USER,
};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

/// Discover open ports on a host and walk the challenge API on each one.
#[derive(Parser, Debug, Default)]
#[command(name = "probewalk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Port discovery plus a scripted walk of a token-issuing HTTP service", long_about = None)]
pub struct Args {
    /// Target host
    #[arg(long, env = KEY_HOST, value_name = "HOST")]
    pub host: Option<String>,

    /// First port of the scan range
    #[arg(long, env = KEY_START_PORT, value_name = "PORT")]
    pub start_port: Option<String>,

    /// Last port of the scan range
    #[arg(long, env = KEY_END_PORT, value_name = "PORT")]
    pub end_port: Option<String>,

    /// Per-probe connect timeout in milliseconds
    #[arg(short = 't', long, env = KEY_TIMEOUT, value_name = "MS")]
    pub timeout: Option<String>,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long, env = KEY_CONCURRENCY)]
    pub concurrency: Option<String>,

    /// Maximum secret poll attempts
    #[arg(long, env = KEY_POLL_ATTEMPTS, value_name = "N")]
    pub poll_attempts: Option<String>,

    /// Pause between secret polls in milliseconds
    #[arg(long, env = KEY_POLL_DELAY, value_name = "MS")]
    pub poll_delay: Option<String>,

    /// User name sent to the service
    #[arg(short, long, env = KEY_USER)]
    pub user: Option<String>,

    /// Show a progress bar while scanning
    #[arg(long, env = KEY_PROGRESS)]
    pub progress: bool,

    /// Env file to load instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Values from flags or their environment variables, keyed by variable
    /// name.
    pub fn overrides(&self) -> HashMap<&'static str, String> {
        let pairs = [
            (KEY_HOST, self.host.clone()),
            (KEY_START_PORT, self.start_port.clone()),
            (KEY_END_PORT, self.end_port.clone()),
            (KEY_TIMEOUT, self.timeout.clone()),
            (KEY_CONCURRENCY, self.concurrency.clone()),
            (KEY_POLL_ATTEMPTS, self.poll_attempts.clone()),
            (KEY_POLL_DELAY, self.poll_delay.clone()),
            (KEY_USER, self.user.clone()),
            (KEY_PROGRESS, self.progress.then(|| "true".to_string())),
        ];

        pairs
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect()
    }
}
