//! Configuration management for probewalk.
//!
//! Everything the run needs is assembled once into [`AppConfig`].

mod settings;

pub use settings::{
    load_env_file, read_env_file, AppConfig, DEFAULT_ENV_FILE, DEFAULT_USER, KEY_CONCURRENCY, KEY_END_PORT,
    KEY_HOST, KEY_POLL_ATTEMPTS, KEY_POLL_DELAY, KEY_PROGRESS, KEY_START_PORT, KEY_TIMEOUT,
    KEY_USER,
};
