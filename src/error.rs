//! Error types for probewalk.
//!
//! Uses `thiserror` for ergonomic error definitions. Only [`ConfigError`] is
//! fatal; every other error is scoped to a single port's walk.

use crate::protocol::Endpoint;
use thiserror::Error;

/// Startup configuration errors. Any of these aborts the process before
/// the first connection attempt.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),

    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("failed to resolve host '{host}': {reason}")]
    Unresolvable { host: String, reason: String },
}

/// Failure of a single request/response exchange.
///
/// Status codes never produce this error; only failing to build, send or
/// read an exchange does.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading response body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure to extract a typed value from a plain-text response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected prefix {prefix:?} in response {body:?}")]
    MissingPrefix { prefix: &'static str, body: String },

    #[error("response {body:?} carries an empty value")]
    Empty { body: String },

    #[error("level {value:?} is not an integer")]
    NotAnInteger { value: String },
}

/// Why a step ended a port's walk early.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("{endpoint}: transport failure: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },

    #[error("{endpoint}: undecodable response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: DecodeError,
    },

    #[error("{endpoint}: still not ready after {attempts} attempts")]
    PollExhausted { endpoint: Endpoint, attempts: u32 },

    #[error("{endpoint}: session has no {field} yet")]
    MissingState {
        endpoint: Endpoint,
        field: &'static str,
    },
}

impl StepError {
    /// The endpoint whose step failed.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::PollExhausted { endpoint, .. }
            | Self::MissingState { endpoint, .. } => *endpoint,
        }
    }
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for transport calls.
pub type TransportResult<T> = Result<T, TransportError>;
