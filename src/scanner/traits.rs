//! Prober trait abstraction.
//!
//! A prober performs exactly one connection attempt against one port. The
//! scan driver owns fan-out and aggregation, so probers stay trivially
//! swappable in tests.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single probe.
///
/// Refusal, timeout and unreachability all collapse into `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// A connection was established within the timeout.
    Open,
    /// Anything else.
    Closed,
}

impl PortStatus {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Trait for single-attempt port probes.
///
/// # Example
///
/// ```ignore
/// use probewalk::scanner::{Prober, PortStatus};
///
/// async fn is_open<P: Prober>(prober: &P, port: Port) -> bool {
///     prober.probe(port).await == PortStatus::Open
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Attempt one connection to `port`. Never retries.
    async fn probe(&self, port: Port) -> PortStatus;
}
