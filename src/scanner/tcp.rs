//! TCP connect prober.
//!
//! Performs a standard TCP connect using the operating system's socket API,
//! bounded by a per-attempt timeout. The connection is dropped as soon as it
//! is established.

use crate::scanner::traits::{PortStatus, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect prober for a single target address.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    target: IpAddr,
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a new prober.
    ///
    /// # Arguments
    /// * `target` - Address to probe
    /// * `timeout` - Connect timeout per attempt
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, port: Port) -> PortStatus {
        let addr = SocketAddr::new(self.target, port.as_u16());
        status_within(self.timeout, addr, TcpStream::connect(addr)).await
    }
}

/// Open only if `connect` succeeds before `limit` elapses.
async fn status_within<F, S>(limit: Duration, addr: SocketAddr, connect: F) -> PortStatus
where
    F: Future<Output = io::Result<S>>,
{
    match timeout(limit, connect).await {
        Ok(Ok(stream)) => {
            drop(stream);
            PortStatus::Open
        }
        Ok(Err(e)) => {
            trace!(%addr, error = %e, "connect failed");
            PortStatus::Closed
        }
        Err(_) => {
            trace!(%addr, "connect timed out");
            PortStatus::Closed
        }
    }
}
