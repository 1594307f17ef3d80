//! Scan target: the host, the inclusive port range and the per-probe timeout.

use super::port::PortRange;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Immutable input to the port scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    /// Host as configured (hostname or IP literal).
    pub host: String,
    /// Inclusive range of candidate ports.
    pub range: PortRange,
    /// Connect timeout for a single probe.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
}

impl ScanTarget {
    pub fn new(host: impl Into<String>, range: PortRange, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            range,
            timeout,
        }
    }

    /// Resolve the host to the address that will be probed.
    pub async fn resolve(&self) -> ConfigResult<IpAddr> {
        resolve_host(&self.host).await
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ports {} (timeout {}ms)",
            self.host,
            self.range,
            self.timeout.as_millis()
        )
    }
}

/// Resolve a hostname or IP address string to an IpAddr.
pub async fn resolve_host(host: &str) -> ConfigResult<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| ConfigError::Unresolvable {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

    response
        .iter()
        .next()
        .ok_or_else(|| ConfigError::Unresolvable {
            host: host.to_string(),
            reason: "no addresses returned".to_string(),
        })
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::Ipv4Addr;

    #[test]
    fn test_target_display() {
        let range = PortRange::new(Port::new(8000).unwrap(), Port::new(8100).unwrap()).unwrap();
        let target = ScanTarget::new("10.0.0.5", range, Duration::from_millis(250));
        assert_eq!(target.to_string(), "10.0.0.5 ports 8000-8100 (timeout 250ms)");
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let ip = tokio_test::assert_ok!(resolve_host("127.0.0.1").await);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_timeout_serializes_as_millis() {
        let target = ScanTarget::new(
            "127.0.0.1",
            PortRange::single(Port::new(80).unwrap()),
            Duration::from_millis(1500),
        );
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["timeout"], 1500);
    }
}
