//! `reqwest`-backed transport.

use super::{FetchResponse, Transport};
use crate::error::{TransportError, TransportResult};
use crate::scanner::ScanReport;
use crate::types::Port;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::net::Ipv6Addr;
use tracing::{debug, warn};

/// Plain-HTTP transport bound to one host.
///
/// No request timeout is configured; a stalled service stalls the walk.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    host: String,
}

impl HttpTransport {
    pub fn new(host: impl Into<String>) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("probewalk/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self {
            client,
            host: host.into(),
        })
    }

    /// Transport bound to the address the scan probed, not the configured
    /// hostname.
    pub fn for_scan(report: &ScanReport) -> TransportResult<Self> {
        Self::new(report.ip_address.clone())
    }

    /// Absolute URL for `path` on `port`.
    pub fn url(&self, port: Port, path: &str) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("http://[{}]:{}{}", self.host, port, path)
        } else {
            format!("http://{}:{}{}", self.host, port, path)
        }
    }
}

fn log_status(url: &str, response: &Response) {
    let status = response.status();
    if status.is_success() {
        debug!(%url, %status, "response");
    } else {
        warn!(%url, %status, "non-success status");
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, port: Port, path: &str) -> TransportResult<FetchResponse> {
        let url = self.url(port, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        log_status(&url, &response);

        let status = response.status().as_u16();
        let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body { url, source })?;

        Ok(FetchResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    async fn post(&self, port: Port, path: &str, body: Vec<u8>) -> TransportResult<Vec<u8>> {
        let url = self.url(port, path);
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        log_status(&url, &response);

        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body { url, source })?;
        Ok(body.to_vec())
    }
}
