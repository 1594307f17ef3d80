//! Scanner module - discovers open ports in a range.
//!
//! Every candidate port gets exactly one probe. Probes run concurrently,
//! bounded by a configurable limit, and their outcomes fan in to an
//! [`OpenPortSet`] once every probe has finished.

pub mod tcp;
pub mod traits;

use crate::error::ConfigResult;
use crate::types::{Port, PortRange, ScanTarget};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub use tcp::TcpConnectProber;
pub use traits::{PortStatus, Prober};

/// Ports that accepted a connection during one scan.
///
/// Iteration order is unspecified; use [`OpenPortSet::sorted`] when a
/// stable order is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenPortSet {
    ports: HashSet<Port>,
}

impl OpenPortSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.contains(&port)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Ports in ascending order.
    pub fn sorted(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = self.iter().collect();
        ports.sort_unstable();
        ports
    }
}

impl FromIterator<Port> for OpenPortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        Self {
            ports: iter.into_iter().collect(),
        }
    }
}

impl Extend<Port> for OpenPortSet {
    fn extend<I: IntoIterator<Item = Port>>(&mut self, iter: I) {
        self.ports.extend(iter);
    }
}

/// Scan settings that are not part of the target itself.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 500,
            show_progress: false,
        }
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub host: String,
    pub ip_address: String,
    pub ports_scanned: usize,
    pub duration_ms: u64,
    pub open: OpenPortSet,
}

/// Resolve the target and probe every port in its range over TCP.
pub async fn run_scan(target: &ScanTarget, options: &ScanOptions) -> ConfigResult<ScanReport> {
    let ip = target.resolve().await?;
    let prober = TcpConnectProber::new(ip, target.timeout);
    let start_time = Instant::now();

    info!(
        host = %target.host,
        %ip,
        range = %target.range,
        concurrency = options.concurrency,
        "starting port scan"
    );

    let progress = options
        .show_progress
        .then(|| progress_bar(target.range.len() as u64));

    let open = scan_ports(&prober, target.range, options.concurrency, progress.as_ref()).await;

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    let duration = start_time.elapsed();
    info!(
        open = open.len(),
        elapsed_ms = duration.as_millis() as u64,
        "port scan finished"
    );

    Ok(ScanReport {
        host: target.host.clone(),
        ip_address: ip.to_string(),
        ports_scanned: target.range.len(),
        duration_ms: duration.as_millis() as u64,
        open,
    })
}

/// Probe every port in `range` with at most `concurrency` probes in flight.
///
/// Returns only after every probe has completed; there is no early exit.
pub async fn scan_ports<P>(
    prober: &P,
    range: PortRange,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> OpenPortSet
where
    P: Prober + ?Sized,
{
    stream::iter(range.iter())
        .map(move |port| async move {
            let status = prober.probe(port).await;

            if let Some(pb) = progress {
                pb.inc(1);
                if status.is_open() {
                    pb.set_message(format!("Found open port: {}", port));
                }
            }
            if status.is_open() {
                debug!(%port, "port open");
            }

            (port, status)
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|(port, status)| async move { status.is_open().then_some(port) })
        .collect()
        .await
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
