//! # probewalk - Port Discovery and Challenge API Walker
//!
//! probewalk finds the TCP ports that accept connections on a host, then
//! walks a fixed sequence of HTTP endpoints on each of them: it signs up,
//! polls for a per-session secret, reads the session level and finally
//! submits a payload built from both.
//!
//! ## Features
//!
//! - **Bounded concurrent scanning**: one probe per port, at most N in flight
//! - **Sequential endpoint walk**: per port, strictly one request at a time
//! - **Bounded polling**: the secret endpoint is retried under a fixed budget
//! - **Per-port isolation**: a failing port never stops the others
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use probewalk::client::HttpTransport;
//! use probewalk::scanner::{run_scan, ScanOptions};
//! use probewalk::workflow::{PollPolicy, WorkflowEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = probewalk::config::AppConfig::load(None, &Default::default())?;
//!     let scan = run_scan(&config.target, &config.scan).await?;
//!
//!     let engine = WorkflowEngine::new(
//!         HttpTransport::new(&config.target.host)?,
//!         &config.user,
//!         config.poll,
//!     );
//!     for report in engine.run_all(&scan.open).await {
//!         println!("{}: done = {}", report.port, report.is_done());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port and scan target types
//! - [`scanner`] - Probers and the bounded fan-out scan
//! - [`client`] - The `Transport` seam and its HTTP implementation
//! - [`protocol`] - Endpoint sequence, wire bodies and response decoders
//! - [`workflow`] - Session state machine and the per-port walk
//! - [`config`] - One immutable run configuration
//! - [`error`] - Error types
//! - [`output`] - Console rendering

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod protocol;
pub mod scanner;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use error::{ConfigError, DecodeError, StepError, TransportError};
pub use scanner::{OpenPortSet, PortStatus, Prober};
pub use types::{Port, PortRange, ScanTarget};
pub use workflow::{PollPolicy, PortReport, WorkflowEngine};
