use anyhow::{Context, Result};
use clap::Parser;
use probewalk::cli::Args;
use probewalk::client::HttpTransport;
use probewalk::config::AppConfig;
use probewalk::output;
use probewalk::scanner::run_scan;
use probewalk::workflow::WorkflowEngine;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match AppConfig::load(args.env_file.as_deref(), &args.overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            output::print_error(&format!("invalid configuration: {}", e));
            return Err(e).context("configuration");
        }
    };
    info!(target = %config.target, user = %config.user, "configuration loaded");

    output::print_scan_header(&config.target);
    let scan = match run_scan(&config.target, &config.scan).await {
        Ok(scan) => scan,
        Err(e) => {
            output::print_error(&format!("scan failed: {}", e));
            return Err(e).context("port scan");
        }
    };
    output::print_scan(&scan)?;

    if scan.open.is_empty() {
        return Ok(());
    }

    let transport = HttpTransport::for_scan(&scan).context("http client")?;
    let engine = WorkflowEngine::new(transport, &config.user, config.poll);
    let reports = engine.run_all(&scan.open).await;

    output::print_reports(&reports)?;

    let aborted = reports.iter().filter(|r| !r.is_done()).count();
    if aborted > 0 {
        output::print_warning(&format!(
            "{} of {} port(s) aborted before submission",
            aborted,
            reports.len()
        ));
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "probewalk=debug" } else { "probewalk=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
