//! Output formatting module.
//!
//! Human-readable console rendering of the scan and of each port's walk.

use crate::scanner::ScanReport;
use crate::types::ScanTarget;
use crate::workflow::{PortOutcome, PortReport, StepOutcome, StepRecord};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print a header before scanning begins.
pub fn print_scan_header(target: &ScanTarget) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("probewalk").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(&target.host).white().bold()
    );
    println!(
        "{} Scanning {} ports ({}) with {}ms timeout...",
        style("•").dim(),
        style(target.range.len()).white().bold(),
        target.range,
        target.timeout.as_millis()
    );
    println!();
}

/// Print the scan summary to stdout.
pub fn print_scan(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_scan(&mut out, report)
}

/// Print every port's walk to stdout.
pub fn print_reports(reports: &[PortReport]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_reports(&mut out, reports)
}

pub fn write_scan<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} {} ({})",
        style("Target:").bold(),
        report.host,
        report.ip_address
    )?;
    writeln!(
        out,
        "  {} {} ports scanned in {:.2}s",
        style("Statistics:").bold(),
        report.ports_scanned,
        report.duration_ms as f64 / 1000.0
    )?;

    if report.open.is_empty() {
        writeln!(
            out,
            "  {}",
            style("Couldn't find any open ports in the specified range.").yellow()
        )?;
    } else {
        let ports: Vec<String> = report.open.sorted().iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "  {} {}",
            style("Found open ports:").bold(),
            style(ports.join(", ")).green().bold()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn write_reports<W: Write>(out: &mut W, reports: &[PortReport]) -> io::Result<()> {
    for report in reports {
        write_report(out, report)?;
    }

    let done = reports.iter().filter(|r| r.is_done()).count();
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "  {} {} completed, {} aborted",
        style("Summary:").bold(),
        style(done).green().bold(),
        style(reports.len() - done).red()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &PortReport) -> io::Result<()> {
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "  {} {}",
        style("Port").cyan().bold(),
        style(report.port).white().bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for step in &report.steps {
        writeln!(
            out,
            "  {:<16}  {}",
            style(step.endpoint).bold(),
            describe(step)
        )?;
    }

    match &report.outcome {
        PortOutcome::Done { response } => {
            writeln!(
                out,
                "  {:<16}  {}",
                Style::new().green().bold().apply_to("DONE"),
                truncate_string(response, 60)
            )?;
        }
        PortOutcome::Aborted { error } => {
            writeln!(
                out,
                "  {:<16}  {} ({})",
                Style::new().red().bold().apply_to("ABORTED"),
                error,
                style(report.last_state).dim()
            )?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn describe(step: &StepRecord) -> String {
    match &step.outcome {
        StepOutcome::Observed { fetched, reply } => {
            let mut parts = Vec::new();
            if let Some(fetched) = fetched {
                parts.push(format!(
                    "GET {} {}",
                    fetched.status,
                    truncate_string(fetched.body.trim(), 30)
                ));
            }
            if let Some(reply) = reply {
                parts.push(format!("POST {}", truncate_string(reply.trim(), 30)));
            }
            parts.join(" | ")
        }
        StepOutcome::SecretObtained { attempts } => {
            format!("secret obtained after {} attempt(s)", attempts)
        }
        StepOutcome::LevelObtained { level } => format!("level {}", level),
        StepOutcome::Submitted { response } => {
            format!("submitted: {}", truncate_string(response.trim(), 40))
        }
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if
/// truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::OpenPortSet;
    use crate::types::Port;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_write_scan_lists_ports_ascending() {
        console::set_colors_enabled(false);
        let report = ScanReport {
            host: "localhost".to_string(),
            ip_address: "127.0.0.1".to_string(),
            ports_scanned: 100,
            duration_ms: 1200,
            open: [8090, 8080].into_iter().filter_map(Port::new).collect(),
        };

        let mut buf = Vec::new();
        write_scan(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Found open ports: 8080, 8090"));
        assert!(text.contains("100 ports scanned"));
    }

    #[test]
    fn test_write_scan_empty() {
        console::set_colors_enabled(false);
        let report = ScanReport {
            host: "localhost".to_string(),
            ip_address: "127.0.0.1".to_string(),
            ports_scanned: 10,
            duration_ms: 5,
            open: OpenPortSet::new(),
        };

        let mut buf = Vec::new();
        write_scan(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Couldn't find any open ports"));
    }
}
