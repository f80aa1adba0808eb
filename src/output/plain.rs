//! Plain text console output.
//!
//! Status lines go to stderr so stdout carries only open-port results and
//! the final summary.

use crate::config::ScanConfig;
use crate::scanner::{estimate_duration, Hms, ScanSummary};
use chrono::{DateTime, Local};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};

/// Progress line drawn on stderr: `Open <found> [<percent>%]`.
pub fn progress_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    pb.set_style(style);
    pb
}

/// Print the verbose scan header.
pub fn print_scan_header(config: &ScanConfig, started: DateTime<Local>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let hosts = config.hosts();
    let ports = config.ports();

    writeln!(out)?;
    writeln!(
        out,
        "{} {} v{} at {}",
        style("Starting").cyan(),
        style("tcpsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        started.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        out,
        "{} Total hosts to scan {} ({} - {})",
        style("•").dim(),
        style(hosts.len()).white().bold(),
        hosts.first(),
        hosts.last()
    )?;
    writeln!(
        out,
        "{} Total targets to scan {} (ports {} - {})",
        style("•").dim(),
        style(config.total_targets()).white().bold(),
        ports.start(),
        ports.end()
    )?;
    let estimate = estimate_duration(config.total_targets(), config.concurrency(), config.timeout());
    writeln!(out, "{} Estimated time {}.", style("•").dim(), Hms(estimate))?;
    writeln!(out)?;

    Ok(())
}

/// Print the end-of-scan summary.
pub fn print_summary(summary: &ScanSummary, verbose: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if summary.interrupted {
        writeln!(
            out,
            "Open {} [{}]",
            style(summary.open).green().bold(),
            style("Interrupted").yellow()
        )?;
    } else {
        writeln!(out, "Open {} [Done]", style(summary.open).green().bold())?;
    }

    if verbose {
        writeln!(
            out,
            "  {} of {} targets probed: {} open, {} closed, {} timed out",
            summary.issued,
            summary.total,
            style(summary.open).green(),
            style(summary.closed).red(),
            style(summary.timed_out).yellow()
        )?;
        if summary.abandoned > 0 {
            writeln!(
                out,
                "  {} in-flight attempts released without a result",
                style(summary.abandoned).yellow()
            )?;
        }
        writeln!(out, "Scan completed in {}.", Hms(summary.elapsed))?;
    }

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}
