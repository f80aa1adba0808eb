//! Command-line interface definitions for tcpsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. `-h` selects
//! the host range, so help is only available as `--help`.

use crate::config::{ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigResult;
use crate::types::{HostRange, PortRange};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// A TCP connect scanner driving a fixed pool of non-blocking sockets.
#[derive(Parser, Debug)]
#[command(name = "tcpsweep")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A simple TCP port scanner using non-blocking sockets", long_about = None)]
#[command(disable_help_flag = true)]
#[command(after_help = "Examples:\n  \
    tcpsweep -p 1-1000 -v -s 512 -t 2 -h 192.168.0.2\n  \
    tcpsweep -p 22 -o ip.log -m 250 -h 192.168.0.0/16")]
pub struct Args {
    /// Host or range to scan (e.g. "192.168.1.10", "192.168.1.0/24")
    #[arg(short = 'h', long = "host", value_name = "HOST[/BITS]")]
    pub host: String,

    /// Port or port range to scan (e.g. "22", "1-1000")
    #[arg(short = 'p', long = "ports", value_name = "PORT[-PORT]")]
    pub ports: String,

    /// Connection timeout in seconds
    #[arg(short = 't', long, value_name = "SECS", env = "TCPSWEEP_TIMEOUT",
          default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of parallel sockets (max 1024)
    #[arg(short = 's', long = "sockets", value_name = "N", env = "TCPSWEEP_CONCURRENCY",
          default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Sleep between polls of in-flight sockets, in milliseconds
    #[arg(short = 'm', long = "interval", value_name = "MS", env = "TCPSWEEP_INTERVAL",
          default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval: u64,

    /// Append open ports to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbose output (scan header, every open port, timing summary)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Args {
    /// Parse the host and port specifications and validate the rest.
    pub fn into_config(self) -> ConfigResult<ScanConfig> {
        let hosts: HostRange = self.host.parse()?;
        let ports: PortRange = self.ports.parse()?;

        let config = ScanConfig::new(hosts, ports)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_interval(Duration::from_millis(self.interval))
            .with_concurrency(self.concurrency)
            .with_verbose(self.verbose);

        let config = match self.output {
            Some(path) => config.with_log_file(path),
            None => config,
        };

        config.validate()
    }
}
