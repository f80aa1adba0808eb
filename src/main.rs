use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tcpsweep::cli::Args;
use tcpsweep::output::{self, OpenPortSink};
use tcpsweep::scanner::{ScanScheduler, TargetEnumerator, TcpConnector};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

// One thread drives every socket; concurrency comes from non-blocking I/O.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let mut sink = OpenPortSink::open(config.log_file(), config.verbose())?;

    if config.verbose() {
        output::print_scan_header(&config, chrono::Local::now())
            .context("failed to write scan header")?;
    }

    let cancel = CancellationToken::new();
    tokio::spawn(watch_interrupt(cancel.clone()));

    let targets = TargetEnumerator::new(config.hosts(), config.ports());
    let progress = output::progress_bar(targets.total());
    let mut scheduler = ScanScheduler::new(
        TcpConnector::new(),
        targets,
        config.concurrency(),
        config.schedule(),
    )
    .with_progress(progress)
    .with_cancel(cancel)
    .with_verbose(config.verbose());

    let summary = scheduler.run(&mut sink).await;

    output::print_summary(&summary, config.verbose()).context("failed to write summary")?;
    Ok(())
}

/// Cancel the scan on the first Ctrl-C. Later ones are swallowed while the
/// scheduler drains.
async fn watch_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        output::print_info("Interrupted, cleaning up, please wait...");
        cancel.cancel();
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
