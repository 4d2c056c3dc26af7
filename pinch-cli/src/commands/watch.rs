//! Continuous monitoring mode.

use anyhow::Result;
use tracing::info;

use crate::output;
use crate::Cli;

/// Arguments for the watch command.
#[derive(clap::Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (overrides the configured value).
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// Runs the monitor and prints every published snapshot until interrupted.
pub fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let (monitor, state) = super::build_monitor()?;

    if let Some(interval) = args.interval {
        monitor.update_interval(interval);
    }

    let format = cli.format;
    state.subscribe(move |snapshot| {
        if output::print_snapshot(snapshot, format).is_ok() {
            println!();
        }
    });

    monitor
        .start()
        .map_err(|e| anyhow::anyhow!("failed to start monitor: {e}"))?;
    info!("Watching usage; press Ctrl-C to exit");

    // The monitor thread does all the work; this thread just stays alive.
    loop {
        std::thread::park();
    }
}
