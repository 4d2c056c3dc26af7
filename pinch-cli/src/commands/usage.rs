//! One-shot usage poll.

use anyhow::Result;

use crate::output;
use crate::Cli;

/// Polls once and prints the resulting snapshot.
pub fn run(cli: &Cli) -> Result<()> {
    let (monitor, _state) = super::build_monitor()?;
    let snapshot = monitor.poll_once();
    output::print_snapshot(&snapshot, cli.format)?;
    Ok(())
}
