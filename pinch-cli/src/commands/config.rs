//! Configuration management.

use anyhow::Result;

use pinch_store::Settings;

use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(clap::Args)]
pub struct ConfigArgs {
    /// Set the poll interval in seconds (must be positive).
    #[arg(long, value_name = "SECONDS")]
    pub set_interval: Option<u64>,
}

/// Shows the current settings, or updates and persists them.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    let mut settings = Settings::load();

    if let Some(interval) = args.set_interval {
        anyhow::ensure!(interval > 0, "poll interval must be positive");
        settings.poll_interval = interval;
        settings.save()?;
    }

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        println!("poll_interval: {}s", settings.poll_interval);
        if let Ok(path) = Settings::default_path() {
            println!("settings file: {}", path.display());
        }
    }

    Ok(())
}
