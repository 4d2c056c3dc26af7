//! Token health and connection check.

use anyhow::Result;

use pinch_core::{TokenSource, TokenStatus};
use pinch_fetch::{FileTokenSource, UsageClient};

use crate::{Cli, OutputFormat};

/// Prints credential health, then tests the connection with one fetch.
///
/// Never exposes token content in any message.
pub fn run(cli: &Cli) -> Result<()> {
    let source = FileTokenSource::new();
    let health = source.check_health();

    let (connected, message) = match source.read_token() {
        None => (false, "No OAuth token found".to_string()),
        Some(token) => {
            let client = UsageClient::new()?;
            match client.fetch_usage(&token) {
                Ok(snapshot) => (
                    true,
                    format!("Connected! 5h: {:.0}%", snapshot.five_hour.utilization),
                ),
                Err(error) => (false, format!("Connection failed: {error}")),
            }
        }
    };

    if cli.format == OutputFormat::Json {
        let report = serde_json::json!({
            "token_status": health.status,
            "token_reason": health.reason,
            "connected": connected,
            "message": message,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let status = match health.status {
            TokenStatus::Ok => "ok",
            TokenStatus::Expiring => "expiring",
            TokenStatus::Expired => "expired",
            TokenStatus::Missing => "missing",
        };
        println!("Token:      {status} ({})", health.reason);
        println!("Connection: {message}");
    }

    if !connected {
        std::process::exit(1);
    }
    Ok(())
}
