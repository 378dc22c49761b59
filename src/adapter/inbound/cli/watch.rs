//! Handler for the `watch` command.

use tracing::error;

use crate::adapter::inbound::cli::command::WatchArgs;
use crate::domain::price::PriceDiscrepancy;
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;
use crate::port::inbound::operator::watch::{DiscrepancySink, ShutdownSignal, WatchRequest};

/// Execute the watch command.
///
/// Runs until Ctrl-C, printing each discrepancy as a JSON line on stdout.
/// With `--once`, polls a single time and prints the snapshot instead.
pub async fn execute(operator: &dyn OperatorPort, args: &WatchArgs) -> Result<()> {
    let request = build_watch_request(args);

    if args.once {
        let snapshot = operator.poll_snapshot(&request).await?;
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
        return Ok(());
    }

    let sink: DiscrepancySink = Box::new(|discrepancy: &PriceDiscrepancy| match serde_json::to_string(discrepancy) {
        Ok(line) => println!("{line}"),
        Err(e) => error!(component = "PriceWatcher", error = %e, "Failed to encode discrepancy"),
    });
    let shutdown: ShutdownSignal = Box::pin(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
    });

    operator.watch(&request, sink, shutdown).await
}

fn build_watch_request(args: &WatchArgs) -> WatchRequest {
    WatchRequest {
        threshold_bps: args.threshold_bps,
        poll_interval_ms: args.poll_interval_ms,
    }
}
