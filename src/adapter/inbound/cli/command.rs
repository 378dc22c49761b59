//! Command-line interface definitions.
//!
//! Defines the CLI structure for spreadvault using `clap`: `watch` runs
//! the cross-chain price watcher, `settle` settles one session's profit
//! into the vault.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::domain::settlement::SessionStatus;

/// Cross-chain pool price watcher and profit settlement
#[derive(Parser, Debug)]
#[command(name = "spreadvault")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch both pools and log price discrepancies until Ctrl-C
    Watch(WatchArgs),

    /// Settle a session's profit into the vault wallet
    Settle(SettleArgs),
}

#[derive(clap::Args, Debug)]
pub struct WatchArgs {
    /// Override the discrepancy threshold in basis points.
    #[arg(long)]
    pub threshold_bps: Option<f64>,

    /// Override the poll interval in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Poll once, print the snapshot as JSON and exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args, Debug)]
pub struct SettleArgs {
    /// Session identifier; also seeds the transfer idempotency key.
    #[arg(long)]
    pub session: String,

    /// Net profit realized by the session.
    #[arg(long)]
    pub profit: Decimal,

    /// Final session status.
    #[arg(long, value_enum, default_value_t = StatusArg::Completed)]
    pub status: StatusArg,

    /// Settle this amount instead of the profit (still capped by balance).
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Resolve balances and addresses but skip the transfer.
    #[arg(long)]
    pub dry_run: bool,

    /// Label for the first chain in the session record.
    #[arg(long, default_value = "chain-a")]
    pub chain_a: String,

    /// Label for the second chain in the session record.
    #[arg(long, default_value = "chain-b")]
    pub chain_b: String,
}

/// Session status accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Completed,
    Failed,
    Cancelled,
}

impl From<StatusArg> for SessionStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Completed => Self::Completed,
            StatusArg::Failed => Self::Failed,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_settle_with_defaults() {
        let cli = Cli::parse_from(["spreadvault", "settle", "--session", "s1", "--profit", "3.5"]);
        let Commands::Settle(args) = cli.command else {
            panic!("expected settle");
        };
        assert_eq!(args.session, "s1");
        assert_eq!(args.profit, dec!(3.5));
        assert!(matches!(args.status, StatusArg::Completed));
        assert!(args.amount.is_none());
        assert!(!args.dry_run);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn parses_settle_overrides() {
        let cli = Cli::parse_from([
            "spreadvault",
            "--config",
            "alt.toml",
            "settle",
            "--session",
            "s2",
            "--profit",
            "10",
            "--status",
            "failed",
            "--amount",
            "2",
            "--dry-run",
        ]);
        let Commands::Settle(args) = cli.command else {
            panic!("expected settle");
        };
        assert_eq!(SessionStatus::from(args.status), SessionStatus::Failed);
        assert_eq!(args.amount, Some(dec!(2)));
        assert!(args.dry_run);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }

    #[test]
    fn rejects_non_numeric_profit() {
        let result = Cli::try_parse_from(["spreadvault", "settle", "--session", "s1", "--profit", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_watch_overrides() {
        let cli = Cli::parse_from(["spreadvault", "watch", "--threshold-bps", "25", "--once"]);
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.threshold_bps, Some(25.0));
        assert!(args.once);
    }
}
