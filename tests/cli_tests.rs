//! Binary-level behavior of the `spreadvault` CLI.

mod support;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use spreadvault::testkit::keys::ENTITY_SECRET_HEX;

use support::config::{config_with, write_config, CHAINS_TOML, SETTLEMENT_TOML};

/// Command run from an empty directory so no stray `.env` is picked up.
fn spreadvault(workdir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("spreadvault");
    cmd.current_dir(workdir.path())
        .env_remove("LEDGER_API_KEY")
        .env_remove("ENTITY_SECRET_HEX")
        .env_remove("CHAIN_A_RPC_URL")
        .env_remove("CHAIN_B_RPC_URL");
    cmd
}

fn with_secrets(cmd: &mut Command) -> &mut Command {
    cmd.env("LEDGER_API_KEY", "test-key")
        .env("ENTITY_SECRET_HEX", ENTITY_SECRET_HEX)
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    spreadvault(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("settle"));
}

#[test]
fn version_names_binary() {
    let dir = TempDir::new().unwrap();
    spreadvault(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("spreadvault"));
}

#[test]
fn missing_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    spreadvault(&dir)
        .args(["--config", "absent.toml", "settle", "--session", "s1", "--profit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn invalid_config_names_the_field() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&config_with("[watcher]\nthreshold_bps = -5.0\n"));

    spreadvault(&dir)
        .arg("--config")
        .arg(config.path())
        .args(["watch", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("watcher.threshold_bps"));
}

#[test]
fn settle_without_profit_succeeds_without_transfer() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&config_with(SETTLEMENT_TOML));

    with_secrets(&mut spreadvault(&dir))
        .arg("--config")
        .arg(config.path())
        .args(["settle", "--session", "s1", "--profit", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profit to settle"))
        .stdout(predicate::str::contains("\"settled\": false"));
}

#[test]
fn settle_failed_session_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&config_with(SETTLEMENT_TOML));

    with_secrets(&mut spreadvault(&dir))
        .arg("--config")
        .arg(config.path())
        .args(["settle", "--session", "s1", "--profit", "5", "--status", "failed"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Session status: FAILED"))
        .stderr(predicate::str::contains("settlement not completed"));
}

#[test]
fn settle_without_secrets_reports_missing_api_key() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&config_with(SETTLEMENT_TOML));

    spreadvault(&dir)
        .arg("--config")
        .arg(config.path())
        .args(["settle", "--session", "s1", "--profit", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LEDGER_API_KEY"));
}

#[test]
fn settle_without_vault_reports_missing_field() {
    let dir = TempDir::new().unwrap();
    let config = write_config(CHAINS_TOML);

    with_secrets(&mut spreadvault(&dir))
        .arg("--config")
        .arg(config.path())
        .args(["settle", "--session", "s1", "--profit", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settlement.vault_wallet_id"));
}

#[test]
fn watch_rejects_zero_interval_override() {
    let dir = TempDir::new().unwrap();
    let config = write_config(CHAINS_TOML);

    spreadvault(&dir)
        .arg("--config")
        .arg(config.path())
        .args(["watch", "--once", "--poll-interval-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll_interval_ms"));
}
