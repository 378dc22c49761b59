use std::io::Write;

use tempfile::NamedTempFile;

/// Two chains on local RPC endpoints, ETH (18) quoted in USDC (6).
pub const CHAINS_TOML: &str = r#"
[chains.a]
name = "base-sepolia"
chain_id = 84532
rpc_url = "http://127.0.0.1:8545"
pool_id = "0x1111111111111111111111111111111111111111111111111111111111111111"
state_view = "0x4444444444444444444444444444444444444444"
base_token = { address = "0x1111111111111111111111111111111111111111", decimals = 18, symbol = "ETH" }
quote_token = { address = "0x2222222222222222222222222222222222222222", decimals = 6, symbol = "USDC" }

[chains.b]
name = "unichain-sepolia"
chain_id = 1301
rpc_url = "http://127.0.0.1:8546"
pool_id = "0x2222222222222222222222222222222222222222222222222222222222222222"
state_view = "0x4444444444444444444444444444444444444444"
base_token = { address = "0x3333333333333333333333333333333333333333", decimals = 18, symbol = "ETH" }
quote_token = { address = "0x2222222222222222222222222222222222222222", decimals = 6, symbol = "USDC" }
"#;

/// Ledger and settlement sections pointing at an unroutable endpoint.
pub const SETTLEMENT_TOML: &str = r#"
[ledger]
api_url = "http://127.0.0.1:9"
source_wallet_id = "source-wallet"

[settlement]
vault_wallet_id = "vault-wallet"
"#;

/// Chains plus `extra`, appended verbatim.
pub fn config_with(extra: &str) -> String {
    format!("{CHAINS_TOML}\n{extra}")
}

/// Write `contents` to a temporary `.toml` file kept alive by the handle.
pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("spreadvault-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file.flush().expect("flush temp config");
    file
}
