//! Static chain and pool descriptors.

use alloy_primitives::{Address, B256};
use serde::Deserialize;

/// One ERC-20 token of the watched pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenConfig {
    /// Token contract address.
    pub address: Address,
    /// Number of decimals the token uses on chain.
    pub decimals: u8,
    /// Display symbol, used only for logging.
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Immutable descriptor of one watched chain.
///
/// Built once at startup from configuration and shared read-only with the
/// price reader for that chain.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Human-readable chain key (e.g. `base-sepolia`).
    pub name: String,
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// JSON-RPC endpoint.
    #[serde(default)]
    pub rpc_url: String,
    /// Uniswap v4 pool id (bytes32).
    pub pool_id: B256,
    /// StateView contract used to read the pool's slot0.
    pub state_view: Address,
    /// Token being priced.
    pub base_token: TokenConfig,
    /// Token the price is quoted in (USDC).
    pub quote_token: TokenConfig,
}

impl ChainConfig {
    /// True when the priced token sorts first in the pool (is token0).
    ///
    /// Address ordering on the raw bytes matches a case-insensitive
    /// comparison of the hex strings.
    #[must_use]
    pub fn base_is_token0(&self) -> bool {
        self.base_token.address < self.quote_token.address
    }
}
