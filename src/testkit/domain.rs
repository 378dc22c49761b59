//! Builders for domain primitives used across tests.
//!
//! Concise factory functions for chains, balances and session results so
//! tests focus on assertions rather than construction boilerplate.

use alloy_primitives::{Address, B256};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::chain::{ChainConfig, TokenConfig};
use crate::domain::id::{SessionId, TokenId};
use crate::domain::settlement::{SessionResult, SessionStatus};
use crate::domain::wallet::{TokenDescriptor, WalletBalance};

/// Quote token address on every test chain.
pub const QUOTE_ADDRESS: Address = Address::repeat_byte(0x22);

/// Base token address that sorts before [`QUOTE_ADDRESS`] (base is token0).
pub const BASE_ADDRESS_LOW: Address = Address::repeat_byte(0x11);

/// Base token address that sorts after [`QUOTE_ADDRESS`] (base is token1).
pub const BASE_ADDRESS_HIGH: Address = Address::repeat_byte(0x33);

/// A chain pricing an 18-decimal base token in a 6-decimal quote token.
pub fn chain(name: &str, base_is_token0: bool) -> ChainConfig {
    let base_address = if base_is_token0 {
        BASE_ADDRESS_LOW
    } else {
        BASE_ADDRESS_HIGH
    };
    ChainConfig {
        name: name.to_string(),
        chain_id: 1,
        rpc_url: "http://localhost:8545".into(),
        pool_id: B256::repeat_byte(0xaa),
        state_view: Address::repeat_byte(0x44),
        base_token: TokenConfig {
            address: base_address,
            decimals: 18,
            symbol: Some("ETH".into()),
        },
        quote_token: TokenConfig {
            address: QUOTE_ADDRESS,
            decimals: 6,
            symbol: Some("USDC".into()),
        },
    }
}

/// A balance entry for `symbol` with token id `tok-<symbol>`.
pub fn balance(symbol: &str, amount: Decimal) -> WalletBalance {
    WalletBalance {
        token: TokenDescriptor {
            id: TokenId::new(format!("tok-{symbol}")),
            blockchain: "ARC-TESTNET".into(),
            symbol: symbol.to_string(),
            decimals: 6,
        },
        amount,
    }
}

/// A session result with the given status and profit.
pub fn session(id: &str, status: SessionStatus, net_profit: Decimal) -> SessionResult {
    SessionResult {
        session_id: SessionId::from(id),
        chain_a: "chain-a".into(),
        chain_b: "chain-b".into(),
        net_profit,
        status,
        timestamp: Utc::now(),
    }
}
