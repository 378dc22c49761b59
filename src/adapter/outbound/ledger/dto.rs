//! Programmable-wallet REST payloads.
//!
//! Successful responses wrap their payload in `{"data": ...}`; failures
//! carry `{"code": <int>, "message": "..."}` at the top level.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::id::TokenId;
use crate::domain::wallet::{TokenDescriptor, WalletBalance};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesData {
    #[serde(default)]
    pub token_balances: Vec<TokenBalanceDto>,
}

#[derive(Debug, Deserialize)]
pub struct TokenBalanceDto {
    pub token: TokenDto,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TokenDto {
    pub id: String,
    pub blockchain: String,
    pub symbol: String,
    pub decimals: u8,
}

impl From<TokenBalanceDto> for WalletBalance {
    fn from(dto: TokenBalanceDto) -> Self {
        Self {
            token: TokenDescriptor {
                id: TokenId::new(dto.token.id),
                blockchain: dto.token.blockchain,
                symbol: dto.token.symbol,
                decimals: dto.token.decimals,
            },
            amount: dto.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletData {
    pub wallet: WalletDto,
}

#[derive(Debug, Deserialize)]
pub struct WalletDto {
    pub address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody<'a> {
    pub idempotency_key: &'a str,
    pub wallet_id: &'a str,
    pub token_id: &'a str,
    pub destination_address: &'a str,
    pub amounts: [String; 1],
    pub fee_level: &'a str,
    pub entity_secret_ciphertext: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyData {
    pub public_key: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferData {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionData {
    pub transaction: TransactionDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub state: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn balances_parse_string_amounts() {
        let json = r#"{"data":{"tokenBalances":[
            {"token":{"id":"tok-1","blockchain":"ARC-TESTNET","name":"USD Coin","symbol":"USDC","decimals":6},
             "amount":"10.5","updateDate":"2025-01-01T00:00:00Z"}
        ]}}"#;
        let parsed: Envelope<BalancesData> = serde_json::from_str(json).unwrap();
        let balance: WalletBalance = parsed.data.token_balances.into_iter().next().unwrap().into();
        assert_eq!(balance.token.symbol, "USDC");
        assert_eq!(balance.token.id.as_str(), "tok-1");
        assert_eq!(balance.amount, dec!(10.5));
    }

    #[test]
    fn missing_token_balances_is_empty() {
        let parsed: Envelope<BalancesData> = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(parsed.data.token_balances.is_empty());
    }

    #[test]
    fn transfer_body_uses_wire_names() {
        let body = TransferBody {
            idempotency_key: "k",
            wallet_id: "w",
            token_id: "t",
            destination_address: "0xabc",
            amounts: ["3".into()],
            fee_level: "MEDIUM",
            entity_secret_ciphertext: "c".into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["idempotencyKey"], "k");
        assert_eq!(value["destinationAddress"], "0xabc");
        assert_eq!(value["amounts"][0], "3");
        assert_eq!(value["feeLevel"], "MEDIUM");
        assert_eq!(value["entitySecretCiphertext"], "c");
    }

    #[test]
    fn public_key_parses() {
        let json = r#"{"data":{"publicKey":"-----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----\n"}}"#;
        let parsed: Envelope<PublicKeyData> = serde_json::from_str(json).unwrap();
        assert!(parsed.data.public_key.starts_with("-----BEGIN RSA PUBLIC KEY-----"));
    }

    #[test]
    fn transaction_without_hash_parses() {
        let json = r#"{"data":{"transaction":{"id":"tx","state":"PENDING_RISK_SCREENING"}}}"#;
        let parsed: Envelope<TransactionData> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.transaction.state, "PENDING_RISK_SCREENING");
        assert!(parsed.data.transaction.tx_hash.is_none());
    }
}
