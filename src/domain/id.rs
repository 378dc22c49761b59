//! String identifiers passed between the watcher, the settlement pipeline
//! and the wallet ledger.
//!
//! Each is an opaque newtype: constructed from any string, compared by
//! value, serialized as the bare string.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id! {
    /// Off-chain arbitrage session. Seeds the settlement idempotency key.
    SessionId
}

string_id! {
    /// Custodial wallet on the ledger.
    WalletId
}

string_id! {
    /// Ledger-side token identifier, not an on-chain address.
    TokenId
}

string_id! {
    /// Ledger transaction returned when a transfer is initiated.
    TransactionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_displays_inner_value() {
        let id = SessionId::from("session-7");
        assert_eq!(id.to_string(), "session-7");
        assert_eq!(id.as_str(), "session-7");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = WalletId::new("wallet-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"wallet-1\"");

        let back: TransactionId = serde_json::from_str("\"tx-9\"").unwrap();
        assert_eq!(back, TransactionId::from("tx-9"));
    }

    #[test]
    fn owned_and_borrowed_construction_agree() {
        assert_eq!(TokenId::from(String::from("usdc")), TokenId::new("usdc"));
        assert_eq!(SessionId::from("s-1").as_str(), "s-1");
    }
}
