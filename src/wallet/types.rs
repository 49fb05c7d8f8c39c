//! Wallet API types.
//!
//! Gateways name the same fields differently; every alias is resolved here
//! into one shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cache::StoreError;
use crate::fetch::envelope::first_string;
use crate::fetch::FetchError;

/// Errors from wallet use cases.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cache store error: {0}")]
    Store(#[from] StoreError),

    /// Payload lacked a required field under every known alias.
    #[error("response is missing field '{0}'")]
    MissingField(&'static str),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

const ACCOUNT_CONTAINERS: &[&str] = &["/virtual_account", "/virtualAccount", "/account"];
const ACCOUNT_NUMBER: &[&str] = &["/account_number", "/accountNumber", "/account_no", "/nuban"];
const BANK_NAME: &[&str] = &["/bank_name", "/bankName", "/bank", "/bank/name"];
const ACCOUNT_NAME: &[&str] = &["/account_name", "/accountName"];

const BALANCE: &[&str] = &["/balance", "/available_balance", "/availableBalance", "/amount"];
const CURRENCY: &[&str] = &["/currency", "/currency_code", "/currencyCode"];

const TRANSACTION_LISTS: &[&str] = &["transactions", "items", "results"];

/// Dedicated bank account that funds the wallet through a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualAccount {
    pub account_number: String,
    pub bank_name: String,
    pub account_name: Option<String>,
    /// Gateway that provisioned the account.
    pub gateway: String,
}

impl VirtualAccount {
    pub fn from_payload(payload: &Value, gateway: &str) -> Result<Self, WalletError> {
        let account = ACCOUNT_CONTAINERS
            .iter()
            .find_map(|p| payload.pointer(p).filter(|v| v.is_object()))
            .unwrap_or(payload);

        Ok(Self {
            account_number: first_string(account, ACCOUNT_NUMBER)
                .ok_or(WalletError::MissingField("account_number"))?,
            bank_name: first_string(account, BANK_NAME)
                .ok_or(WalletError::MissingField("bank_name"))?,
            account_name: first_string(account, ACCOUNT_NAME),
            gateway: gateway.to_string(),
        })
    }
}

/// Wallet balance. The amount is kept as the decimal text the API sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: String,
    pub currency: Option<String>,
}

impl Balance {
    pub fn from_payload(payload: &Value) -> Result<Self, WalletError> {
        let source = payload.pointer("/wallet").filter(|v| v.is_object()).unwrap_or(payload);
        Ok(Self {
            amount: first_string(source, BALANCE).ok_or(WalletError::MissingField("balance"))?,
            currency: first_string(source, CURRENCY),
        })
    }
}

/// Transaction list from either a bare array or a wrapping object.
pub fn transactions_from_payload(payload: Value) -> Result<Vec<Value>, WalletError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => TRANSACTION_LISTS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| WalletError::UnexpectedShape("expected a transaction list".to_string())),
        other => Err(WalletError::UnexpectedShape(format!("expected a list, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_virtual_account_aliases() {
        let snake = json!({"account_number": "0123456789", "bank_name": "Wema", "account_name": "Ada"});
        let camel = json!({"virtualAccount": {"accountNumber": 123456789, "bank": {"name": "Wema"}}});

        let a = VirtualAccount::from_payload(&snake, "paystack").unwrap();
        assert_eq!(a.account_number, "0123456789");
        assert_eq!(a.bank_name, "Wema");
        assert_eq!(a.account_name.as_deref(), Some("Ada"));
        assert_eq!(a.gateway, "paystack");

        let b = VirtualAccount::from_payload(&camel, "flutterwave").unwrap();
        assert_eq!(b.account_number, "123456789");
        assert_eq!(b.bank_name, "Wema");
        assert!(b.account_name.is_none());
    }

    #[test]
    fn test_virtual_account_missing_number() {
        let err = VirtualAccount::from_payload(&json!({"bank_name": "Wema"}), "g").unwrap_err();
        assert!(matches!(err, WalletError::MissingField("account_number")));
    }

    #[test]
    fn test_balance_aliases() {
        let b = Balance::from_payload(&json!({"availableBalance": 1250.5, "currency": "NGN"})).unwrap();
        assert_eq!(b.amount, "1250.5");
        assert_eq!(b.currency.as_deref(), Some("NGN"));

        let nested = Balance::from_payload(&json!({"wallet": {"balance": "10.00"}})).unwrap();
        assert_eq!(nested.amount, "10.00");
        assert!(nested.currency.is_none());
    }

    #[test]
    fn test_transaction_shapes() {
        assert_eq!(transactions_from_payload(json!([{"id": 1}])).unwrap().len(), 1);
        assert_eq!(
            transactions_from_payload(json!({"items": [{"id": 1}, {"id": 2}]})).unwrap().len(),
            2
        );
        assert!(transactions_from_payload(json!({"total": 0})).is_err());
    }
}
