//! Wallet use cases built on the resilient fetcher.

pub mod client;
pub mod types;

pub use client::{WalletClient, VIRTUAL_ACCOUNT_CACHE_KEY};
pub use types::{Balance, VirtualAccount, WalletError};
