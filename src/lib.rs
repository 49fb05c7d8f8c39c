//! Resilient remote-data fetching for wallet clients.
//!
//! One logical request is tried against an ordered list of endpoint
//! candidates with a per-attempt timeout. The first 2xx wins, a 401/403 stops
//! immediately, everything else falls through to the next candidate.
//! Requests are cancellable at any point, and selected results are cached
//! with a TTL and a category tag.
//!
//! ```text
//!   caller ──▶ WalletClient ──▶ ResponseCache ──(miss)──▶ ResilientFetcher
//!                                    │                        │
//!                                 KvStore            candidate 0 → 1 → … n
//!                                                  (timeout, classify, envelope)
//! ```

pub mod cache;
pub mod config;
pub mod fetch;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod wallet;

pub use cache::ResponseCache;
pub use config::FetcherConfig;
pub use fetch::{
    EndpointCandidates, FetchError, RequestOutcome, RequestSpec, ResilientFetcher, Settlement,
};
pub use lifecycle::TeardownScope;
pub use wallet::WalletClient;
