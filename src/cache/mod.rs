//! Response caching subsystem.
//!
//! # Data Flow
//! ```text
//! get_or_fetch(key, category, fetch, force_refresh)
//!     → response.rs (purge / lookup / validate)
//!         → store.rs (KvStore: memory or JSON file)
//!         → entry.rs ({payload, tag, timestamp}, TTL + tag check)
//!     → hit: payload
//!     → miss: fetch → store on success
//! ```

pub mod clock;
pub mod entry;
pub mod response;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use response::ResponseCache;
pub use store::{FileStore, KvStore, MemoryStore, StoreError};
