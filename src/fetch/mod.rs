//! Resilient fetch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestSpec + EndpointCandidates + auth token + CancellationToken
//!     → fetcher.rs (candidate loop, one attempt at a time)
//!         → resilience::timeouts (per-attempt deadline)
//!         → transport.rs (reqwest, or any Transport impl)
//!         → resilience::classify (success / auth / transient)
//!         → envelope.rs (body → canonical payload / message)
//!     → Settlement (Completed(RequestOutcome) | Cancelled)
//! ```

pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod transport;
pub mod types;

pub use error::{FetchError, FetchResult};
pub use fetcher::{CacheSlot, ResilientFetcher};
pub use transport::{OutboundRequest, RawResponse, ReqwestTransport, Transport, TransportError};
pub use types::{
    AttemptError, AttemptErrorKind, EndpointCandidates, Method, RequestOutcome, RequestSpec,
    Settlement,
};
