//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt against one candidate:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → classify.rs (success / auth / transient)
//!     → transient: fetcher moves on to the next candidate
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No internal retries: each candidate is tried at most once
//! - Auth failures short-circuit the candidate list

pub mod classify;
pub mod timeouts;
