//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Teardown (teardown.rs):
//!     View created → scope issues a token per request
//!     View torn down → scope dropped → every token cancelled
//!
//! Signals (signals.rs):
//!     SIGINT → cancel the CLI's in-flight request
//! ```

pub mod signals;
pub mod teardown;

pub use teardown::TeardownScope;
