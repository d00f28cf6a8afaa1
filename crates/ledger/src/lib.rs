//! # Security Ledger
//!
//! Owns one security's static terms together with a bounded, time-ordered
//! trade history, and derives the per-security metrics from them:
//! dividend yield, P/E ratio and the volume-weighted trade price.
//!
//! ## Public API
//!
//! - `Security`: validated terms plus the guarded trade history.
//! - `LedgerError`: the domain errors returned by construction, recording and calculations.

pub mod error;
pub mod security;

pub use error::LedgerError;
pub use security::Security;
