//! # Market Registry
//!
//! Owns the set of registered securities, keyed by symbol, and computes the
//! market-wide All Share Index as the geometric mean of their volume-weighted prices.
//!
//! The registry lock is independent of each security's trade-history lock and
//! the two are never held together: the index is computed over a snapshot of
//! the registry taken before any security is queried.

pub mod error;
pub mod index;
pub mod registry;

pub use error::MarketError;
pub use index::{all_share_index, geometric_mean};
pub use registry::Market;
