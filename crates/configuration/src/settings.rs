use chrono::Duration;
use serde::Deserialize;

pub const DEFAULT_TRADE_WINDOW_MINUTES: i64 = 5;
pub const DEFAULT_MAX_TRADE_HISTORY: usize = 10_000;

/// Runtime parameters injected into the ledger and market calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSettings {
    /// Trailing window used for the volume-weighted price.
    pub trade_window: Duration,
    /// Maximum number of trades retained per security. Oldest trades are evicted first.
    pub max_trade_history: usize,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            trade_window: Duration::minutes(DEFAULT_TRADE_WINDOW_MINUTES),
            max_trade_history: DEFAULT_MAX_TRADE_HISTORY,
        }
    }
}

/// The settings exactly as they appear in the environment, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSettings {
    pub trade_time_window_minutes: i64,
    pub max_trade_history: i64,
}
