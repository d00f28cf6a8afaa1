use crate::error::LedgerError;
use chrono::{DateTime, Duration, Utc};
use configuration::{DEFAULT_MAX_TRADE_HISTORY, MarketSettings};
use core_types::{SecurityClass, Trade, TradeSide};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// The subset of a trade needed for the volume-weighted price, copied out under the lock.
#[derive(Debug, Clone, Copy)]
struct TradePoint {
    timestamp: DateTime<Utc>,
    quantity: u64,
    price: f64,
}

/// A tradable security: fixed terms plus a running trade history.
///
/// The terms are validated once at construction and never change. The trade
/// history is capped at `max_trade_history` entries; once full, recording a
/// trade silently evicts the oldest one.
#[derive(Debug)]
pub struct Security {
    symbol: String,
    class: SecurityClass,
    last_dividend: f64,
    fixed_dividend: Option<f64>,
    par_value: f64,
    max_trade_history: usize,
    trades: Mutex<VecDeque<Trade>>,
}

impl Security {
    /// Creates a new `Security` after validating its terms.
    ///
    /// A `Preferred` security must carry a `fixed_dividend` in `[0, 1]`; a
    /// `Common` security must not carry one.
    pub fn new(
        symbol: impl Into<String>,
        class: SecurityClass,
        last_dividend: f64,
        fixed_dividend: Option<f64>,
        par_value: f64,
    ) -> Result<Self, LedgerError> {
        let symbol = symbol.into();

        if symbol.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Symbol should not be empty".to_string(),
            ));
        }
        if !last_dividend.is_finite() || last_dividend < 0.0 {
            return Err(LedgerError::Validation(format!(
                "Last dividend should be a non-negative number, got {}",
                last_dividend
            )));
        }
        if !par_value.is_finite() || par_value <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "Par value should be positive, got {}",
                par_value
            )));
        }
        match (class, fixed_dividend) {
            (SecurityClass::Common, Some(_)) => {
                return Err(LedgerError::Validation(
                    "Common stock should not have a fixed dividend".to_string(),
                ));
            }
            (SecurityClass::Preferred, None) => {
                return Err(LedgerError::Validation(
                    "Preferred stock should have a fixed dividend".to_string(),
                ));
            }
            _ => {}
        }
        if let Some(rate) = fixed_dividend {
            if !(0.0..=1.0).contains(&rate) {
                return Err(LedgerError::Validation(format!(
                    "Fixed dividend must be between 0 and 1, got {}",
                    rate
                )));
            }
        }

        Ok(Self {
            symbol,
            class,
            last_dividend,
            fixed_dividend,
            par_value,
            max_trade_history: DEFAULT_MAX_TRADE_HISTORY,
            trades: Mutex::new(VecDeque::new()),
        })
    }

    /// Like [`Security::new`], but takes the class by name ("Common" or "Preferred").
    pub fn from_class_name(
        symbol: impl Into<String>,
        class: &str,
        last_dividend: f64,
        fixed_dividend: Option<f64>,
        par_value: f64,
    ) -> Result<Self, LedgerError> {
        let class = class
            .parse::<SecurityClass>()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        Self::new(symbol, class, last_dividend, fixed_dividend, par_value)
    }

    /// Like [`Security::new`], with the trade history capacity taken from `settings`.
    pub fn with_settings(
        symbol: impl Into<String>,
        class: SecurityClass,
        last_dividend: f64,
        fixed_dividend: Option<f64>,
        par_value: f64,
        settings: &MarketSettings,
    ) -> Result<Self, LedgerError> {
        Ok(Self::new(symbol, class, last_dividend, fixed_dividend, par_value)?
            .with_max_trade_history(settings.max_trade_history))
    }

    /// Sets how many trades are retained. A capacity of zero is treated as one.
    pub fn with_max_trade_history(mut self, max_trade_history: usize) -> Self {
        self.max_trade_history = max_trade_history.max(1);
        let trades = self.trades.get_mut();
        while trades.len() > self.max_trade_history {
            trades.pop_front();
        }
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn class(&self) -> SecurityClass {
        self.class
    }

    pub fn last_dividend(&self) -> f64 {
        self.last_dividend
    }

    pub fn fixed_dividend(&self) -> Option<f64> {
        self.fixed_dividend
    }

    pub fn par_value(&self) -> f64 {
        self.par_value
    }

    pub fn max_trade_history(&self) -> usize {
        self.max_trade_history
    }

    /// The dividend a P/E ratio is measured against.
    fn dividend_basis(&self) -> f64 {
        match (self.class, self.fixed_dividend) {
            (SecurityClass::Preferred, Some(rate)) => rate * self.par_value,
            _ => self.last_dividend,
        }
    }

    /// Dividend yield at the given price.
    pub fn dividend_yield(&self, price: f64) -> Result<f64, LedgerError> {
        ensure_positive_price(price)?;
        Ok(self.dividend_basis() / price)
    }

    /// Price/earnings ratio at the given price.
    ///
    /// Undefined, and reported as `InvalidDividend`, when the dividend basis is not positive.
    pub fn pe_ratio(&self, price: f64) -> Result<f64, LedgerError> {
        ensure_positive_price(price)?;
        let dividend = self.dividend_basis();
        if dividend <= 0.0 {
            return Err(LedgerError::InvalidDividend(dividend));
        }
        Ok(price / dividend)
    }

    /// Records a trade stamped with the current time.
    pub fn record_trade(&self, quantity: i64, is_buy: bool, price: f64) -> Result<Trade, LedgerError> {
        self.record_trade_at(Utc::now(), quantity, is_buy, price)
    }

    /// Records a trade with an explicit timestamp.
    ///
    /// A rejected trade leaves the history untouched. Timestamps are not
    /// required to be in order; eviction follows insertion order, not timestamp order.
    pub fn record_trade_at(
        &self,
        timestamp: DateTime<Utc>,
        quantity: i64,
        is_buy: bool,
        price: f64,
    ) -> Result<Trade, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidTrade(format!(
                "Trade quantity should be positive, got {}",
                quantity
            )));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(LedgerError::InvalidTrade(format!(
                "Trade price should be positive, got {}",
                price
            )));
        }

        let trade = Trade::new(
            self.symbol.clone(),
            timestamp,
            quantity.unsigned_abs(),
            TradeSide::from_is_buy(is_buy),
            price,
        );

        {
            let mut trades = self.trades.lock();
            while trades.len() >= self.max_trade_history {
                trades.pop_front();
            }
            trades.push_back(trade.clone());
        }

        tracing::info!(
            symbol = %trade.symbol,
            trade_id = %trade.trade_id,
            quantity = trade.quantity,
            side = ?trade.side,
            price = trade.price,
            "Recorded trade"
        );
        Ok(trade)
    }

    /// Number of trades currently retained.
    pub fn trade_count(&self) -> usize {
        self.trades.lock().len()
    }

    /// The most recently recorded trade, if any.
    pub fn last_trade(&self) -> Option<Trade> {
        self.trades.lock().back().cloned()
    }

    /// A copy of the retained trades, oldest first.
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.lock().iter().cloned().collect()
    }

    /// Volume-weighted price of the trades with `timestamp >= now - window`,
    /// or `None` when no trade falls in the window.
    pub fn recent_volume_weighted_price(&self, now: DateTime<Utc>, window: Duration) -> Option<f64> {
        let cutoff = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let snapshot: Vec<TradePoint> = self
            .trades
            .lock()
            .iter()
            .map(|t| TradePoint {
                timestamp: t.timestamp,
                quantity: t.quantity,
                price: t.price,
            })
            .collect();

        // Running weighted mean; every step stays between the previous mean and p.
        let (mean, total_quantity, count) = snapshot
            .iter()
            .filter(|p| p.timestamp >= cutoff)
            .fold((0.0_f64, 0.0_f64, 0_usize), |(mean, qty, n), p| {
                let quantity = p.quantity as f64;
                let total = qty + quantity;
                (mean + (p.price - mean) * (quantity / total), total, n + 1)
            });

        tracing::debug!(
            symbol = %self.symbol,
            retained = snapshot.len(),
            in_window = count,
            total_quantity,
            mean,
            "Volume-weighted price snapshot"
        );

        if count == 0 {
            return None;
        }
        Some(mean)
    }

    /// Volume-weighted price over the trailing window ending at `now`.
    ///
    /// Returns `0.0` when there are no trades in the window; this is a
    /// "no data" marker, not a price, and is accompanied by a warning event.
    pub fn volume_weighted_price(&self, now: DateTime<Utc>, window: Duration) -> f64 {
        match self.recent_volume_weighted_price(now, window) {
            Some(price) => price,
            None => {
                tracing::warn!(
                    symbol = %self.symbol,
                    window_minutes = window.num_minutes(),
                    "No trades in the trailing window"
                );
                0.0
            }
        }
    }
}

fn ensure_positive_price(price: f64) -> Result<(), LedgerError> {
    if price.is_nan() || price <= 0.0 {
        return Err(LedgerError::InvalidPrice(price));
    }
    Ok(())
}
