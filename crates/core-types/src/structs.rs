use crate::enums::TradeSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single executed trade in one security.
///
/// Trades are created once by the ledger that records them and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: Uuid,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub quantity: u64,
    pub side: TradeSide,
    pub price: f64,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        quantity: u64,
        side: TradeSide,
        price: f64,
    ) -> Self {
        Self {
            trade_id: Uuid::new_v4(),
            symbol: symbol.into(),
            timestamp,
            quantity,
            side,
            price,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.side.is_buy()
    }
}
