use crate::error::MarketError;
use crate::index::all_share_index;
use chrono::{DateTime, Duration, Utc};
use ledger::Security;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// All securities traded on the exchange, keyed by symbol.
///
/// Securities can be registered but never removed.
#[derive(Debug, Default)]
pub struct Market {
    securities: Mutex<HashMap<String, Arc<Security>>>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a security and returns a shared handle to it.
    ///
    /// Fails with `DuplicateSymbol` if the symbol is taken, leaving the
    /// existing entry in place.
    pub fn add_security(&self, security: Security) -> Result<Arc<Security>, MarketError> {
        let symbol = security.symbol().to_string();
        let class = security.class();

        let handle = {
            let mut securities = self.securities.lock();
            match securities.entry(symbol.clone()) {
                Entry::Occupied(_) => return Err(MarketError::DuplicateSymbol(symbol)),
                Entry::Vacant(slot) => Arc::clone(slot.insert(Arc::new(security))),
            }
        };

        tracing::info!(symbol = %symbol, class = %class, "Added security");
        Ok(handle)
    }

    pub fn get_security(&self, symbol: &str) -> Option<Arc<Security>> {
        self.securities.lock().get(symbol).cloned()
    }

    /// Registered symbols in ascending order.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.securities.lock().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.securities.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.lock().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<Security>> {
        self.securities.lock().values().cloned().collect()
    }

    /// Volume-weighted price of every registered security, sorted by symbol.
    ///
    /// Securities without trades in the window report `0.0`.
    pub fn security_vwaps(&self, now: DateTime<Utc>, window: Duration) -> Vec<(String, f64)> {
        let mut vwaps: Vec<(String, f64)> = self
            .snapshot()
            .iter()
            .map(|s| (s.symbol().to_string(), s.volume_weighted_price(now, window)))
            .collect();
        vwaps.sort_by(|a, b| a.0.cmp(&b.0));
        vwaps
    }

    /// The All Share Index: geometric mean of the volume-weighted prices of
    /// all securities with recent trades.
    ///
    /// Securities without recent trades are left out; see [`crate::index::all_share_index`].
    pub fn all_share_index(&self, now: DateTime<Utc>, window: Duration) -> f64 {
        let securities = self.snapshot();
        tracing::debug!(registered = securities.len(), "All Share Index inputs");
        all_share_index(securities.iter().map(|s| s.volume_weighted_price(now, window)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::SecurityClass;
    use std::thread;

    fn common(symbol: &str) -> Security {
        Security::new(symbol, SecurityClass::Common, 0.0, None, 100.0).unwrap()
    }

    #[test]
    fn added_security_can_be_looked_up() {
        let market = Market::new();
        let added = market.add_security(common("TEA")).unwrap();

        let found = market.get_security("TEA").unwrap();
        assert!(Arc::ptr_eq(&added, &found));
        assert_eq!(market.len(), 1);
    }

    #[test]
    fn duplicate_symbol_keeps_the_original() {
        let market = Market::new();
        let original = market.add_security(common("TEA")).unwrap();
        let replacement = Security::new("TEA", SecurityClass::Common, 23.0, None, 60.0).unwrap();

        let err = market.add_security(replacement).unwrap_err();
        assert_eq!(err, MarketError::DuplicateSymbol("TEA".to_string()));

        let kept = market.get_security("TEA").unwrap();
        assert!(Arc::ptr_eq(&original, &kept));
        assert_eq!(kept.last_dividend(), 0.0);
        assert_eq!(market.len(), 1);
    }

    #[test]
    fn unknown_symbol_is_none() {
        let market = Market::new();
        assert!(market.is_empty());
        assert!(market.get_security("INVALID").is_none());
    }

    #[test]
    fn symbols_are_sorted() {
        let market = Market::new();
        for symbol in ["POP", "ALE", "TEA"] {
            market.add_security(common(symbol)).unwrap();
        }
        assert_eq!(market.symbols(), vec!["ALE", "POP", "TEA"]);
    }

    #[test]
    fn concurrent_registration_of_one_symbol_has_one_winner() {
        let market = Market::new();
        let winners: usize = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| market.add_security(common("GIN")).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(winners, 1);
        assert_eq!(market.len(), 1);
    }
}
