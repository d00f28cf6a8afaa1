/// Geometric mean of strictly positive prices, computed as `exp(mean(ln p))`.
///
/// Returns `None` for an empty slice or when the result is not representable
/// as a finite `f64`.
pub fn geometric_mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }

    let sum_logs: f64 = prices.iter().map(|p| p.ln()).sum();
    let mean = (sum_logs / prices.len() as f64).exp();

    if mean.is_finite() { Some(mean) } else { None }
}

/// The All Share Index over a set of volume-weighted prices.
///
/// Prices that are not positive are left out rather than counted as zero.
/// Returns `0.0` when nothing is left or when the mean overflows; both cases
/// are logged at error level.
pub fn all_share_index(prices: impl IntoIterator<Item = f64>) -> f64 {
    let valid_prices: Vec<f64> = prices.into_iter().filter(|p| *p > 0.0).collect();

    if valid_prices.is_empty() {
        tracing::error!("Missing valid prices for All Share Index calculation");
        return 0.0;
    }

    match geometric_mean(&valid_prices) {
        Some(index) => index,
        None => {
            tracing::error!(
                priced = valid_prices.len(),
                "Overflow while calculating the geometric mean for the All Share Index"
            );
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn index_skips_non_positive_prices() {
        assert_relative_eq!(all_share_index([0.0, 2.0, -1.0, 8.0]), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn index_without_valid_prices_is_zero() {
        assert_eq!(all_share_index([0.0, 0.0]), 0.0);
        assert_eq!(all_share_index(Vec::new()), 0.0);
    }

    #[test]
    fn index_overflow_is_zero() {
        assert_eq!(all_share_index([10.0, f64::INFINITY]), 0.0);
    }

    #[test]
    fn two_prices() {
        assert_relative_eq!(geometric_mean(&[2.0, 8.0]).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn single_price_is_itself() {
        assert_relative_eq!(geometric_mean(&[100.0]).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn very_large_prices_stay_finite() {
        let mean = geometric_mean(&[1e308, 1e308, 1e300]).unwrap();
        assert!(mean.is_finite());
        assert!(mean > 1e300);
    }

    #[test]
    fn empty_has_no_mean() {
        assert_eq!(geometric_mean(&[]), None);
    }

    #[test]
    fn infinite_price_overflows() {
        assert_eq!(geometric_mean(&[2.0, f64::INFINITY]), None);
    }
}
