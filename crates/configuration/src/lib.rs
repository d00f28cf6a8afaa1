use crate::settings::RawSettings;
use chrono::Duration;
use tracing_subscriber::EnvFilter;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{DEFAULT_MAX_TRADE_HISTORY, DEFAULT_TRADE_WINDOW_MINUTES, MarketSettings};

/// Loads the market settings from the process environment.
///
/// Reads `TRADE_TIME_WINDOW_MINUTES` and `MAX_TRADE_HISTORY`, falling back to
/// 5 minutes and 10,000 trades when a variable is unset.
pub fn load_settings() -> Result<MarketSettings, ConfigError> {
    build_settings(config::Environment::default().try_parsing(true))
}

/// Same as [`load_settings`], but reads from an explicit set of variables
/// instead of the process environment.
pub fn load_settings_from<I, K, V>(vars: I) -> Result<MarketSettings, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let source: config::Map<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    build_settings(
        config::Environment::default()
            .source(Some(source))
            .try_parsing(true),
    )
}

fn build_settings(environment: config::Environment) -> Result<MarketSettings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("trade_time_window_minutes", DEFAULT_TRADE_WINDOW_MINUTES)?
        .set_default("max_trade_history", DEFAULT_MAX_TRADE_HISTORY as i64)?
        .add_source(environment)
        .build()?;

    let raw = builder.try_deserialize::<RawSettings>()?;
    let settings = validate(raw)?;
    tracing::debug!(
        trade_window_minutes = settings.trade_window.num_minutes(),
        max_trade_history = settings.max_trade_history,
        "Loaded market settings"
    );
    Ok(settings)
}

fn validate(raw: RawSettings) -> Result<MarketSettings, ConfigError> {
    if raw.trade_time_window_minutes <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "TRADE_TIME_WINDOW_MINUTES must be positive, got {}",
            raw.trade_time_window_minutes
        )));
    }
    if raw.max_trade_history <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "MAX_TRADE_HISTORY must be positive, got {}",
            raw.max_trade_history
        )));
    }

    let trade_window = Duration::try_minutes(raw.trade_time_window_minutes).ok_or_else(|| {
        ConfigError::ValidationError(format!(
            "TRADE_TIME_WINDOW_MINUTES is out of range: {}",
            raw.trade_time_window_minutes
        ))
    })?;
    let max_trade_history = usize::try_from(raw.max_trade_history).map_err(|_| {
        ConfigError::ValidationError(format!(
            "MAX_TRADE_HISTORY is out of range: {}",
            raw.max_trade_history
        ))
    })?;

    Ok(MarketSettings {
        trade_window,
        max_trade_history,
    })
}

/// Installs the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_settings_from(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(settings, MarketSettings::default());
        assert_eq!(settings.trade_window, Duration::minutes(5));
        assert_eq!(settings.max_trade_history, 10_000);
    }

    #[test]
    fn reads_both_variables() {
        let settings = load_settings_from([
            ("TRADE_TIME_WINDOW_MINUTES", "15"),
            ("MAX_TRADE_HISTORY", "250"),
        ])
        .unwrap();
        assert_eq!(settings.trade_window, Duration::minutes(15));
        assert_eq!(settings.max_trade_history, 250);
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let settings = load_settings_from([("HOME", "/root"), ("MAX_TRADE_HISTORY", "3")]).unwrap();
        assert_eq!(settings.max_trade_history, 3);
        assert_eq!(settings.trade_window, Duration::minutes(5));
    }

    #[test]
    fn rejects_non_positive_window() {
        let err = load_settings_from([("TRADE_TIME_WINDOW_MINUTES", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_non_positive_history() {
        let err = load_settings_from([("MAX_TRADE_HISTORY", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = load_settings_from([("MAX_TRADE_HISTORY", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
