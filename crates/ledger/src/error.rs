use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Invalid security terms: {0}")]
    Validation(String),

    #[error("Price should be greater than zero, got {0}")]
    InvalidPrice(f64),

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Dividend should be positive for P/E ratio calculation, got {0}")]
    InvalidDividend(f64),
}
