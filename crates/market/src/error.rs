use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Security {0} already exists")]
    DuplicateSymbol(String),
}
