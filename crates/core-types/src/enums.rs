use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy { TradeSide::Buy } else { TradeSide::Sell }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, TradeSide::Buy)
    }
}

/// The dividend policy of a security.
///
/// `Common` pays the last declared dividend; `Preferred` pays a fixed rate
/// of its par value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityClass {
    Common,
    Preferred,
}

impl fmt::Display for SecurityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityClass::Common => write!(f, "Common"),
            SecurityClass::Preferred => write!(f, "Preferred"),
        }
    }
}

impl FromStr for SecurityClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(SecurityClass::Common),
            "preferred" => Ok(SecurityClass::Preferred),
            other => Err(CoreError::InvalidInput(
                "class".to_string(),
                format!("unknown security class '{}'", other),
            )),
        }
    }
}
