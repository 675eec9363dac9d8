use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument identifier on the exchange (e.g. `FX_BTC_JPY`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    pub fn new(code: impl Into<String>) -> Self {
        ProductCode(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Well-known products
impl ProductCode {
    pub fn fx_btc_jpy() -> Self {
        ProductCode::new("FX_BTC_JPY")
    }

    pub fn btc_jpy() -> Self {
        ProductCode::new("BTC_JPY")
    }
}

impl Default for ProductCode {
    fn default() -> Self {
        ProductCode::fx_btc_jpy()
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductCode {
    fn from(s: &str) -> Self {
        ProductCode::new(s)
    }
}

impl From<String> for ProductCode {
    fn from(s: String) -> Self {
        ProductCode::new(s)
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}
