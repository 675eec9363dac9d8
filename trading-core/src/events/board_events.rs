use crate::entities::PriceLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Board snapshot or diff as published on the board channels.
///
/// Both channels share this shape; a snapshot is simply a diff that names
/// every resting level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardUpdateEvent {
    #[serde(default)]
    pub mid_price: Decimal,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
}

impl BoardUpdateEvent {
    pub fn new(mid_price: Decimal, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        BoardUpdateEvent {
            mid_price,
            bids,
            asks,
        }
    }

    /// Number of levels named by this update
    pub fn level_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_numeric_levels() {
        let json = r#"{
            "mid_price": 35625,
            "bids": [{"price": 30000.0, "size": 0.1}, {"price": 25000, "size": 0}],
            "asks": [{"price": 36640.5, "size": 5}]
        }"#;

        let event: BoardUpdateEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.mid_price, dec!(35625));
        assert_eq!(event.bids[0], PriceLevel::new(dec!(30000), dec!(0.1)));
        assert!(event.bids[1].is_removal());
        assert_eq!(event.asks[0].price, dec!(36640.5));
        assert_eq!(event.level_count(), 3);
    }

    #[test]
    fn test_missing_sides_default_to_empty() {
        let event: BoardUpdateEvent = serde_json::from_str(r#"{"mid_price": 100}"#).unwrap();
        assert!(event.bids.is_empty());
        assert!(event.asks.is_empty());
    }
}
