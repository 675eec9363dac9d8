use crate::events::TickerEvent;
use crate::value_objects::{ExchangeTime, ProductCode, TimestampError};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub product_code: ProductCode,
    pub timestamp: DateTime<FixedOffset>,
    pub tick_id: i64,
    pub best_bid: Decimal,
    pub best_ask: Decimal,
    pub best_bid_size: Decimal,
    pub best_ask_size: Decimal,
    pub total_bid_depth: Decimal,
    pub total_ask_depth: Decimal,
    pub ltp: Decimal,
    pub volume: Decimal,
    pub volume_by_product: Decimal,
}

impl Ticker {
    pub fn from_event(event: TickerEvent, time: &ExchangeTime) -> Result<Self, TimestampError> {
        Ok(Ticker {
            product_code: ProductCode::new(event.product_code),
            timestamp: time.parse(&event.timestamp)?,
            tick_id: event.tick_id,
            best_bid: event.best_bid,
            best_ask: event.best_ask,
            best_bid_size: event.best_bid_size,
            best_ask_size: event.best_ask_size,
            total_bid_depth: event.total_bid_depth,
            total_ask_depth: event.total_ask_depth,
            ltp: event.ltp,
            volume: event.volume,
            volume_by_product: event.volume_by_product,
        })
    }

    pub fn spread(&self) -> Decimal {
        self.best_ask - self.best_bid
    }

    pub fn mid_price(&self) -> Decimal {
        (self.best_bid + self.best_ask) / Decimal::TWO
    }
}
