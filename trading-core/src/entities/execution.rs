use crate::events::ExecutionEvent;
use crate::value_objects::{ExchangeTime, Side, TimestampError};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An execution print with its parsed timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub side: Option<Side>,
    pub price: Decimal,
    pub size: Decimal,
    /// Raw timestamp as received
    pub exec_date: String,
    pub timestamp: DateTime<FixedOffset>,
    pub buy_child_order_acceptance_id: String,
    pub sell_child_order_acceptance_id: String,
}

impl Execution {
    pub fn from_event(event: ExecutionEvent, time: &ExchangeTime) -> Result<Self, TimestampError> {
        let timestamp = time.parse(&event.exec_date)?;
        Ok(Execution {
            id: event.id,
            side: event.side,
            price: event.price,
            size: event.size,
            exec_date: event.exec_date,
            timestamp,
            buy_child_order_acceptance_id: event.buy_child_order_acceptance_id,
            sell_child_order_acceptance_id: event.sell_child_order_acceptance_id,
        })
    }
}
