use crate::value_objects::{Side, deserialize_optional_side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Execution print as published on the executions channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_side")]
    pub side: Option<Side>,
    pub price: Decimal,
    pub size: Decimal,
    pub exec_date: String,
    #[serde(default)]
    pub buy_child_order_acceptance_id: String,
    #[serde(default)]
    pub sell_child_order_acceptance_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_execution_list() {
        let json = r#"[
            {
                "id": 39287,
                "side": "BUY",
                "price": 31690,
                "size": 27.04,
                "exec_date": "2015-07-08T02:43:34.823Z",
                "buy_child_order_acceptance_id": "JRF20150707-200203-452209",
                "sell_child_order_acceptance_id": "JRF20150708-024334-060234"
            },
            {
                "id": 39288,
                "side": "",
                "price": 31691,
                "size": 0.01,
                "exec_date": "2015-07-08T02:43:35.1Z",
                "buy_child_order_acceptance_id": "JRF20150708-024334-060235",
                "sell_child_order_acceptance_id": "JRF20150708-024334-060236"
            }
        ]"#;

        let events: Vec<ExecutionEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].side, Some(Side::Buy));
        assert_eq!(events[0].size, dec!(27.04));
        assert_eq!(events[1].side, None);
    }
}
