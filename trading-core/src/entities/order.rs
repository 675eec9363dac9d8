use crate::value_objects::{ChildOrderType, ProductCode, Side, TimeInForce};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/me/sendchildorder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOrderRequest {
    pub product_code: ProductCode,
    pub child_order_type: ChildOrderType,
    pub side: Side,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute_to_expire: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}

impl ChildOrderRequest {
    pub fn limit(product_code: ProductCode, side: Side, price: Decimal, size: Decimal) -> Self {
        ChildOrderRequest {
            product_code,
            child_order_type: ChildOrderType::Limit,
            side,
            price,
            size,
            minute_to_expire: None,
            time_in_force: None,
        }
    }

    /// Market orders carry no price
    pub fn market(product_code: ProductCode, side: Side, size: Decimal) -> Self {
        ChildOrderRequest {
            product_code,
            child_order_type: ChildOrderType::Market,
            side,
            price: Decimal::ZERO,
            size,
            minute_to_expire: None,
            time_in_force: None,
        }
    }

    pub fn with_minute_to_expire(mut self, minutes: u32) -> Self {
        self.minute_to_expire = Some(minutes);
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }
}

/// Body of `POST /v1/me/cancelchildorder`. Exactly one id should be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelChildOrderRequest {
    pub product_code: ProductCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_order_acceptance_id: Option<String>,
}

impl CancelChildOrderRequest {
    pub fn by_order_id(product_code: ProductCode, child_order_id: impl Into<String>) -> Self {
        CancelChildOrderRequest {
            product_code,
            child_order_id: Some(child_order_id.into()),
            child_order_acceptance_id: None,
        }
    }

    pub fn by_acceptance_id(product_code: ProductCode, acceptance_id: impl Into<String>) -> Self {
        CancelChildOrderRequest {
            product_code,
            child_order_id: None,
            child_order_acceptance_id: Some(acceptance_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildOrderAcceptance {
    pub child_order_acceptance_id: String,
}

/// Entry of `GET /v1/me/getchildorders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOrder {
    pub id: i64,
    pub child_order_id: String,
    pub product_code: ProductCode,
    pub side: Side,
    pub child_order_type: ChildOrderType,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub average_price: Decimal,
    pub size: Decimal,
    pub child_order_state: String,
    #[serde(default)]
    pub expire_date: String,
    pub child_order_date: String,
    pub child_order_acceptance_id: String,
    #[serde(default)]
    pub outstanding_size: Decimal,
    #[serde(default)]
    pub cancel_size: Decimal,
    #[serde(default)]
    pub executed_size: Decimal,
    #[serde(default)]
    pub total_commission: Decimal,
}

impl ChildOrder {
    pub fn is_active(&self) -> bool {
        self.child_order_state == "ACTIVE"
    }
}

/// Entry of `GET /v1/me/getpositions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub product_code: ProductCode,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub commission: Decimal,
    #[serde(default)]
    pub swap_point_accumulate: Decimal,
    #[serde(default)]
    pub require_collateral: Decimal,
    #[serde(default)]
    pub open_date: String,
    #[serde(default)]
    pub leverage: Decimal,
    #[serde(default)]
    pub pnl: Decimal,
    #[serde(default)]
    pub sfd: Decimal,
}

impl Position {
    /// Size signed by side: long positive, short negative
    pub fn signed_size(&self) -> Decimal {
        match self.side {
            Side::Buy => self.size,
            Side::Sell => -self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limit_order_serializes_numbers() {
        let req =
            ChildOrderRequest::limit(ProductCode::fx_btc_jpy(), Side::Buy, dec!(30000), dec!(0.1))
                .with_minute_to_expire(10000)
                .with_time_in_force(TimeInForce::GTC);
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();

        assert_eq!(json["product_code"], "FX_BTC_JPY");
        assert_eq!(json["child_order_type"], "LIMIT");
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["price"], serde_json::json!(30000.0));
        assert_eq!(json["size"], serde_json::json!(0.1));
        assert_eq!(json["minute_to_expire"], 10000);
        assert_eq!(json["time_in_force"], "GTC");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let req = ChildOrderRequest::market(ProductCode::fx_btc_jpy(), Side::Sell, dec!(0.01));
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert!(json.get("minute_to_expire").is_none());
        assert!(json.get("time_in_force").is_none());

        let cancel = CancelChildOrderRequest::by_acceptance_id(ProductCode::fx_btc_jpy(), "JRF-1");
        let json = serde_json::to_value(&cancel).unwrap();
        assert!(json.get("child_order_id").is_none());
        assert_eq!(json["child_order_acceptance_id"], "JRF-1");
    }

    #[test]
    fn test_position_signed_size() {
        let json = r#"{"product_code":"FX_BTC_JPY","side":"SELL","price":36000,"size":0.5,
            "commission":0,"swap_point_accumulate":-35,"require_collateral":120000,
            "open_date":"2015-11-03T10:04:45.011","leverage":3,"pnl":965,"sfd":-0.5}"#;
        let pos: Position = serde_json::from_str(json).unwrap();
        assert_eq!(pos.signed_size(), dec!(-0.5));
    }
}
