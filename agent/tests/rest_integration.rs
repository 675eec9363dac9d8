//! REST client integration tests against a mock HTTP server

use chrono::{TimeZone, Utc};
use lightning_agent::gateway_in::{
    Credentials, Gateway, GatewayConfig, OrderSender, PrivateClient, RestError, TickerFetcher,
};
use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use std::sync::Arc;
use trading_core::{
    CancelChildOrderRequest, ChildOrderRequest, ChildOrderType, ManualClock, ProductCode, Side,
};

const TICKER_BODY: &str = r#"{
    "product_code": "FX_BTC_JPY",
    "timestamp": "2024-05-01T00:00:00.123",
    "tick_id": 42,
    "best_bid": 9999000,
    "best_ask": 10001000,
    "best_bid_size": 0.5,
    "best_ask_size": 0.25,
    "total_bid_depth": 1200.5,
    "total_ask_depth": 980.25,
    "ltp": 10000000,
    "volume": 5000.1,
    "volume_by_product": 4000.2
}"#;

fn gateway(server: &Server) -> Gateway {
    Gateway::new(GatewayConfig::new(
        server.url(),
        "ws://unused".to_string(),
        String::new(),
    ))
}

/// Signed client pinned to unix time 1700000000
fn private_client(server: &Server) -> PrivateClient {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap(),
    ));
    PrivateClient::new(
        server.url(),
        Credentials::new("key", "secret"),
        ProductCode::fx_btc_jpy(),
    )
    .with_clock(clock)
}

// ============================================================================
// Public endpoints
// ============================================================================

#[tokio::test]
async fn test_get_ticker() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::UrlEncoded(
            "product_code".into(),
            "FX_BTC_JPY".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TICKER_BODY)
        .expect(2)
        .create_async()
        .await;

    let gateway = gateway(&server);
    let ticker = gateway.rest().get_ticker("FX_BTC_JPY").await.unwrap();

    assert_eq!(ticker.product_code, ProductCode::fx_btc_jpy());
    assert_eq!(ticker.tick_id, 42);
    assert_eq!(ticker.best_bid, dec!(9999000));
    assert_eq!(ticker.spread(), dec!(2000));
    assert_eq!(ticker.mid_price(), dec!(10000000));
    assert_eq!(ticker.timestamp.to_rfc3339(), "2024-05-01T09:00:00+09:00");

    // Same request through the port
    let fetcher: &dyn TickerFetcher = gateway.rest();
    assert_eq!(fetcher.get_ticker("FX_BTC_JPY").await.unwrap().tick_id, 42);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_ticker_non_200() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"status":-100,"error_message":"Invalid product"}"#)
        .create_async()
        .await;

    let err = gateway(&server)
        .rest()
        .get_ticker("NOPE")
        .await
        .unwrap_err();
    match err {
        RestError::Status { want, have, body } => {
            assert_eq!(want, 200);
            assert_eq!(have, 400);
            assert!(body.contains("Invalid product"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_ticker_rejects_other_success_codes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;

    let err = gateway(&server)
        .rest()
        .get_ticker("FX_BTC_JPY")
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Status { have: 204, .. }));
}

#[tokio::test]
async fn test_get_ticker_malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = gateway(&server)
        .rest()
        .get_ticker("FX_BTC_JPY")
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::InvalidResponse(_)));
}

// ============================================================================
// Signed endpoints
// ============================================================================

#[tokio::test]
async fn test_get_positions_signed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/me/getpositions")
        .match_query(Matcher::UrlEncoded(
            "product_code".into(),
            "FX_BTC_JPY".into(),
        ))
        .match_header("ACCESS-KEY", "key")
        .match_header("ACCESS-TIMESTAMP", "1700000000")
        .match_header(
            "ACCESS-SIGN",
            "6e0eb534e6dc65b08c2776402b8327abedeb4e67df9f804a1cfc5a6615518a9c",
        )
        .with_status(200)
        .with_body(
            r#"[{
                "product_code": "FX_BTC_JPY",
                "side": "SELL",
                "price": 10000000,
                "size": 0.2,
                "commission": 0,
                "swap_point_accumulate": -35,
                "require_collateral": 500000,
                "open_date": "2024-05-01T00:00:00.1",
                "leverage": 4,
                "pnl": 120,
                "sfd": 0
            }]"#,
        )
        .create_async()
        .await;

    let positions = private_client(&server).get_positions().await.unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].side, Side::Sell);
    assert_eq!(positions[0].signed_size(), dec!(-0.2));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_order_signed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/me/sendchildorder")
        .match_header("ACCESS-TIMESTAMP", "1700000000")
        .match_header(
            "ACCESS-SIGN",
            "d0b40f5389e230a691aea6c15644fa94a9cb62ccaf488f84ec0ad8e4026dfeff",
        )
        .match_header("content-type", "application/json")
        .match_body(Matcher::Exact(
            r#"{"product_code":"FX_BTC_JPY","child_order_type":"LIMIT","side":"BUY","price":30000.0,"size":0.1}"#
                .to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"child_order_acceptance_id":"JRF20150707-050237-639234"}"#)
        .create_async()
        .await;

    let acceptance_id = private_client(&server)
        .create_order(Side::Buy, dec!(30000), dec!(0.1), ChildOrderType::Limit)
        .await
        .unwrap();
    assert_eq!(acceptance_id, "JRF20150707-050237-639234");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_order_through_port() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/me/sendchildorder")
        .match_body(Matcher::PartialJsonString(
            r#"{"child_order_type":"MARKET","side":"SELL","minute_to_expire":10}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"child_order_acceptance_id":"JRF-1"}"#)
        .create_async()
        .await;

    let sender: Box<dyn OrderSender> = Box::new(private_client(&server));
    let request = ChildOrderRequest::market(ProductCode::fx_btc_jpy(), Side::Sell, dec!(0.01))
        .with_minute_to_expire(10);
    let acceptance = sender.send_child_order(&request).await.unwrap();
    assert_eq!(acceptance.child_order_acceptance_id, "JRF-1");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_order() {
    let mut server = Server::new_async().await;
    let by_acceptance = server
        .mock("POST", "/v1/me/cancelchildorder")
        .match_body(Matcher::Exact(
            r#"{"product_code":"FX_BTC_JPY","child_order_acceptance_id":"JRF-1"}"#.to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;
    let by_order_id = server
        .mock("POST", "/v1/me/cancelchildorder")
        .match_body(Matcher::Exact(
            r#"{"product_code":"FX_BTC_JPY","child_order_id":"JOR-1"}"#.to_string(),
        ))
        .with_status(200)
        .create_async()
        .await;

    let client = private_client(&server);
    client.cancel_order("JRF-1").await.unwrap();
    client
        .cancel_child_order(&CancelChildOrderRequest::by_order_id(
            ProductCode::fx_btc_jpy(),
            "JOR-1",
        ))
        .await
        .unwrap();

    by_acceptance.assert_async().await;
    by_order_id.assert_async().await;
}

#[tokio::test]
async fn test_cancel_all_orders_signed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/me/cancelallchildorder")
        .match_header(
            "ACCESS-SIGN",
            "ccb4a456635e6bda0b443f60a66797f8cc2bddcf91f2b91dc591ea927bf63a1b",
        )
        .match_body(Matcher::Exact(r#"{"product_code":"FX_BTC_JPY"}"#.to_string()))
        .with_status(200)
        .create_async()
        .await;

    private_client(&server).cancel_all_orders().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_failure_reports_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/me/cancelallchildorder")
        .with_status(401)
        .with_body(r#"{"status":-500,"error_message":"Key not found"}"#)
        .create_async()
        .await;

    let err = private_client(&server)
        .cancel_all_child_orders()
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Status { have: 401, .. }));
}

const ORDER_JSON: &str = r#"{
    "id": 138398,
    "child_order_id": "JOR20150707-084555-022523",
    "product_code": "FX_BTC_JPY",
    "side": "BUY",
    "child_order_type": "LIMIT",
    "price": 30000,
    "average_price": 30000,
    "size": 0.1,
    "child_order_state": "COMPLETED",
    "expire_date": "2015-07-14T07:25:52",
    "child_order_date": "2015-07-07T08:45:53",
    "child_order_acceptance_id": "JRF20150707-084552-031927",
    "outstanding_size": 0,
    "cancel_size": 0,
    "executed_size": 0.1,
    "total_commission": 0
}"#;

#[tokio::test]
async fn test_get_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/me/getchildorders")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("product_code".into(), "FX_BTC_JPY".into()),
            Matcher::UrlEncoded(
                "child_order_acceptance_id".into(),
                "JRF20150707-084552-031927".into(),
            ),
        ]))
        .with_status(200)
        .with_body(format!("[{ORDER_JSON}]"))
        .create_async()
        .await;

    let order = private_client(&server)
        .get_order("JRF20150707-084552-031927")
        .await
        .unwrap();
    assert_eq!(order.child_order_id, "JOR20150707-084555-022523");
    assert_eq!(order.executed_size, dec!(0.1));
    assert!(!order.is_active());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_order_requires_single_match() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/me/getchildorders")
        .match_query(Matcher::UrlEncoded(
            "child_order_acceptance_id".into(),
            "JRF-dup".into(),
        ))
        .with_status(200)
        .with_body(format!("[{ORDER_JSON},{ORDER_JSON}]"))
        .create_async()
        .await;
    server
        .mock("GET", "/v1/me/getchildorders")
        .match_query(Matcher::UrlEncoded(
            "child_order_acceptance_id".into(),
            "missing".into(),
        ))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = private_client(&server);

    let err = client.get_order("missing").await.unwrap_err();
    assert!(matches!(err, RestError::InvalidResponse(_)));

    let err = client.get_order("JRF-dup").await.unwrap_err();
    assert!(matches!(err, RestError::InvalidResponse(_)));
}
