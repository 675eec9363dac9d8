use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;
use trading_core::{
    CancelChildOrderRequest, ChildOrder, ChildOrderAcceptance, ChildOrderRequest, ChildOrderType,
    Clock, Position, ProductCode, Side, SystemClock,
};

use super::rest_client::{RestError, ensure_success, read_json};
use crate::gateway_in::domain::OrderSender;

type HmacSha256 = Hmac<Sha256>;

/// API key and secret. Debug output never shows either.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Authenticated REST client for order management, scoped to one product.
///
/// Every request carries `ACCESS-KEY`, `ACCESS-TIMESTAMP` (unix seconds) and
/// `ACCESS-SIGN`, the hex HMAC-SHA256 of `timestamp + METHOD + path[?query] + body`.
#[derive(Clone)]
pub struct PrivateClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    product_code: ProductCode,
    clock: Arc<dyn Clock>,
}

impl PrivateClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        product_code: ProductCode,
    ) -> Self {
        PrivateClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            product_code,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Use `clock` for `ACCESS-TIMESTAMP`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn product_code(&self) -> &ProductCode {
        &self.product_code
    }

    /// Place a child order, returning its acceptance id
    pub async fn create_order(
        &self,
        side: Side,
        price: Decimal,
        size: Decimal,
        child_order_type: ChildOrderType,
    ) -> Result<String, RestError> {
        let request = ChildOrderRequest {
            child_order_type,
            ..ChildOrderRequest::limit(self.product_code.clone(), side, price, size)
        };
        let acceptance = self.send_order(&request).await?;
        tracing::info!(
            %side,
            %price,
            %size,
            acceptance_id = %acceptance.child_order_acceptance_id,
            "Child order accepted"
        );
        Ok(acceptance.child_order_acceptance_id)
    }

    pub async fn send_order(
        &self,
        request: &ChildOrderRequest,
    ) -> Result<ChildOrderAcceptance, RestError> {
        let resp = self.post("/v1/me/sendchildorder", request).await?;
        read_json(resp).await
    }

    /// Cancel a child order by acceptance id
    pub async fn cancel_order(&self, acceptance_id: &str) -> Result<(), RestError> {
        let request =
            CancelChildOrderRequest::by_acceptance_id(self.product_code.clone(), acceptance_id);
        self.post("/v1/me/cancelchildorder", &request).await?;
        Ok(())
    }

    pub async fn cancel_all_orders(&self) -> Result<(), RestError> {
        let request = CancelChildOrderRequest {
            product_code: self.product_code.clone(),
            child_order_id: None,
            child_order_acceptance_id: None,
        };
        self.post("/v1/me/cancelallchildorder", &request).await?;
        Ok(())
    }

    /// Look up a child order by acceptance id. Exactly one match is expected.
    pub async fn get_order(&self, acceptance_id: &str) -> Result<ChildOrder, RestError> {
        let mut orders: Vec<ChildOrder> = self
            .get(
                "/v1/me/getchildorders",
                &[
                    ("product_code", self.product_code.as_str()),
                    ("child_order_acceptance_id", acceptance_id),
                ],
            )
            .await?;

        if orders.len() != 1 {
            return Err(RestError::InvalidResponse(format!(
                "expected a single order for {}, got {}",
                acceptance_id,
                orders.len()
            )));
        }
        Ok(orders.remove(0))
    }

    pub async fn get_positions(&self) -> Result<Vec<Position>, RestError> {
        self.get(
            "/v1/me/getpositions",
            &[("product_code", self.product_code.as_str())],
        )
        .await
    }

    /// Hex HMAC-SHA256 of `timestamp + method + path_and_query + body`
    pub fn sign(
        &self,
        timestamp: i64,
        method: &str,
        path_and_query: &str,
        body: &str,
    ) -> Result<String, RestError> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| RestError::Auth(e.to_string()))?;
        mac.update(format!("{}{}{}{}", timestamp, method, path_and_query, body).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn auth_headers(
        &self,
        method: &str,
        path_and_query: &str,
        body: &str,
    ) -> Result<HeaderMap, RestError> {
        let timestamp = self.clock.now().timestamp();
        let sign = self.sign(timestamp, method, path_and_query, body)?;

        let mut headers = HeaderMap::new();
        headers.insert("ACCESS-KEY", header_value(self.credentials.api_key())?);
        headers.insert("ACCESS-TIMESTAMP", HeaderValue::from(timestamp));
        headers.insert("ACCESS-SIGN", header_value(&sign)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RestError> {
        let query_string = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query)
            .finish();
        let path_and_query = if query_string.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query_string)
        };

        let headers = self.auth_headers("GET", &path_and_query, "")?;
        tracing::debug!(path = %path_and_query, "GET (signed)");

        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path_and_query))
            .headers(headers)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, RestError> {
        let body = serde_json::to_string(body)?;
        let headers = self.auth_headers("POST", path, &body)?;
        tracing::debug!(path, "POST (signed)");

        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .headers(headers)
            .body(body)
            .send()
            .await?;
        ensure_success(resp).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RestError> {
    HeaderValue::from_str(value).map_err(|e| RestError::Auth(e.to_string()))
}

#[async_trait]
impl OrderSender for PrivateClient {
    async fn send_child_order(
        &self,
        request: &ChildOrderRequest,
    ) -> Result<ChildOrderAcceptance, RestError> {
        self.send_order(request).await
    }

    async fn cancel_child_order(
        &self,
        request: &CancelChildOrderRequest,
    ) -> Result<(), RestError> {
        self.post("/v1/me/cancelchildorder", request).await?;
        Ok(())
    }

    async fn cancel_all_child_orders(&self) -> Result<(), RestError> {
        self.cancel_all_orders().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trading_core::ManualClock;

    fn client(secret: &str) -> PrivateClient {
        PrivateClient::new(
            "http://localhost/",
            Credentials::new("key", secret),
            ProductCode::fx_btc_jpy(),
        )
    }

    #[test]
    fn test_sign_known_vector() {
        let sign = client("key").sign(0, "", "", "").unwrap();
        assert_eq!(sign.len(), 64);

        // HMAC-SHA256("secret", "1700000000GET/v1/me/getpositions?product_code=FX_BTC_JPY")
        let sign = client("secret")
            .sign(
                1_700_000_000,
                "GET",
                "/v1/me/getpositions?product_code=FX_BTC_JPY",
                "",
            )
            .unwrap();
        assert_eq!(
            sign,
            "6e0eb534e6dc65b08c2776402b8327abedeb4e67df9f804a1cfc5a6615518a9c"
        );
    }

    #[test]
    fn test_auth_headers_use_clock() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap(),
        ));
        let client = client("secret").with_clock(clock);

        let headers = client
            .auth_headers("GET", "/v1/me/getpositions?product_code=FX_BTC_JPY", "")
            .unwrap();
        assert_eq!(headers["ACCESS-KEY"], "key");
        assert_eq!(headers["ACCESS-TIMESTAMP"], "1700000000");
        assert_eq!(
            headers["ACCESS-SIGN"],
            "6e0eb534e6dc65b08c2776402b8327abedeb4e67df9f804a1cfc5a6615518a9c"
        );
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_credentials_debug_is_masked() {
        let debug = format!("{:?}", Credentials::new("my-key", "my-secret"));
        assert!(!debug.contains("my-key"));
        assert!(!debug.contains("my-secret"));
    }
}
