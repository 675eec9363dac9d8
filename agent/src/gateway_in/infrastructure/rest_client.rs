use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use trading_core::{ExchangeTime, Ticker, TickerEvent, TimestampError};

use crate::gateway_in::domain::TickerFetcher;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid status code: want {want}, have {have}: {body}")]
    Status { want: u16, have: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] TimestampError),
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Authentication error: {0}")]
    Auth(String),
}

/// Public REST API client
/// Infrastructure component - handles HTTP communication
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    exchange_time: ExchangeTime,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        RestClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            exchange_time: ExchangeTime::default(),
        }
    }

    pub fn with_exchange_time(mut self, exchange_time: ExchangeTime) -> Self {
        self.exchange_time = exchange_time;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the current ticker of a product
    pub async fn get_ticker(&self, product_code: &str) -> Result<Ticker, RestError> {
        let url = format!("{}/v1/ticker", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("product_code", product_code)])
            .send()
            .await?;

        let event: TickerEvent = read_json(resp).await?;
        Ok(Ticker::from_event(event, &self.exchange_time)?)
    }
}

#[async_trait]
impl TickerFetcher for RestClient {
    async fn get_ticker(&self, product_code: &str) -> Result<Ticker, RestError> {
        RestClient::get_ticker(self, product_code).await
    }
}

/// Fail with the body text unless the status is exactly 200
pub(crate) async fn ensure_success(resp: Response) -> Result<Response, RestError> {
    let status = resp.status();
    if status == StatusCode::OK {
        return Ok(resp);
    }

    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => e.to_string(),
    };
    Err(RestError::Status {
        want: StatusCode::OK.as_u16(),
        have: status.as_u16(),
        body,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, RestError> {
    let resp = ensure_success(resp).await?;
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| RestError::InvalidResponse(e.to_string()))
}
