use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::ORIGIN};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;

use crate::gateway_in::domain::{RpcMessage, RpcTransport};
use crate::gateway_in::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// Any JSON-RPC 2.0 frame: a notification, a response or an error response
#[derive(Deserialize)]
struct RpcFrame {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

/// JSON-RPC 2.0 over WebSocket
/// Infrastructure component - handles WebSocket communication
///
/// Ping frames are answered by tungstenite while the stream is being read.
pub struct WsRpcTransport {
    writer: Mutex<SplitSink<WsStream, Message>>,
    reader: Mutex<SplitStream<WsStream>>,
    next_id: AtomicU64,
    closed: CancellationToken,
    close_sent: AtomicBool,
}

impl WsRpcTransport {
    /// Open a connection, sending `origin` as the Origin header when non-empty
    pub async fn connect(url: &str, origin: &str) -> Result<Self, TransportError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        if !origin.is_empty() {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| TransportError::Connection(format!("invalid origin: {}", e)))?;
            request.headers_mut().insert(ORIGIN, value);
        }

        let (stream, response) = connect_async(request)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        tracing::info!(url, status = %response.status(), "WebSocket connected");

        let (writer, reader) = stream.split();
        Ok(WsRpcTransport {
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
            next_id: AtomicU64::new(1),
            closed: CancellationToken::new(),
            close_sent: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcTransport for WsRpcTransport {
    async fn send(&self, method: &str, params: Value) -> Result<(), TransportError> {
        if self.closed.is_cancelled() {
            return Err(TransportError::Closed);
        }

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };
        let text = serde_json::to_string(&request)?;
        tracing::trace!(%text, "Sending request");

        self.writer
            .lock()
            .await
            .send(Message::text(text))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn recv(&self) -> Result<RpcMessage, TransportError> {
        let mut reader = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(TransportError::Closed),
            reader = self.reader.lock() => reader,
        };

        loop {
            let frame = tokio::select! {
                biased;
                _ = self.closed.cancelled() => return Err(TransportError::Closed),
                frame = reader.next() => frame,
            };

            let text = match frame {
                Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping non UTF-8 binary frame");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "WebSocket closed by peer");
                    self.closed.cancel();
                    return Err(TransportError::Closed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.closed.cancel();
                    return Err(TransportError::Receive(e.to_string()));
                }
                None => {
                    self.closed.cancel();
                    return Err(TransportError::Closed);
                }
            };

            if let Some(message) = decode_frame(&text) {
                return Ok(message);
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.cancel();
        if self.close_sent.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.writer.lock().await.close().await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => {
                tracing::debug!("WebSocket close sent");
                Ok(())
            }
            Err(e) => Err(TransportError::Connection(e.to_string())),
        }
    }
}

/// Decode one frame. Frames that are not valid JSON-RPC are logged and skipped.
fn decode_frame(text: &str) -> Option<RpcMessage> {
    let frame: RpcFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed frame");
            return None;
        }
    };

    if let Some(error) = frame.error {
        tracing::warn!(id = ?frame.id, %error, "RPC error response");
        return None;
    }

    match (frame.method, frame.id) {
        (Some(method), id) => Some(RpcMessage {
            method,
            params: frame.params.unwrap_or(Value::Null),
            id,
        }),
        (None, Some(id)) => Some(RpcMessage::response(
            id,
            frame.result.unwrap_or(Value::Null),
        )),
        (None, None) => {
            tracing::warn!("Skipping frame without method or id");
            None
        }
    }
}
