use super::protocol::{connect_params, InboundFrame, RequestFrame};
use super::{GatewayCall, GatewayError};
use crate::domain::config::GatewayConfig;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;
use uuid::Uuid;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Credentials presented in the `connect` handshake
#[derive(Debug, Clone, Default)]
pub enum GatewayAuth {
    #[default]
    None,
    Token(String),
    Password(String),
}

/// WebSocket gateway client.
///
/// Each call opens its own connection, performs the handshake, issues one
/// request and waits for the matching response. The whole exchange is
/// bounded by the caller's timeout.
pub struct WsGateway {
    url: String,
    auth: GatewayAuth,
}

impl WsGateway {
    pub fn new(url: impl Into<String>, auth: GatewayAuth) -> Self {
        Self {
            url: url.into(),
            auth,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        let auth = match (&config.token, &config.password) {
            (Some(token), _) => GatewayAuth::Token(token.clone()),
            (None, Some(password)) => GatewayAuth::Password(password.clone()),
            (None, None) => GatewayAuth::None,
        };
        Self::new(config.url.clone(), auth)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let (mut ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| GatewayError::Connect {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let (token, password) = match &self.auth {
            GatewayAuth::None => (None, None),
            GatewayAuth::Token(token) => (Some(token.as_str()), None),
            GatewayAuth::Password(password) => (None, Some(password.as_str())),
        };
        request(&mut ws, "connect", connect_params(token, password)).await?;
        debug!("Gateway handshake completed with {}", self.url);

        let payload = request(&mut ws, method, params).await?;

        if let Err(e) = ws.close(None).await {
            debug!("Failed to close gateway connection cleanly: {}", e);
        }
        Ok(payload)
    }
}

#[async_trait]
impl GatewayCall for WsGateway {
    async fn call(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, GatewayError> {
        debug!("Gateway call {} (timeout {}ms)", method, timeout.as_millis());
        match tokio::time::timeout(timeout, self.exchange(method, params)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("Gateway call {} timed out", method);
                Err(GatewayError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Send one request frame and wait for its response
async fn request(ws: &mut WsStream, method: &str, params: Value) -> Result<Value, GatewayError> {
    let id = Uuid::new_v4().to_string();
    let frame = serde_json::to_string(&RequestFrame::new(&id, method, &params))?;
    ws.send(Message::text(frame))
        .await
        .map_err(|e| GatewayError::Closed(e.to_string()))?;

    loop {
        let message = match ws.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => return Err(GatewayError::Closed(e.to_string())),
            None => return Err(GatewayError::Closed("connection ended".to_string())),
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(frame) => {
                let reason = frame
                    .map(|f| format!("{} {}", u16::from(f.code), f.reason.as_str()))
                    .unwrap_or_else(|| "no close frame".to_string());
                return Err(GatewayError::Closed(reason.trim().to_string()));
            }
            Message::Binary(_) => {
                return Err(GatewayError::Protocol("unexpected binary frame".to_string()))
            }
            _ => continue,
        };

        match serde_json::from_str::<InboundFrame>(text.as_str())? {
            InboundFrame::Res(res) if res.id == id => {
                if res.ok {
                    return Ok(res.payload.unwrap_or(Value::Null));
                }
                let (code, message) = match res.error {
                    Some(error) => (error.code, error.message),
                    None => (None, format!("{} failed", method)),
                };
                return Err(GatewayError::Remote { code, message });
            }
            InboundFrame::Res(res) => debug!("Ignoring response for unknown request {}", res.id),
            InboundFrame::Event(event) => debug!("Ignoring gateway event {}", event.event),
            InboundFrame::Unknown => debug!("Ignoring unrecognised gateway frame"),
        }
    }
}
