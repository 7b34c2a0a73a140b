//! Gateway wire frames.
//!
//! Every frame is a JSON text message tagged by `type`: requests (`req`)
//! go out, responses (`res`) and events (`event`) come back.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Protocol version spoken by this client
pub const PROTOCOL_VERSION: u32 = 3;

/// Client identifier announced during the handshake
pub const CLIENT_ID: &str = "sessctl";

/// Outbound request frame
#[derive(Debug, Serialize)]
pub struct RequestFrame<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
    pub method: &'a str,
    pub params: &'a Value,
}

impl<'a> RequestFrame<'a> {
    pub fn new(id: &'a str, method: &'a str, params: &'a Value) -> Self {
        Self {
            kind: "req",
            id,
            method,
            params,
        }
    }
}

/// Inbound frame
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    Res(ResponseFrame),
    Event(EventFrame),
    #[serde(other)]
    Unknown,
}

/// Response to a request
#[derive(Debug, Deserialize)]
pub struct ResponseFrame {
    pub id: String,
    pub ok: bool,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorShape>,
}

/// Error body carried by a failed response
#[derive(Debug, Deserialize)]
pub struct ErrorShape {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Server push event
#[derive(Debug, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Parameters of the `connect` handshake request
pub fn connect_params(token: Option<&str>, password: Option<&str>) -> Value {
    let mut params = json!({
        "minProtocol": PROTOCOL_VERSION,
        "maxProtocol": PROTOCOL_VERSION,
        "client": {
            "id": CLIENT_ID,
            "version": env!("CARGO_PKG_VERSION"),
            "platform": std::env::consts::OS,
            "mode": "cli",
        },
        "role": "operator",
    });

    if let Some(token) = token {
        params["auth"] = json!({ "token": token });
    } else if let Some(password) = password {
        params["auth"] = json!({ "password": password });
    }

    params
}
