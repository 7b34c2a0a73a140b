use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use sessctl::domain::config::SessionConfig;
use sessctl::infrastructure::gateway::GatewayAuth;
use sessctl::{SendStatus, SessionSendOrchestrator, WsGateway};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

type Handler = Arc<dyn Fn(&str, &Value) -> Value + Send + Sync>;

/// In-process gateway: answers the handshake on every connection and
/// replies to each request with `handler(method, params)` as a `res` frame.
/// Returning `Value::Null` leaves the request unanswered.
struct MockGateway {
    url: String,
    methods: Arc<Mutex<Vec<String>>>,
    params: Arc<Mutex<Vec<Value>>>,
}

impl MockGateway {
    async fn start(handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let methods = Arc::new(Mutex::new(Vec::new()));
        let params = Arc::new(Mutex::new(Vec::new()));

        let seen_methods = methods.clone();
        let seen_params = params.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let handler = handler.clone();
                let seen_methods = seen_methods.clone();
                let seen_params = seen_params.clone();
                tokio::spawn(async move {
                    let mut ws = match accept_async(socket).await {
                        Ok(ws) => ws,
                        Err(_) => return,
                    };
                    while let Some(Ok(Message::Text(text))) = ws.next().await {
                        let req: Value = serde_json::from_str(text.as_str()).unwrap();
                        let id = req["id"].clone();
                        let method = req["method"].as_str().unwrap_or_default().to_string();

                        let mut frame = if method == "connect" {
                            json!({ "type": "res", "ok": true, "payload": { "type": "hello-ok" } })
                        } else {
                            seen_methods.lock().unwrap().push(method.clone());
                            seen_params.lock().unwrap().push(req["params"].clone());
                            // Events before the response must be skipped by the client
                            let tick = json!({ "type": "event", "event": "tick", "payload": {} });
                            let _ = ws.send(Message::text(tick.to_string())).await;
                            handler(&method, &req["params"])
                        };
                        if frame.is_null() {
                            continue;
                        }
                        frame["id"] = id;
                        if ws.send(Message::text(frame.to_string())).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            url: format!("ws://{}", addr),
            methods,
            params,
        }
    }

    fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    fn params(&self) -> Vec<Value> {
        self.params.lock().unwrap().clone()
    }
}

fn ok(payload: Value) -> Value {
    json!({ "type": "res", "ok": true, "payload": payload })
}

fn failed(message: &str) -> Value {
    json!({ "type": "res", "ok": false, "error": { "code": "UNAVAILABLE", "message": message } })
}

fn happy_handler(reply: &'static str) -> Handler {
    Arc::new(move |method: &str, _: &Value| match method {
        "agent" => ok(json!({ "runId": "run-1", "status": "accepted" })),
        "agent.wait" => ok(json!({ "runId": "run-1", "status": "done" })),
        "chat.history" => ok(json!({
            "messages": [
                { "role": "user", "content": "Hello" },
                { "role": "assistant", "content": [{ "type": "text", "text": reply }] },
            ],
        })),
        other => failed(&format!("unknown method {}", other)),
    })
}

/// Config file pointing the binary at `url`
fn write_config(dir: &TempDir, url: &str) -> String {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, format!("[gateway]\nurl = \"{}\"\n", url)).unwrap();
    path.display().to_string()
}

async fn run_cli(config: &str, args: &[&str]) -> std::process::Output {
    let mut full = vec!["-q"];
    full.extend_from_slice(args);
    run_cli_logged(config, &full).await
}

/// Runs the binary with logging left at the configured default level
async fn run_cli_logged(config: &str, args: &[&str]) -> std::process::Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_sessctl"))
        .args(["-c", config])
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SESSCTL_GATEWAY_URL")
        .env_remove("SESSCTL_GATEWAY_TOKEN")
        .env_remove("SESSCTL_GATEWAY_PASSWORD")
        .output()
        .await
        .expect("Failed to execute sessctl")
}

#[tokio::test]
async fn test_send_prints_agent_reply() {
    let gateway = MockGateway::start(happy_handler("Hi there")).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output = run_cli(
        &config,
        &["sessions", "send", "--session", "agent:webchat:direct:abc", "--message", "Hello"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hi there\n");
    assert_eq!(gateway.methods(), vec!["agent", "agent.wait", "chat.history"]);

    let params = gateway.params();
    assert_eq!(params[0]["sessionKey"], "agent:webchat:direct:abc");
    assert_eq!(params[0]["lane"], "nested");
    assert_eq!(params[1], json!({ "runId": "run-1", "timeoutMs": 30000 }));
}

#[tokio::test]
async fn test_fire_and_forget_json() {
    let gateway = MockGateway::start(happy_handler("unused")).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output = run_cli(
        &config,
        &["sessions", "send", "--session", "main", "--message", "ping", "--timeout", "0", "--json"],
    )
    .await;

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result, json!({ "runId": "run-1", "status": "accepted", "sessionKey": "main" }));
    assert_eq!(gateway.methods(), vec!["agent"]);
    assert_eq!(gateway.params()[0]["sessionKey"], "agent:main:main");
}

#[tokio::test]
async fn test_relayed_gateway_timeout_exits_nonzero() {
    let handler: Handler = Arc::new(|method: &str, _: &Value| match method {
        "agent" => ok(json!({ "runId": "run-9" })),
        _ => failed("gateway timeout after 5000ms"),
    });
    let gateway = MockGateway::start(handler).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output = run_cli(
        &config,
        &["sessions", "send", "--session", "main", "--message", "hi", "--timeout", "5", "--json"],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["status"], "timeout");
    assert_eq!(result["runId"], "run-9");
    assert_eq!(result["error"], "gateway timeout after 5000ms");
    assert_eq!(gateway.methods(), vec!["agent", "agent.wait"]);
}

#[tokio::test]
async fn test_remote_agent_error_text_mode() {
    let handler: Handler = Arc::new(|method: &str, _: &Value| match method {
        "agent" => ok(json!({ "runId": "run-3" })),
        "agent.wait" => ok(json!({ "status": "error", "error": "model overloaded" })),
        other => failed(&format!("unexpected {}", other)),
    });
    let gateway = MockGateway::start(handler).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output = run_cli(&config, &["sessions", "send", "--session", "main", "--message", "hi"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(String::from_utf8_lossy(&output.stderr), "Error: model overloaded\n");
}

#[tokio::test]
async fn test_failure_stderr_is_only_the_error_line() {
    let handler: Handler = Arc::new(|method: &str, _: &Value| match method {
        "agent" => ok(json!({ "runId": "run-6" })),
        "agent.wait" => ok(json!({ "status": "ok" })),
        _ => failed("history unavailable"),
    });
    let gateway = MockGateway::start(handler).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output =
        run_cli_logged(&config, &["sessions", "send", "--session", "main", "--message", "hi"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(String::from_utf8_lossy(&output.stderr), "Error: history unavailable\n");
}

#[tokio::test]
async fn test_wait_transport_timeout_via_library() {
    // agent.wait is never answered, so the transport bound of
    // timeoutMs + grace expires on the client side
    let handler: Handler = Arc::new(|method: &str, _: &Value| match method {
        "agent" => ok(json!({ "runId": "run-5" })),
        _ => Value::Null,
    });
    let gateway = MockGateway::start(handler).await;

    let orchestrator = SessionSendOrchestrator::new(
        WsGateway::new(gateway.url.clone(), GatewayAuth::Token("secret".to_string())),
        SessionConfig::default(),
    );

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        orchestrator.send(Some("main"), Some("hi"), Some("1")),
    )
    .await
    .expect("send should finish within its own bounds")
    .unwrap();

    assert_eq!(result.status, SendStatus::Timeout);
    assert_eq!(result.run_id, "run-5");
    assert_eq!(result.error.as_deref(), Some("gateway timeout after 3000ms"));
}

#[tokio::test]
async fn test_label_reference_is_resolved_first() {
    let handler: Handler = Arc::new(|method: &str, params: &Value| match method {
        "sessions.resolve" if params["label"] == "nightly" => {
            ok(json!({ "ok": true, "key": "agent:ops:direct:nightly" }))
        }
        "agent" => ok(json!({ "runId": "run-4" })),
        other => failed(&format!("unexpected {}", other)),
    });
    let gateway = MockGateway::start(handler).await;
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &gateway.url);

    let output = run_cli(
        &config,
        &["sessions", "send", "--session", "nightly", "--message", "status?", "--timeout", "0"],
    )
    .await;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Message queued for agent:ops:direct:nightly.\n"
    );
    assert_eq!(gateway.methods(), vec!["sessions.resolve", "agent"]);
    assert_eq!(gateway.params()[1]["sessionKey"], "agent:ops:direct:nightly");
}
