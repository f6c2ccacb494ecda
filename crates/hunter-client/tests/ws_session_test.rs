//! Integration tests for the discovery session.
//!
//! These tests run a mock backend on a random available port. The mock
//! replays canned frame scripts over a WebSocket, mimicking the agent
//! process: a start frame, interleaved noise and final-answer fragments,
//! then a terminal frame.

use std::sync::{Arc, Mutex};

use hunter_client::core::query::{DateRange, QueryForm, Vertical};
use hunter_client::session::DEFAULT_ERROR_MESSAGE;
use hunter_client::{ClientError, QueryClient, SessionSubscriber, Supervisor};

/// Short tool-call narration; must be discarded by the classifier.
const NOISE_FRAGMENT: &str = "Tool Calls:\n  search_engine (call_abc123)";

/// Final markdown listing; must replace the displayed result.
const FINAL_FRAGMENT: &str = "## Results\n\n**Event Name**: RustConf 2025\n**Link**: https://rustconf.com\n**Date**: September 2, 2025\n**Location**: Montreal\n**Open CFP**: No";

/// Fragment the reducer accepts before the mock reports an error.
const PARTIAL_FRAGMENT: &str = "## Partial results";

mod mock_server {
    //! A minimal mock discovery backend for integration testing.
    //!
    //! Serves the streaming WebSocket endpoint and the synchronous query
    //! endpoint with canned payloads, so tests need no Python backend or
    //! LLM access.

    use axum::Router;
    use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn frames_for(query: &str) -> Vec<String> {
        let start = format!(
            r#"{{"type":"start","message":"Processing your query...","query":{}}}"#,
            serde_json::to_string(query).expect("query should encode")
        );
        let stream = |content: &str| {
            format!(
                r#"{{"type":"stream","content":{},"role":"assistant"}}"#,
                serde_json::to_string(content).expect("content should encode")
            )
        };

        if query.contains("Failville") {
            // A cycle that dies after a partial result; the error frame
            // deliberately has no message field.
            vec![
                start,
                stream(super::PARTIAL_FRAGMENT),
                r#"{"type":"error"}"#.to_string(),
            ]
        } else {
            vec![
                start,
                stream(super::NOISE_FRAGMENT),
                stream(super::FINAL_FRAGMENT),
                r#"{"type":"complete","message":"Query processing completed"}"#.to_string(),
            ]
        }
    }

    async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
        ws.on_upgrade(handle_socket)
    }

    async fn handle_socket(mut socket: WebSocket) {
        // Like the real backend, serve queries until the client goes away.
        while let Some(Ok(Message::Text(text))) = socket.recv().await {
            let query: serde_json::Value = match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) => break,
            };
            let query = query["query"].as_str().unwrap_or_default().to_string();
            for frame in frames_for(&query) {
                if socket.send(Message::Text(frame)).await.is_err() {
                    return;
                }
            }
        }
    }

    /// Header the synchronous endpoint demands, like a deployment sitting
    /// behind an API gateway would.
    pub const API_KEY_HEADER: &str = "x-api-key";
    pub const API_KEY: &str = "test-key";

    async fn query_handler(headers: axum::http::HeaderMap, body: String) -> impl IntoResponse {
        let content_type = [(axum::http::header::CONTENT_TYPE, "application/json")];
        if headers.get(API_KEY_HEADER).map(|v| v.as_bytes()) != Some(API_KEY.as_bytes()) {
            return (
                axum::http::StatusCode::UNAUTHORIZED,
                content_type,
                r#"{"detail":"missing or invalid api key"}"#.to_string(),
            );
        }

        let request: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
        let query = request["query"].as_str().unwrap_or_default();
        let response = serde_json::json!({
            "query": query,
            "response": super::FINAL_FRAGMENT,
            "status": "completed",
        });
        (
            axum::http::StatusCode::OK,
            content_type,
            response.to_string(),
        )
    }

    /// Start the mock server on an available port.
    ///
    /// Returns the socket address and a shutdown sender. Send to the
    /// sender to gracefully shut down the server.
    pub async fn start() -> (SocketAddr, oneshot::Sender<()>) {
        let app = Router::new()
            .route("/ws/query", get(ws_handler))
            .route("/query", post(query_handler));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind to address");
        let addr = listener.local_addr().expect("failed to get local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        (addr, shutdown_tx)
    }
}

fn berlin_form() -> QueryForm {
    QueryForm::new("Berlin", Vertical::Fintech).with_date_range(DateRange::starting(
        chrono_date(2025, 3, 1),
    ))
}

fn chrono_date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Subscriber that records which hooks fired, for assertion.
#[derive(Default)]
struct Recorder {
    entries: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl SessionSubscriber for Recorder {
    async fn on_start(&self) {
        self.entries.lock().unwrap().push("start".to_string());
    }
    async fn on_result_updated(&self, result: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("result:{}", result.len()));
    }
    async fn on_fragment_discarded(&self, fragment: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("discarded:{}", fragment.len()));
    }
    async fn on_complete(&self, _state: &hunter_client::SessionState) {
        self.entries.lock().unwrap().push("complete".to_string());
    }
    async fn on_error(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("error:{message}"));
    }
}

#[tokio::test]
async fn streaming_query_keeps_only_the_final_fragment() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut supervisor = Supervisor::connect(&format!("ws://{addr}/ws/query"))
        .await
        .expect("connect failed");
    assert!(supervisor.is_connected());

    let state = supervisor
        .run_query(&berlin_form())
        .await
        .expect("query failed");

    assert_eq!(state.result, FINAL_FRAGMENT);
    assert!(!state.loading);
    assert!(state.error.is_empty());
    assert!(state.connected);

    supervisor.close().await;
}

#[tokio::test]
async fn subscribers_see_classification_decisions() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut supervisor = Supervisor::connect(&format!("ws://{addr}/ws/query"))
        .await
        .expect("connect failed");
    let recorder = Arc::new(Recorder::default());
    supervisor.add_subscriber(recorder.clone());

    supervisor
        .run_query(&berlin_form())
        .await
        .expect("query failed");

    let entries = recorder.entries.lock().unwrap().clone();
    assert_eq!(
        entries,
        vec![
            "start".to_string(),
            format!("discarded:{}", NOISE_FRAGMENT.len()),
            format!("result:{}", FINAL_FRAGMENT.len()),
            "complete".to_string(),
        ]
    );
}

#[tokio::test]
async fn error_frame_without_message_yields_the_default_string() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut supervisor = Supervisor::connect(&format!("ws://{addr}/ws/query"))
        .await
        .expect("connect failed");

    let form = QueryForm::new("Failville", Vertical::Ai)
        .with_date_range(DateRange::starting(chrono_date(2025, 1, 1)));
    let state = supervisor.run_query(&form).await.expect("pump failed");

    assert_eq!(state.error, DEFAULT_ERROR_MESSAGE);
    assert!(!state.loading);
    // Error handling only toggles flags; the accepted fragment survives.
    assert_eq!(state.result, PARTIAL_FRAGMENT);
}

#[tokio::test]
async fn second_submission_is_gated_while_loading() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut supervisor = Supervisor::connect(&format!("ws://{addr}/ws/query"))
        .await
        .expect("connect failed");

    let form = berlin_form();
    assert!(supervisor.submit(&form).await.expect("submit failed"));
    // One query is outstanding; the gate silently drops the second.
    assert!(!supervisor.submit(&form).await.expect("submit failed"));

    let state = supervisor.run_to_completion().await.expect("pump failed");
    assert_eq!(state.result, FINAL_FRAGMENT);
}

#[tokio::test]
async fn invalid_form_is_rejected_before_send() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut supervisor = Supervisor::connect(&format!("ws://{addr}/ws/query"))
        .await
        .expect("connect failed");

    let form = QueryForm::new("", Vertical::Ai);
    let err = supervisor.submit(&form).await.expect_err("should reject");
    assert!(matches!(err, ClientError::Form(_)));
}

#[tokio::test]
async fn connect_failure_is_surfaced() {
    let _ = env_logger::try_init();

    // Nothing listens here.
    let err = Supervisor::connect("ws://127.0.0.1:59997/ws/query")
        .await
        .expect_err("connect should fail");
    assert!(matches!(err, ClientError::Connect { .. }));
}

#[tokio::test]
async fn synchronous_endpoint_returns_the_final_response() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        mock_server::API_KEY_HEADER,
        mock_server::API_KEY.parse().expect("valid header value"),
    );
    let client = QueryClient::with_headers(
        format!("http://{addr}/query")
            .parse()
            .expect("valid url"),
        headers,
    );
    let response = client
        .query(berlin_form().compose())
        .await
        .expect("query failed");

    assert_eq!(response.status, "completed");
    assert_eq!(response.response, FINAL_FRAGMENT);
    assert!(response.query.contains("Fintech events in Berlin"));
}

#[tokio::test]
async fn synchronous_endpoint_rejection_surfaces_as_http_error() {
    let _ = env_logger::try_init();
    let (addr, _shutdown) = mock_server::start().await;

    // No API key header: the gateway turns the request away.
    let client = QueryClient::new(
        format!("http://{addr}/query")
            .parse()
            .expect("valid url"),
    );
    let err = client
        .query(berlin_form().compose())
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, ClientError::Http(_)));
}

#[tokio::test]
async fn mock_server_port_isolation() {
    let (addr1, shutdown1) = mock_server::start().await;
    let (addr2, shutdown2) = mock_server::start().await;

    assert_ne!(
        addr1.port(),
        addr2.port(),
        "servers should be on different ports"
    );

    let _ = shutdown1.send(());
    let _ = shutdown2.send(());
}
