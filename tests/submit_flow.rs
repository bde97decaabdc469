// tests/submit_flow.rs
//
// End-to-end submission paths against a local mock of the decision service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::json;

use coach::api::{CoachClient, ErrorKind, Recommendation};
use coach::form::{FormClient, SubmitStatus};
use coach::history::{HistoryStore, MemoryHistoryStore};

/// Serve one canned response on an ephemeral port, counting hits.
async fn spawn_mock(status: StatusCode, body: String) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_handler = hits.clone();

    let app = Router::new().route(
        "/decide",
        post(move || {
            let hits = hits_handler.clone();
            let body = body.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/decide"), hits)
}

fn sample_output() -> serde_json::Value {
    json!({
        "recommendation": "A",
        "one_line_summary": "x",
        "scores": {"A": 80.0, "B": 40.0},
        "score_breakdown": [],
        "tradeoffs": [],
        "risks": {"A": [], "B": []},
        "what_would_change_my_mind": [],
        "follow_up_questions": []
    })
}

fn filled_form(endpoint: String, history: Arc<dyn HistoryStore>) -> FormClient {
    let mut form = FormClient::new(CoachClient::with_endpoint(endpoint), history);
    form.input.decision = "Take the new job?".into();
    form.input.option_a = "Stay".into();
    form.input.option_b = "Go".into();
    form
}

#[tokio::test]
async fn invalid_input_never_reaches_the_service() {
    let (endpoint, hits) = spawn_mock(StatusCode::OK, sample_output().to_string()).await;

    let mut form = filled_form(endpoint, Arc::new(MemoryHistoryStore::new(5)));
    form.input.option_b = "   ".into();
    form.submit().await;

    match form.status() {
        SubmitStatus::Failed(ErrorKind::Validation, msg) => assert!(!msg.is_empty()),
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0, "no request should be sent");
}

#[tokio::test]
async fn successful_envelope_round_trips_exactly() {
    let envelope = json!({ "output": sample_output() });
    let (endpoint, hits) = spawn_mock(StatusCode::OK, envelope.to_string()).await;

    let history = Arc::new(MemoryHistoryStore::new(5));
    let mut form = filled_form(endpoint, history.clone());
    form.submit().await;

    let expected: coach::api::DecisionOutput =
        serde_json::from_value(sample_output()).unwrap();
    match form.status() {
        SubmitStatus::Success(output) => assert_eq!(output, &expected),
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Success also lands in history.
    let entries = history.load().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].recommendation, Recommendation::A);
    assert_eq!(entries[0].summary, "x");
}

#[tokio::test]
async fn bare_output_body_is_accepted() {
    let (endpoint, _) = spawn_mock(StatusCode::OK, sample_output().to_string()).await;

    let mut form = filled_form(endpoint, Arc::new(MemoryHistoryStore::new(5)));
    form.submit().await;

    match form.status() {
        SubmitStatus::Success(output) => {
            assert_eq!(output.recommendation, Recommendation::A)
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_message_is_surfaced_verbatim() {
    let (endpoint, _) =
        spawn_mock(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}).to_string()).await;

    let mut form = filled_form(endpoint, Arc::new(MemoryHistoryStore::new(5)));
    form.submit().await;

    match form.status() {
        SubmitStatus::Failed(ErrorKind::Server, msg) => assert_eq!(msg, "boom"),
        other => panic!("expected server failure, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_malformed_response() {
    let (endpoint, _) = spawn_mock(StatusCode::OK, "not json".to_string()).await;

    let mut form = filled_form(endpoint, Arc::new(MemoryHistoryStore::new(5)));
    form.submit().await;

    match form.status() {
        SubmitStatus::Failed(ErrorKind::MalformedResponse, msg) => {
            assert!(msg.contains("not json"), "snippet should carry the raw body: {msg}")
        }
        other => panic!("expected malformed-response failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_surfaces_a_connectivity_hint() {
    // Bind then drop so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut form = filled_form(
        format!("http://{addr}/decide"),
        Arc::new(MemoryHistoryStore::new(5)),
    );
    form.submit().await;

    match form.status() {
        SubmitStatus::Failed(ErrorKind::Network, msg) => {
            assert!(msg.contains("CORS"), "expected a CORS/connectivity hint: {msg}");
            assert!(msg.contains("decision service"));
        }
        other => panic!("expected network failure, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_submission_records_no_history() {
    let (endpoint, _) =
        spawn_mock(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}).to_string()).await;

    let history = Arc::new(MemoryHistoryStore::new(5));
    let mut form = filled_form(endpoint, history.clone());
    form.submit().await;

    assert!(history.load().await.unwrap().is_empty());
}
