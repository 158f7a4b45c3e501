use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use voxrelay::application::ports::{RecognitionError, SpeechRecognizer};
use voxrelay::domain::AudioArtifact;
use voxrelay::infrastructure::speech::SonioxRecognizer;

struct MockSonioxState {
    uploads: AtomicUsize,
    polls: AtomicUsize,
    deletes: AtomicUsize,
    fail_upload: AtomicBool,
    /// Status returned by each successive poll; the last entry repeats.
    statuses: Mutex<Vec<&'static str>>,
}

impl MockSonioxState {
    fn new(statuses: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            uploads: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_upload: AtomicBool::new(false),
            statuses: Mutex::new(statuses),
        })
    }

    fn next_status(&self) -> &'static str {
        let index = self.polls.fetch_add(1, Ordering::SeqCst);
        let statuses = self.statuses.lock().unwrap();
        statuses
            .get(index)
            .copied()
            .unwrap_or_else(|| statuses.last().copied().unwrap_or("queued"))
    }
}

async fn upload_handler(State(state): State<Arc<MockSonioxState>>) -> impl IntoResponse {
    state.uploads.fetch_add(1, Ordering::SeqCst);
    if state.fail_upload.load(Ordering::SeqCst) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "storage unavailable"})),
        );
    }
    (
        axum::http::StatusCode::OK,
        Json(json!({"id": "file-123"})),
    )
}

async fn create_transcription_handler() -> impl IntoResponse {
    Json(json!({"id": "job-456", "status": "queued"}))
}

async fn status_handler(State(state): State<Arc<MockSonioxState>>) -> impl IntoResponse {
    let status = state.next_status();
    if status == "error" {
        return Json(json!({
            "id": "job-456",
            "status": "error",
            "error_message": "audio could not be decoded",
        }));
    }
    Json(json!({"id": "job-456", "status": status}))
}

async fn transcript_handler() -> impl IntoResponse {
    Json(json!({"id": "job-456", "text": "  שלום עולם  "}))
}

async fn delete_handler(State(state): State<Arc<MockSonioxState>>) -> impl IntoResponse {
    state.deletes.fetch_add(1, Ordering::SeqCst);
    axum::http::StatusCode::OK
}

async fn start_mock_soniox_server(
    state: Arc<MockSonioxState>,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route("/v1/files", post(upload_handler))
        .route("/v1/files/{id}", delete(delete_handler))
        .route("/v1/transcriptions", post(create_transcription_handler))
        .route("/v1/transcriptions/{id}", get(status_handler))
        .route("/v1/transcriptions/{id}/transcript", get(transcript_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn recognizer(base_url: &str, max_poll_attempts: u32) -> SonioxRecognizer {
    SonioxRecognizer::new(
        base_url,
        "test-key",
        "stt-async-v4",
        "he",
        Duration::from_secs(5),
        Duration::from_millis(10),
        max_poll_attempts,
    )
}

fn wav_artifact() -> AudioArtifact {
    AudioArtifact::from_bytes(b"fake wav bytes".to_vec(), "audio/wav")
}

#[tokio::test]
async fn given_completed_job_when_recognizing_then_returns_trimmed_transcript() {
    let state = MockSonioxState::new(vec!["processing", "completed"]);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let result = recognizer(&base_url, 10).recognize(&wav_artifact()).await;

    assert_eq!(result.unwrap(), "שלום עולם");
    assert_eq!(state.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(state.polls.load(Ordering::SeqCst), 2);
    assert_eq!(state.deletes.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_job_error_when_recognizing_then_stops_polling_and_deletes_upload() {
    let state = MockSonioxState::new(vec!["processing", "error"]);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let result = recognizer(&base_url, 10).recognize(&wav_artifact()).await;

    match result {
        Err(RecognitionError::Provider(message)) => {
            assert!(message.contains("audio could not be decoded"));
        }
        other => panic!("expected Provider error, got {:?}", other),
    }
    assert_eq!(state.polls.load(Ordering::SeqCst), 2);
    assert_eq!(state.deletes.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_job_never_completing_when_recognizing_then_times_out_after_bounded_polls() {
    let state = MockSonioxState::new(vec!["processing"]);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let result = recognizer(&base_url, 3).recognize(&wav_artifact()).await;

    assert!(matches!(result, Err(RecognitionError::Timeout(_))));
    assert_eq!(state.polls.load(Ordering::SeqCst), 3);
    assert_eq!(state.deletes.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_api_key_when_recognizing_then_fails_before_any_request() {
    let state = MockSonioxState::new(vec!["completed"]);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let recognizer = SonioxRecognizer::new(
        &base_url,
        "",
        "stt-async-v4",
        "he",
        Duration::from_secs(5),
        Duration::from_millis(10),
        10,
    );

    let result = recognizer.recognize(&wav_artifact()).await;

    assert!(matches!(result, Err(RecognitionError::MissingConfig(_))));
    assert_eq!(state.uploads.load(Ordering::SeqCst), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unresponsive_provider_when_recognizing_then_request_timeout_bounds_the_call() {
    use tokio::io::AsyncReadExt;

    // Accepts connections and reads forever without ever writing a response.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    let recognizer = SonioxRecognizer::new(
        &base_url,
        "test-key",
        "stt-async-v4",
        "he",
        Duration::from_millis(200),
        Duration::from_millis(10),
        3,
    );

    let started = std::time::Instant::now();
    let result = recognizer.recognize(&wav_artifact()).await;

    assert!(matches!(result, Err(RecognitionError::Timeout(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn given_poll_budget_exhausted_when_timing_out_then_final_attempt_skips_the_sleep() {
    let state = MockSonioxState::new(vec!["processing"]);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let recognizer = SonioxRecognizer::new(
        &base_url,
        "test-key",
        "stt-async-v4",
        "he",
        Duration::from_secs(5),
        Duration::from_millis(200),
        3,
    );

    let started = std::time::Instant::now();
    let result = recognizer.recognize(&wav_artifact()).await;

    assert!(matches!(result, Err(RecognitionError::Timeout(_))));
    assert_eq!(state.polls.load(Ordering::SeqCst), 3);
    // Three attempts separated by two sleeps, with no sleep after the last.
    assert!(started.elapsed() < Duration::from_millis(550));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_upload_failure_when_recognizing_then_no_delete_is_attempted() {
    let state = MockSonioxState::new(vec!["completed"]);
    state.fail_upload.store(true, Ordering::SeqCst);
    let (base_url, shutdown_tx) = start_mock_soniox_server(Arc::clone(&state)).await;

    let result = recognizer(&base_url, 10).recognize(&wav_artifact()).await;

    assert!(matches!(result, Err(RecognitionError::Provider(_))));
    assert_eq!(state.deletes.load(Ordering::SeqCst), 0);
    shutdown_tx.send(()).ok();
}
