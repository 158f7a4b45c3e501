use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{AudioArtifact, ConversationId, FailureKind, PipelineResult};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SttResponse {
    pub text: String,
    #[serde(rename = "chatId")]
    pub chat_id: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct SttQuery {
    #[serde(rename = "chatId")]
    pub chat_id: Option<String>,
}

/// Accepts one multipart voice upload (`voice` or `file` field) plus an
/// optional `chatId` field or query parameter, runs the relay pipeline, and
/// emits exactly one JSON response.
#[tracing::instrument(skip(state, query, multipart))]
pub async fn stt_handler(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(query): Query<SttQuery>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<AudioArtifact> = None;
    let mut chat_id = query.chat_id.map(ConversationId::new);

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read multipart body");
                return failure_response(
                    FailureKind::NoFile,
                    Some(format!("invalid multipart body: {}", e)),
                );
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("voice") | Some("file") if upload.is_none() => {
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(data) => {
                        upload = Some(AudioArtifact::from_bytes(data.to_vec(), media_type));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read file bytes");
                        return failure_response(
                            FailureKind::NoFile,
                            Some(format!("failed to read file: {}", e)),
                        );
                    }
                }
            }
            Some("chatId") if chat_id.is_none() => {
                if let Ok(text) = field.text().await {
                    chat_id = Some(ConversationId::new(text));
                }
            }
            other => {
                tracing::debug!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let Some(upload) = upload else {
        tracing::warn!(source = %source, "stt request without a file field");
        return failure_response(FailureKind::NoFile, None);
    };

    tracing::debug!(
        source = %source,
        bytes = upload.size_bytes(),
        media_type = %upload.media_type(),
        "voice upload received"
    );

    let result = state.relay_service.run(upload).await;
    into_response(result, chat_id)
}

fn into_response(result: PipelineResult, chat_id: Option<ConversationId>) -> Response {
    match result {
        PipelineResult::Recognized(text) => (
            StatusCode::OK,
            Json(SttResponse {
                text,
                chat_id: chat_id.map(ConversationId::into_inner),
            }),
        )
            .into_response(),
        PipelineResult::NoSpeech => (
            StatusCode::OK,
            Json(SttResponse {
                text: String::new(),
                chat_id: chat_id.map(ConversationId::into_inner),
            }),
        )
            .into_response(),
        PipelineResult::Failed { kind, message } => failure_response(kind, message),
    }
}

fn failure_response(kind: FailureKind, message: Option<String>) -> Response {
    let status = if kind == FailureKind::NoFile {
        StatusCode::BAD_REQUEST
    } else if kind.is_timeout() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(ErrorResponse {
            error: kind.as_str().to_string(),
            message,
        }),
    )
        .into_response()
}
