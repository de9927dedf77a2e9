use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use helpmate_db::models::MessageRow;
use helpmate_db::parse_timestamp;
use helpmate_types::api::{
    ConversationResponse, MessageResponse, PageQuery, SendMessageRequest, SendMessageResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppQuery, CurrentUser};
use crate::messaging;
use crate::state::{AppState, run_db};

/// POST /send_message
pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let row = run_db(&state, move |db| {
        Ok(messaging::send_message(
            db,
            user.id,
            req.recipient_id,
            req.content.as_deref(),
        )?)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: to_response(row),
        }),
    ))
}

/// GET /conversation/{user2_id}?page=&per_page=
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(user2_id): Path<i64>,
    user: CurrentUser,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<Json<ConversationResponse>> {
    if user2_id <= 0 {
        return Err(ApiError::Validation("Missing recipient ID".into()));
    }

    let page = run_db(&state, move |db| {
        Ok(messaging::get_conversation(
            db,
            user.id,
            user2_id,
            query.page,
            query.per_page,
        )?)
    })
    .await?;

    Ok(Json(page.map(to_response).into()))
}

fn to_response(row: MessageRow) -> MessageResponse {
    let timestamp = parse_timestamp(&row.timestamp).unwrap_or_else(|| {
        warn!("Corrupt timestamp '{}' on message '{}'", row.timestamp, row.id);
        chrono::DateTime::default()
    });

    MessageResponse {
        id: row.id,
        sender_id: row.sender_id,
        recipient_id: row.recipient_id,
        content: row.content,
        timestamp,
    }
}
