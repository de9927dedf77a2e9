use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveTime;

use helpmate_db::Database;
use helpmate_db::models::TimeSlotRow;
use helpmate_types::api::{StatusMessage, TimeSlotRequest, TimeSlotResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, CurrentUser};
use crate::state::{AppState, run_db};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const STORED_TIME_FORMAT: &str = "%H:%M:%S";

/// A request after validation, in stored form.
#[derive(Debug, PartialEq, Eq)]
struct SlotFields {
    day_of_week: &'static str,
    start_time: String,
    end_time: String,
}

/// POST /time_slots
pub async fn create_time_slot(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<TimeSlotRequest>,
) -> ApiResult<impl IntoResponse> {
    let fields = parse_slot(&req)?;

    let row = run_db(&state, move |db| {
        Ok(db.create_time_slot(user.id, fields.day_of_week, &fields.start_time, &fields.end_time)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(to_response(row))))
}

/// GET /time_slots
pub async fn list_time_slots(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<TimeSlotResponse>>> {
    let rows = run_db(&state, move |db| Ok(db.list_time_slots(user.id)?)).await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

/// PUT /time_slots/{slot_id}
pub async fn update_time_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    user: CurrentUser,
    AppJson(req): AppJson<TimeSlotRequest>,
) -> ApiResult<Json<TimeSlotResponse>> {
    let fields = parse_slot(&req)?;

    let row = run_db(&state, move |db| {
        let slot = owned_slot(db, slot_id, user.id)?;
        db.update_time_slot(slot.id, fields.day_of_week, &fields.start_time, &fields.end_time)?;
        Ok(TimeSlotRow {
            day_of_week: fields.day_of_week.to_string(),
            start_time: fields.start_time,
            end_time: fields.end_time,
            ..slot
        })
    })
    .await?;

    Ok(Json(to_response(row)))
}

/// DELETE /time_slots/{slot_id}
pub async fn delete_time_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    user: CurrentUser,
) -> ApiResult<Json<StatusMessage>> {
    run_db(&state, move |db| {
        let slot = owned_slot(db, slot_id, user.id)?;
        db.delete_time_slot(slot.id)?;
        Ok(())
    })
    .await?;

    Ok(Json(StatusMessage::new("Time slot deleted successfully")))
}

/// 404 when the slot is missing, 403 when someone else owns it.
fn owned_slot(db: &Database, slot_id: i64, user_id: i64) -> ApiResult<TimeSlotRow> {
    let slot = db
        .get_time_slot(slot_id)?
        .ok_or_else(|| ApiError::NotFound("Time slot not found".into()))?;

    if slot.user_id != user_id {
        return Err(ApiError::Forbidden(
            "You do not have permission to modify this time slot".into(),
        ));
    }
    Ok(slot)
}

fn parse_slot(req: &TimeSlotRequest) -> ApiResult<SlotFields> {
    let day_of_week = parse_weekday(&req.day_of_week)?;
    let start = parse_time(&req.start_time, "start_time")?;
    let end = parse_time(&req.end_time, "end_time")?;

    if start >= end {
        return Err(ApiError::Validation(
            "start_time must be before end_time".into(),
        ));
    }

    Ok(SlotFields {
        day_of_week,
        start_time: start.format(STORED_TIME_FORMAT).to_string(),
        end_time: end.format(STORED_TIME_FORMAT).to_string(),
    })
}

fn parse_weekday(raw: &str) -> ApiResult<&'static str> {
    let raw = raw.trim();
    WEEKDAYS
        .iter()
        .copied()
        .find(|day| day.eq_ignore_ascii_case(raw))
        .ok_or_else(|| ApiError::Validation(format!("Invalid day_of_week '{}'", raw)))
}

/// Accepts `HH:MM` or `HH:MM:SS`.
fn parse_time(raw: &str, field: &str) -> ApiResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, STORED_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| ApiError::Validation(format!("Invalid {} '{}', expected HH:MM", field, raw)))
}

fn to_response(row: TimeSlotRow) -> TimeSlotResponse {
    TimeSlotResponse {
        id: row.id,
        user_id: row.user_id,
        day_of_week: row.day_of_week,
        start_time: row.start_time,
        end_time: row.end_time,
    }
}
