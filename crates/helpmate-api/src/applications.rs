use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};

use helpmate_db::models::JobApplicationRow;
use helpmate_db::{DbError, parse_timestamp};
use helpmate_types::api::{ApplyRequest, JobApplicationResponse, JobListingResponse, StatusMessage};

use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, CurrentUser};
use crate::listings::{listing_not_found, to_response as listing_response};
use crate::state::{AppState, run_db};

// -- Applications --

/// POST /job_listings/{listing_id}/apply
pub async fn apply_for_job(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
    AppJson(req): AppJson<ApplyRequest>,
) -> ApiResult<impl IntoResponse> {
    let row = run_db(&state, move |db| {
        if db.get_job_listing(listing_id)?.is_none() {
            return Err(listing_not_found());
        }

        let cover_letter = req.cover_letter.as_deref().map(str::trim).filter(|c| !c.is_empty());
        db.create_application(user.id, listing_id, cover_letter, Utc::now())
            .map_err(|e| match e {
                DbError::Conflict(_) => {
                    ApiError::Conflict("You have already applied for this job".into())
                }
                other => other.into(),
            })
    })
    .await?;
    info!(application_id = row.id, listing_id, job_seeker_id = row.job_seeker_id, "Application submitted");

    Ok((StatusCode::CREATED, Json(application_response(row))))
}

/// GET /job_applications
pub async fn get_job_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<JobApplicationResponse>>> {
    let rows = run_db(&state, move |db| Ok(db.get_applications_for_seeker(user.id)?)).await?;

    Ok(Json(rows.into_iter().map(application_response).collect()))
}

fn application_response(row: JobApplicationRow) -> JobApplicationResponse {
    let application_date = parse_timestamp(&row.application_date).unwrap_or_else(|| {
        warn!("Corrupt application_date '{}' on application '{}'", row.application_date, row.id);
        chrono::DateTime::default()
    });

    JobApplicationResponse {
        id: row.id,
        job_listing_id: row.job_listing_id,
        job_seeker_id: row.job_seeker_id,
        cover_letter: row.cover_letter,
        application_date,
    }
}

// -- Saved jobs --

/// POST /save_job/{listing_id}
pub async fn save_job(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> ApiResult<Json<StatusMessage>> {
    run_db(&state, move |db| {
        if db.get_job_listing(listing_id)?.is_none() {
            return Err(listing_not_found());
        }

        db.save_job(user.id, listing_id, Utc::now()).map_err(|e| match e {
            DbError::Conflict(_) => ApiError::Conflict("Job already saved".into()),
            other => other.into(),
        })
    })
    .await?;

    Ok(Json(StatusMessage::new("Job saved successfully")))
}

/// GET /saved_jobs
pub async fn get_saved_jobs(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<JobListingResponse>>> {
    let rows = run_db(&state, move |db| Ok(db.get_saved_listings(user.id)?)).await?;

    Ok(Json(rows.into_iter().map(listing_response).collect()))
}

/// DELETE /unsave_job/{listing_id}
pub async fn unsave_job(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> ApiResult<Json<StatusMessage>> {
    run_db(&state, move |db| {
        if db.unsave_job(user.id, listing_id)? {
            Ok(())
        } else {
            Err(ApiError::NotFound("Job not found in saved jobs".into()))
        }
    })
    .await?;

    Ok(Json(StatusMessage::new("Job removed from saved jobs")))
}
