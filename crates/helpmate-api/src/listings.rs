use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use helpmate_db::models::JobListingRow;
use helpmate_types::api::{JobListingRequest, JobListingResponse, PageQuery, SearchQuery, StatusMessage};
use helpmate_types::models::PageRequest;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppQuery, CurrentUser};
use crate::state::{AppState, run_db};

/// GET /job_listings?page=&per_page=
pub async fn list_job_listings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<Json<Vec<JobListingResponse>>> {
    let request = PageRequest::new(query.page, query.per_page)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let page = run_db(&state, move |db| Ok(db.list_job_listings(request)?)).await?;

    Ok(Json(page.items.into_iter().map(to_response).collect()))
}

/// POST /job_listings. The caller becomes the employer.
pub async fn create_job_listing(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<JobListingRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    let row = run_db(&state, move |db| {
        Ok(db.create_job_listing(req.title.trim(), req.description.trim(), user.id)?)
    })
    .await?;
    info!(listing_id = row.id, employer_id = row.employer_id, "Job listing created");

    Ok((StatusCode::CREATED, Json(to_response(row))))
}

/// GET /job_listings/{listing_id}
pub async fn get_job_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> ApiResult<Json<JobListingResponse>> {
    let row = run_db(&state, move |db| {
        db.get_job_listing(listing_id)?.ok_or_else(listing_not_found)
    })
    .await?;

    Ok(Json(to_response(row)))
}

/// PUT /job_listings/{listing_id}
pub async fn update_job_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    _user: CurrentUser,
    AppJson(req): AppJson<JobListingRequest>,
) -> ApiResult<Json<StatusMessage>> {
    validate(&req)?;

    run_db(&state, move |db| {
        if db.update_job_listing(listing_id, req.title.trim(), req.description.trim())? {
            Ok(())
        } else {
            Err(listing_not_found())
        }
    })
    .await?;

    Ok(Json(StatusMessage::new("Job listing updated successfully")))
}

/// DELETE /job_listings/{listing_id}
pub async fn delete_job_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    user: CurrentUser,
) -> ApiResult<Json<StatusMessage>> {
    run_db(&state, move |db| {
        if db.delete_job_listing(listing_id)? {
            Ok(())
        } else {
            Err(listing_not_found())
        }
    })
    .await?;
    info!(listing_id, deleted_by = user.id, "Job listing deleted");

    Ok(Json(StatusMessage::new("Job listing deleted successfully")))
}

/// GET /search?keyword=
pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> ApiResult<Json<Vec<JobListingResponse>>> {
    let rows = run_db(&state, move |db| {
        Ok(db.search_job_listings(query.keyword.trim())?)
    })
    .await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

pub(crate) fn to_response(row: JobListingRow) -> JobListingResponse {
    JobListingResponse {
        id: row.id,
        title: row.title,
        description: row.description,
        employer_id: row.employer_id,
    }
}

pub(crate) fn listing_not_found() -> ApiError {
    ApiError::NotFound("Job listing not found".into())
}

fn validate(req: &JobListingRequest) -> ApiResult<()> {
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Title and description are required".into(),
        ));
    }
    Ok(())
}
