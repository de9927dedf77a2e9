use axum::{Json, extract::State};
use tracing::info;

use helpmate_db::models::ProfileUpdate;
use helpmate_types::api::{PageQuery, StatusMessage, UpdateProfileRequest, UserProfile, UserSummary};
use helpmate_types::models::PageRequest;

use crate::auth::{hash_password, validate_password};
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppQuery, CurrentUser};
use crate::state::{AppState, run_db};

/// GET /users?page=&per_page=
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let request = PageRequest::new(query.page, query.per_page)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let page = run_db(&state, move |db| Ok(db.list_users(request)?)).await?;

    Ok(Json(
        page.items
            .into_iter()
            .map(|u| UserSummary {
                id: u.id,
                username: u.username,
                email: u.email,
            })
            .collect(),
    ))
}

/// GET /profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<UserProfile>> {
    let row = run_db(&state, move |db| {
        db.get_user_by_id(user.id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))
    })
    .await?;

    Ok(Json(UserProfile {
        id: row.id,
        user_type: row.user_type,
        username: row.username,
        email: row.email,
        skills: row.skills,
        experience: row.experience,
        company_name: row.company_name,
        company_description: row.company_description,
        company_website: row.company_website,
    }))
}

/// PUT /update_profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<Json<StatusMessage>> {
    if let Some(password) = &req.password {
        validate_password(password)?;
    }

    run_db(&state, move |db| {
        let current = db
            .get_user_by_id(user.id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

        let password = req.password.as_deref().map(hash_password).transpose()?;
        let update = ProfileUpdate {
            skills: req.skills.or(current.skills),
            experience: req.experience.or(current.experience),
            company_name: req.company_name.or(current.company_name),
            company_description: req.company_description.or(current.company_description),
            company_website: req.company_website.or(current.company_website),
            password,
        };

        db.update_profile(user.id, &update)?;
        info!(user_id = user.id, "Profile updated");
        Ok(())
    })
    .await?;

    Ok(Json(StatusMessage::new("User profile updated successfully")))
}
