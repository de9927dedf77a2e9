use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::{header, request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};

use helpmate_types::api::Claims;

use crate::error::ApiError;
use crate::state::{AppState, run_db};

/// JSON body whose rejections render as `ApiError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Query string whose rejections render as `ApiError::Validation`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// The authenticated caller, taken from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let unauthorized = || ApiError::Unauthorized("Authentication required".into());

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized()
        })?
        .claims;

        // A well-formed token for a user the store no longer has is rejected.
        let user_id = claims.sub;
        let exists = run_db(state, move |db| Ok(db.user_exists(user_id)?)).await?;
        if !exists {
            return Err(unauthorized());
        }

        Ok(CurrentUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}
