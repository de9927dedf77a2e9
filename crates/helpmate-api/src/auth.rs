use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand_core::OsRng;
use tracing::info;

use helpmate_db::models::NewUser;
use helpmate_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use helpmate_types::models::UserType;

use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::state::{AppState, run_db};

pub const MIN_PASSWORD_LEN: usize = 8;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=80;

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_type: UserType = required(&req.user_type, "user_type")?
        .parse()
        .map_err(|e| ApiError::Validation(format!("{}", e)))?;
    let username = required(&req.username, "username")?.to_string();
    let email = required(&req.email, "email")?.to_string();
    let password = required(&req.password, "password")?.to_string();

    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(ApiError::Validation(
            "Username must be between 3 and 80 characters".into(),
        ));
    }
    validate_password(&password)?;

    let token_username = username.clone();
    let user_id = run_db(&state, move |db| {
        if db.get_user_by_email(&email)?.is_some() {
            return Err(ApiError::Conflict("User with this email already exists".into()));
        }
        if db.get_user_by_username(&username)?.is_some() {
            return Err(ApiError::Conflict("Username is already taken".into()));
        }

        let password_hash = hash_password(&password)?;
        let id = db.create_user(&NewUser {
            user_type,
            username: &username,
            email: &email,
            password: &password_hash,
            skills: req.skills.as_deref(),
            experience: req.experience.as_deref(),
            company_name: req.company_name.as_deref(),
            company_description: req.company_description.as_deref(),
            company_website: req.company_website.as_deref(),
        })?;
        info!(user_id = id, user_type = %user_type, "User registered");
        Ok(id)
    })
    .await?;

    let token = create_token(&state, user_id, &token_username)?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id, token })))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".into());

    let user = run_db(&state, move |db| {
        let user = db.get_user_by_email(req.email.trim())?.ok_or_else(invalid)?;
        if !verify_password(&req.password, &user.password)? {
            return Err(invalid());
        }
        Ok(user)
    })
    .await?;

    let token = create_token(&state, user.id, &user.username)?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        token,
    }))
}

/// Argon2id PHC string for storage.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// False on mismatch; errors only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is corrupt: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn create_token(state: &AppState, user_id: i64, username: &str) -> ApiResult<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + state.token_ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {}", e)))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing required field: {}", field)))
}
