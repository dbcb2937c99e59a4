//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for patient registration and login, plus the
//! password hashing helpers shared with doctor registration and the seed binary.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use booking_core::domain::{NewUser, Role};
use booking_core::ports::PortError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::dto::UserResponse;
use crate::web::extract::ApiJson;
use crate::web::state::AppState;
use crate::web::token::issue_token;

pub const MIN_PASSWORD_LEN: usize = 6;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    /// Only PATIENT may be requested here; doctors use `/doctors/register`.
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

//=========================================================================================
// Password and Credential Helpers
//=========================================================================================

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(hashed).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Shape checks shared by every endpoint that creates an account.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !email_regex().is_match(email) {
        return Err(ApiError::BadRequest("email must be an email".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be longer than or equal to {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new patient account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&req.email, &req.password)?;

    // 1. Only patients self-register through this endpoint.
    if let Some(requested) = req.role.as_deref() {
        let role: Role = requested.parse()?;
        if role != Role::Patient {
            return Err(ApiError::BadRequest(format!(
                "Cannot self-register with role {}",
                role
            )));
        }
    }

    // 2. Hash the password and create the account
    let hashed_password = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(NewUser {
            email: req.email.trim().to_lowercase(),
            hashed_password,
            name: req.name,
            role: Role::Patient,
            phone: req.phone,
            image: None,
        })
        .await?;

    // 3. Issue a token
    let token = issue_token(&state.config, &user)?;
    info!(user_id = %user.id, "Patient registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    // 1. Get user by email
    let creds = match state.db.get_user_by_email(&req.email.trim().to_lowercase()).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => return Err(invalid()),
        Err(e) => return Err(e.into()),
    };

    // 2. Verify password and account status
    if !verify_password(&req.password, &creds.hashed_password)? {
        warn!(user_id = %creds.user.id, "Rejected login with wrong password");
        return Err(invalid());
    }
    if !creds.user.is_active {
        return Err(invalid());
    }

    // 3. Issue a token
    let token = issue_token(&state.config, &creds.user)?;
    Ok(Json(AuthResponse {
        user: creds.user.into(),
        token,
    }))
}
