//! services/api/src/web/middleware.rs
//!
//! Authentication and role middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use booking_core::{Actor, PortError, Role};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::token::verify_token;

/// Middleware that validates the bearer token and loads the caller.
///
/// The user is re-read from the store so a deactivated account or a changed
/// role takes effect immediately. On success an [`Actor`] is inserted into the
/// request extensions; otherwise the request is rejected with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthorized = |msg: &str| ApiError::Unauthorized(msg.to_string());

    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("No token provided"))?;

    // 2. Verify signature and expiry
    let claims = verify_token(&state.config, token)?;

    // 3. Load the user behind the token
    let user = match state.db.get_user_by_id(claims.sub).await {
        Ok(user) => user,
        Err(PortError::NotFound(_)) => return Err(unauthorized("User no longer exists")),
        Err(e) => {
            error!("Failed to load user for token: {:?}", e);
            return Err(e.into());
        }
    };
    if !user.is_active {
        warn!(user_id = %user.id, "Rejected token for inactive user");
        return Err(unauthorized("Account is deactivated"));
    }

    // 4. Insert the actor into request extensions
    req.extensions_mut().insert(Actor::new(user.id, user.role));

    // 5. Continue to the handler
    Ok(next.run(req).await)
}

async fn guard(req: Request, next: Next, allowed: &[Role]) -> Result<Response, ApiError> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;
    actor.require_role(allowed)?;
    Ok(next.run(req).await)
}

pub async fn require_patient(req: Request, next: Next) -> Result<Response, ApiError> {
    guard(req, next, &[Role::Patient]).await
}

pub async fn require_doctor(req: Request, next: Next) -> Result<Response, ApiError> {
    guard(req, next, &[Role::Doctor]).await
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    guard(req, next, &[Role::Admin]).await
}
