//! services/api/src/web/users.rs
//!
//! Profile endpoints available to every authenticated role.

use axum::{extract::State, Extension, Json};
use booking_core::{Actor, Gender, ProfileUpdate};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::dto::{parse_date, UserResponse};
use crate::web::extract::ApiJson;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    /// MALE, FEMALE or OTHER.
    pub gender: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_of_birth: Option<String>,
}

impl UpdateProfileRequest {
    fn into_update(self) -> Result<ProfileUpdate, ApiError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ApiError::BadRequest("name must not be empty".to_string()));
            }
        }
        let gender = self
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()?;
        let date_of_birth = self.date_of_birth.as_deref().map(parse_date).transpose()?;

        Ok(ProfileUpdate {
            name: self.name,
            phone: self.phone,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            gender,
            date_of_birth,
        })
    }
}

/// GET /user/profile
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "The caller's account", body = UserResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.db.get_user_by_id(actor.user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /user/profile
#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid field value")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .update_user_profile(actor.user_id, req.into_update()?)
        .await?;
    info!(user_id = %user.id, "Profile updated");
    Ok(Json(user.into()))
}
