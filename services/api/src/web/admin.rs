//! services/api/src/web/admin.rs
//!
//! Admin panel handlers: rollups, paginated listings and doctor management.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use booking_core::{AppointmentStatus, DoctorUpdate, PageRequest, Role, Speciality};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::doctors::DoctorSignupRequest;
use crate::web::dto::{
    doctor_list, AdminStatsResponse, AppointmentResponse, AppointmentsPageResponse,
    DoctorResponse, MessageResponse, UsersPageResponse,
};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// PATIENT, DOCTOR or ADMIN.
    pub role: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// PENDING, CONFIRMED, COMPLETED or CANCELLED.
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorIdRequest {
    pub doc_id: Uuid,
}

/// Any doctor field, including the approval flag.
#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminDoctorUpdateRequest {
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<f64>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub available: Option<bool>,
    pub is_approved: Option<bool>,
}

impl AdminDoctorUpdateRequest {
    fn into_update(self) -> Result<DoctorUpdate, ApiError> {
        let speciality = self
            .speciality
            .as_deref()
            .map(str::parse::<Speciality>)
            .transpose()?;
        Ok(DoctorUpdate {
            speciality,
            degree: self.degree,
            experience: self.experience,
            about: self.about,
            fees: self.fees,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            available: self.available,
            approved: self.is_approved,
        })
    }
}

//=========================================================================================
// Rollups and Listings
//=========================================================================================

/// GET /admin/stats
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses((status = 200, description = "Platform totals", body = AdminStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let stats = state.admin.stats().await?;
    Ok(Json(stats.into()))
}

/// GET /admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses((status = 200, description = "One page of users, newest first", body = UsersPageResponse)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn users_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<UsersPageResponse>, ApiError> {
    let role = query.role.as_deref().map(str::parse::<Role>).transpose()?;
    let page = state
        .admin
        .users(role, PageRequest::new(query.page, query.limit))
        .await?;
    Ok(Json(page.into()))
}

/// GET /admin/appointments
#[utoipa::path(
    get,
    path = "/api/admin/appointments",
    params(AppointmentListQuery),
    responses((status = 200, description = "One page of appointments, newest first", body = AppointmentsPageResponse)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn appointments_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<AppointmentListQuery>,
) -> Result<Json<AppointmentsPageResponse>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<AppointmentStatus>)
        .transpose()?;
    let page = state
        .admin
        .appointments(status, PageRequest::new(query.page, query.limit))
        .await?;
    Ok(Json(page.into()))
}

/// GET /admin/all-doctors - Every doctor, approved or not
#[utoipa::path(
    get,
    path = "/api/admin/all-doctors",
    responses((status = 200, description = "All doctors, newest first", body = [DoctorResponse])),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn all_doctors_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let doctors = state.directory.list_all().await?;
    Ok(Json(doctor_list(doctors)))
}

//=========================================================================================
// Doctor Management
//=========================================================================================

/// POST /admin/add-doctor - Create an approved doctor
#[utoipa::path(
    post,
    path = "/api/admin/add-doctor",
    request_body = DoctorSignupRequest,
    responses(
        (status = 201, description = "Doctor created", body = DoctorResponse),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn add_doctor_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DoctorSignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, doctor) = req.into_records()?;
    let profile = state.directory.add(user, doctor).await?;
    Ok((StatusCode::CREATED, Json(DoctorResponse::from(profile))))
}

/// POST /admin/change-approval - Flip a doctor's approval flag
#[utoipa::path(
    post,
    path = "/api/admin/change-approval",
    request_body = DoctorIdRequest,
    responses(
        (status = 200, description = "Approval toggled", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn change_approval_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DoctorIdRequest>,
) -> Result<Json<DoctorResponse>, ApiError> {
    state.directory.toggle_approval(req.doc_id).await?;
    let profile = state.directory.find(req.doc_id).await?;
    Ok(Json(profile.into()))
}

/// PUT /admin/doctors/{id}
#[utoipa::path(
    put,
    path = "/api/admin/doctors/{id}",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = AdminDoctorUpdateRequest,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_doctor_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AdminDoctorUpdateRequest>,
) -> Result<Json<DoctorResponse>, ApiError> {
    state.directory.admin_update(id, req.into_update()?).await?;
    let profile = state.directory.find(id).await?;
    Ok(Json(profile.into()))
}

/// POST /admin/delete-doctor - Remove a doctor and its account
#[utoipa::path(
    post,
    path = "/api/admin/delete-doctor",
    request_body = DoctorIdRequest,
    responses(
        (status = 200, description = "Doctor deleted", body = MessageResponse),
        (status = 404, description = "Doctor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_doctor_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DoctorIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.directory.delete(req.doc_id).await?;
    Ok(Json(MessageResponse::ok("Doctor deleted successfully")))
}

//=========================================================================================
// Appointment Management
//=========================================================================================

/// DELETE /admin/appointments/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_appointment_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.appointments.delete(id).await?;
    Ok(Json(MessageResponse::ok("Appointment deleted successfully")))
}

/// POST /admin/appointments/{id}/confirm-payment
#[utoipa::path(
    post,
    path = "/api/admin/appointments/{id}/confirm-payment",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Payment recorded", body = AppointmentResponse),
        (status = 400, description = "Already paid, cancelled or completed")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn confirm_payment_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = state.appointments.confirm_payment(id).await?;
    Ok(Json(appointment.into()))
}
