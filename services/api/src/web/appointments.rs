//! services/api/src/web/appointments.rs
//!
//! Handlers for booking and moving appointments through their lifecycle.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use booking_core::{Actor, AppointmentStatus};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::dto::{
    appointment_list, parse_date, AppointmentDetailResponse, AppointmentResponse,
};
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; only the date is kept.
    pub appointment_date: String,
    /// A slot label such as `"10:00 AM"`.
    pub time_slot: String,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, CONFIRMED, COMPLETED or CANCELLED.
    pub status: String,
}

/// POST /appointments/book
#[utoipa::path(
    post,
    path = "/api/appointments/book",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Doctor unavailable or invalid slot"),
        (status = 404, description = "Doctor not found"),
        (status = 409, description = "Slot already booked")
    ),
    security(("bearer_auth" = [])),
    tag = "appointments"
)]
pub async fn book_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(req): ApiJson<BookAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date(&req.appointment_date)?;
    let appointment = state
        .appointments
        .book(actor.user_id, req.doctor_id, date, &req.time_slot)
        .await?;
    Ok((StatusCode::CREATED, Json(AppointmentResponse::from(appointment))))
}

/// GET /appointments/user and GET /user/appointments
#[utoipa::path(
    get,
    path = "/api/appointments/user",
    responses((status = 200, description = "The caller's appointments as patient, newest first", body = [AppointmentDetailResponse])),
    security(("bearer_auth" = [])),
    tag = "appointments"
)]
pub async fn my_appointments_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<AppointmentDetailResponse>>, ApiError> {
    let appointments = state.appointments.for_patient(actor.user_id).await?;
    Ok(Json(appointment_list(appointments)))
}

/// PUT /appointments/{id}/cancel
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/cancel",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 400, description = "Already cancelled or completed, or malformed body"),
        (status = 403, description = "Not the caller's appointment"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "appointments"
)]
pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<ApiJson<CancelAppointmentRequest>>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let ApiJson(req) = body.unwrap_or(ApiJson(CancelAppointmentRequest::default()));
    let appointment = state.appointments.cancel(&actor, id, req.reason).await?;
    Ok(Json(appointment.into()))
}

/// PUT /appointments/{id}/complete
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/complete",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentResponse),
        (status = 403, description = "Not the caller's appointment"),
        (status = 409, description = "Slot was rebooked after cancellation")
    ),
    security(("bearer_auth" = [])),
    tag = "appointments"
)]
pub async fn complete_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let appointment = state.appointments.complete(actor.user_id, id).await?;
    Ok(Json(appointment.into()))
}

/// PUT /appointments/{id}/status - Doctor override of the status
#[utoipa::path(
    put,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AppointmentResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not the caller's appointment"),
        (status = 409, description = "Slot was rebooked after cancellation")
    ),
    security(("bearer_auth" = [])),
    tag = "appointments"
)]
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let status: AppointmentStatus = req.status.parse()?;
    let appointment = state
        .appointments
        .update_status(actor.user_id, id, status)
        .await?;
    Ok(Json(appointment.into()))
}
