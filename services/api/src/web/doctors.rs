//! services/api/src/web/doctors.rs
//!
//! Handlers for the public doctor directory and the doctor's own workspace.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use booking_core::{Actor, DoctorUpdate, NewDoctor, NewUser, Role, Speciality};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::auth::{hash_password, validate_credentials};
use crate::web::dto::{
    appointment_list, doctor_list, parse_date, AppointmentDetailResponse, DashboardResponse,
    DoctorResponse, SlotResponse,
};
use crate::web::extract::{ApiJson, ApiPath, ApiQuery};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorListQuery {
    /// A speciality tag, or `all` for no filter.
    pub speciality: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotQuery {
    /// `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
}

/// Account and practice details for a new doctor. Shared by self-registration
/// and admin creation.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    #[serde(default)]
    pub about: String,
    pub fees: f64,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
}

impl DoctorSignupRequest {
    /// Validates the request and hashes the password.
    pub fn into_records(self) -> Result<(NewUser, NewDoctor), ApiError> {
        validate_credentials(&self.email, &self.password)?;
        let speciality: Speciality = self.speciality.parse()?;
        let hashed_password = hash_password(&self.password)?;

        Ok((
            NewUser {
                email: self.email.trim().to_lowercase(),
                hashed_password,
                name: self.name,
                role: Role::Doctor,
                phone: self.phone,
                image: self.image,
            },
            NewDoctor {
                speciality,
                degree: self.degree,
                experience: self.experience,
                about: self.about,
                fees: self.fees,
                address_line1: self.address_line1,
                address_line2: self.address_line2,
                available: true,
                approved: false,
            },
        ))
    }
}

/// The fields a doctor may change on their own listing.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfileUpdateRequest {
    pub about: Option<String>,
    pub fees: Option<f64>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub available: Option<bool>,
}

impl From<DoctorProfileUpdateRequest> for DoctorUpdate {
    fn from(req: DoctorProfileUpdateRequest) -> Self {
        DoctorUpdate {
            about: req.about,
            fees: req.fees,
            address_line1: req.address_line1,
            address_line2: req.address_line2,
            available: req.available,
            ..Default::default()
        }
    }
}

fn speciality_filter(raw: Option<&str>) -> Result<Option<Speciality>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(tag) => Ok(Some(tag.parse()?)),
    }
}

//=========================================================================================
// Public Directory
//=========================================================================================

/// GET /doctors - Approved, available doctors
#[utoipa::path(
    get,
    path = "/api/doctors",
    params(DoctorListQuery),
    responses(
        (status = 200, description = "Doctor listing, newest first", body = [DoctorResponse]),
        (status = 400, description = "Unknown speciality")
    ),
    tag = "doctors"
)]
pub async fn list_doctors_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<DoctorListQuery>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let speciality = speciality_filter(query.speciality.as_deref())?;
    let doctors = state.directory.list_public(speciality).await?;
    Ok(Json(doctor_list(doctors)))
}

/// GET /doctors/speciality/{speciality}
#[utoipa::path(
    get,
    path = "/api/doctors/speciality/{speciality}",
    params(("speciality" = String, Path, description = "Speciality tag, e.g. General_physician")),
    responses(
        (status = 200, description = "Doctors of one speciality", body = [DoctorResponse]),
        (status = 400, description = "Unknown speciality")
    ),
    tag = "doctors"
)]
pub async fn doctors_by_speciality_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(speciality): ApiPath<String>,
) -> Result<Json<Vec<DoctorResponse>>, ApiError> {
    let speciality: Speciality = speciality.parse()?;
    let doctors = state.directory.list_public(Some(speciality)).await?;
    Ok(Json(doctor_list(doctors)))
}

/// GET /doctors/{id}
#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor found", body = DoctorResponse),
        (status = 404, description = "Doctor not found")
    ),
    tag = "doctors"
)]
pub async fn get_doctor_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let doctor = state.directory.find(id).await?;
    Ok(Json(doctor.into()))
}

/// GET /doctors/{id}/slots - Open half-hour slots on a day
#[utoipa::path(
    get,
    path = "/api/doctors/{id}/slots",
    params(("id" = Uuid, Path, description = "Doctor id"), SlotQuery),
    responses(
        (status = 200, description = "Open slots in time order", body = [SlotResponse]),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Doctor not found")
    ),
    tag = "doctors"
)]
pub async fn doctor_slots_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<SlotQuery>,
) -> Result<Json<Vec<SlotResponse>>, ApiError> {
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let slots = state
        .directory
        .available_slots(id, date, Local::now().naive_local())
        .await?;
    Ok(Json(slots.into_iter().map(SlotResponse::from).collect()))
}

/// POST /doctors/register - Doctor self-registration (pending approval)
#[utoipa::path(
    post,
    path = "/api/doctors/register",
    request_body = DoctorSignupRequest,
    responses(
        (status = 201, description = "Doctor registered, awaiting approval", body = DoctorResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already exists")
    ),
    tag = "doctors"
)]
pub async fn register_doctor_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DoctorSignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, doctor) = req.into_records()?;
    let profile = state.directory.register(user, doctor).await?;
    Ok((StatusCode::CREATED, Json(DoctorResponse::from(profile))))
}

//=========================================================================================
// Doctor Workspace (role DOCTOR)
//=========================================================================================

/// GET /doctors/profile
#[utoipa::path(
    get,
    path = "/api/doctors/profile",
    responses(
        (status = 200, description = "The caller's doctor record", body = DoctorResponse),
        (status = 404, description = "Doctor profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "doctors"
)]
pub async fn my_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let profile = state.directory.profile(actor.user_id).await?;
    Ok(Json(profile.into()))
}

/// PUT /doctors/profile
#[utoipa::path(
    put,
    path = "/api/doctors/profile",
    request_body = DoctorProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = DoctorResponse),
        (status = 400, description = "Invalid fee")
    ),
    security(("bearer_auth" = [])),
    tag = "doctors"
)]
pub async fn update_my_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    ApiJson(req): ApiJson<DoctorProfileUpdateRequest>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let profile = state
        .directory
        .update_profile(actor.user_id, req.into())
        .await?;
    Ok(Json(profile.into()))
}

/// GET /doctors/dashboard
#[utoipa::path(
    get,
    path = "/api/doctors/dashboard",
    responses((status = 200, description = "Counts, earnings and latest appointments", body = DashboardResponse)),
    security(("bearer_auth" = [])),
    tag = "doctors"
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = state.directory.dashboard(actor.user_id).await?;
    Ok(Json(dashboard.into()))
}

/// GET /doctors/my/appointments
#[utoipa::path(
    get,
    path = "/api/doctors/my/appointments",
    responses((status = 200, description = "Appointments booked with the caller", body = [AppointmentDetailResponse])),
    security(("bearer_auth" = [])),
    tag = "doctors"
)]
pub async fn my_doctor_appointments_handler(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<AppointmentDetailResponse>>, ApiError> {
    let appointments = state.appointments.for_doctor_user(actor.user_id).await?;
    Ok(Json(appointment_list(appointments)))
}
