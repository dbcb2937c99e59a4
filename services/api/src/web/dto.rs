//! services/api/src/web/dto.rs
//!
//! Response payloads shared by the REST handlers. Field names are camelCase on the wire.

use booking_core::domain::{
    AdminStats, Appointment, AppointmentDetail, DoctorDashboard, DoctorProfile, DoctorSummary,
    Page, Slot, User, UserSummary,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

//=========================================================================================
// Users
//=========================================================================================

/// A user account as returned to clients. Never includes the password hash.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// PATIENT, DOCTOR or ADMIN.
    pub role: String,
    pub is_active: bool,
    pub phone: Option<String>,
    pub address: AddressResponse,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct AddressResponse {
    pub line1: Option<String>,
    pub line2: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            phone: user.phone,
            address: AddressResponse {
                line1: user.address_line1,
                line2: user.address_line2,
            },
            gender: user.gender.map(|g| g.as_str().to_string()),
            date_of_birth: user.date_of_birth,
            image: user.image,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

//=========================================================================================
// Doctors
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
    pub is_approved: bool,
    pub rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub user: DoctorUserResponse,
}

/// The owning account's public fields, nested under each doctor.
#[derive(Serialize, ToSchema)]
pub struct DoctorUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl From<DoctorProfile> for DoctorResponse {
    fn from(profile: DoctorProfile) -> Self {
        let DoctorProfile { doctor, user } = profile;
        Self {
            id: doctor.id,
            user_id: doctor.user_id,
            speciality: doctor.speciality.as_str().to_string(),
            degree: doctor.degree,
            experience: doctor.experience,
            about: doctor.about,
            fees: doctor.fees,
            address_line1: doctor.address_line1,
            address_line2: doctor.address_line2,
            available: doctor.available,
            is_approved: doctor.approved,
            rating: doctor.rating,
            review_count: doctor.review_count,
            created_at: doctor.created_at,
            user: DoctorUserResponse {
                id: user.id,
                name: user.name,
                email: user.email,
                phone: user.phone,
                image: user.image,
            },
        }
    }
}

pub fn doctor_list(profiles: Vec<DoctorProfile>) -> Vec<DoctorResponse> {
    profiles.into_iter().map(DoctorResponse::from).collect()
}

#[derive(Serialize, ToSchema)]
pub struct SlotResponse {
    /// Display label, e.g. "10:00 AM".
    pub time: String,
    pub datetime: NaiveDateTime,
    pub available: bool,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            time: slot.time,
            datetime: slot.datetime,
            available: true,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub appointments: i64,
    pub earnings: f64,
    pub patients: i64,
    pub latest_appointments: Vec<AppointmentDetailResponse>,
}

impl From<DoctorDashboard> for DashboardResponse {
    fn from(dash: DoctorDashboard) -> Self {
        Self {
            appointments: dash.appointments,
            earnings: dash.earnings,
            patients: dash.patients,
            latest_appointments: appointment_list(dash.latest_appointments),
        }
    }
}

//=========================================================================================
// Appointments
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_slot: String,
    /// PENDING, CONFIRMED, COMPLETED or CANCELLED.
    pub status: String,
    pub payment_amount: f64,
    /// PENDING, PAID or REFUNDED.
    pub payment_status: String,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appt: Appointment) -> Self {
        Self {
            id: appt.id,
            patient_id: appt.patient_id,
            doctor_id: appt.doctor_id,
            appointment_date: appt.appointment_date,
            time_slot: appt.time_slot,
            status: appt.status.as_str().to_string(),
            payment_amount: appt.payment_amount,
            payment_status: appt.payment_status.as_str().to_string(),
            cancellation_reason: appt.cancellation_reason,
            created_at: appt.created_at,
            updated_at: appt.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDoctorResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub speciality: String,
}

impl From<DoctorSummary> for AppointmentDoctorResponse {
    fn from(doctor: DoctorSummary) -> Self {
        Self {
            id: doctor.id,
            user_id: doctor.user.id,
            name: doctor.user.name,
            email: doctor.user.email,
            image: doctor.user.image,
            speciality: doctor.speciality.as_str().to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AppointmentPatientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl From<UserSummary> for AppointmentPatientResponse {
    fn from(patient: UserSummary) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            image: patient.image,
        }
    }
}

/// A listed appointment with both parties attached.
#[derive(Serialize, ToSchema)]
pub struct AppointmentDetailResponse {
    #[serde(flatten)]
    pub appointment: AppointmentResponse,
    pub doctor: AppointmentDoctorResponse,
    pub patient: AppointmentPatientResponse,
}

impl From<AppointmentDetail> for AppointmentDetailResponse {
    fn from(detail: AppointmentDetail) -> Self {
        Self {
            appointment: detail.appointment.into(),
            doctor: detail.doctor.into(),
            patient: detail.patient.into(),
        }
    }
}

pub fn appointment_list(appointments: Vec<AppointmentDetail>) -> Vec<AppointmentDetailResponse> {
    appointments
        .into_iter()
        .map(AppointmentDetailResponse::from)
        .collect()
}

//=========================================================================================
// Admin
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub total_doctors: i64,
    pub total_patients: i64,
    pub total_appointments: i64,
    pub pending_appointments: i64,
    pub completed_appointments: i64,
    pub total_revenue: f64,
}

impl From<AdminStats> for AdminStatsResponse {
    fn from(stats: AdminStats) -> Self {
        Self {
            total_users: stats.total_users,
            total_doctors: stats.total_doctors,
            total_patients: stats.total_patients,
            total_appointments: stats.total_appointments,
            pending_appointments: stats.pending_appointments,
            completed_appointments: stats.completed_appointments,
            total_revenue: stats.total_revenue,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl From<Page<User>> for UsersPageResponse {
    fn from(page: Page<User>) -> Self {
        let total_pages = page.total_pages();
        Self {
            users: page.items.into_iter().map(UserResponse::from).collect(),
            total: page.total,
            page: page.page,
            total_pages,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsPageResponse {
    pub appointments: Vec<AppointmentDetailResponse>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl From<Page<AppointmentDetail>> for AppointmentsPageResponse {
    fn from(page: Page<AppointmentDetail>) -> Self {
        let total_pages = page.total_pages();
        Self {
            appointments: appointment_list(page.items),
            total: page.total,
            page: page.page,
            total_pages,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

//=========================================================================================
// Request Helpers
//=========================================================================================

/// Accepts either a bare `YYYY-MM-DD` date or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a valid date", raw)))
}
