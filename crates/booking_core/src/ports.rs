//! crates/booking_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the booking core.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete store behind it.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentDetail, AppointmentStatus, Doctor, DoctorFilter, DoctorProfile,
    DoctorUpdate, NewAppointment, NewDoctor, NewUser, Page, PageRequest, ProfileUpdate, Role, User,
    UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type shared by all port operations and business rules.
/// Each variant corresponds to one caller-visible error category.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---

    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn update_user_profile(&self, user_id: Uuid, update: ProfileUpdate) -> PortResult<User>;

    async fn list_users(&self, role: Option<Role>, page: PageRequest) -> PortResult<Page<User>>;

    async fn count_users(&self, role: Option<Role>) -> PortResult<i64>;

    // --- Doctors ---

    /// Creates the account and the doctor record atomically.
    async fn create_doctor_with_user(
        &self,
        new_user: NewUser,
        new_doctor: NewDoctor,
    ) -> PortResult<DoctorProfile>;

    async fn get_doctor_by_id(&self, doctor_id: Uuid) -> PortResult<DoctorProfile>;

    async fn get_doctor_by_user_id(&self, user_id: Uuid) -> PortResult<DoctorProfile>;

    /// Newest doctors first.
    async fn list_doctors(&self, filter: DoctorFilter) -> PortResult<Vec<DoctorProfile>>;

    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> PortResult<Doctor>;

    /// Deletes the owning user; the doctor row and its appointments go with it.
    async fn delete_doctor(&self, doctor_id: Uuid) -> PortResult<()>;

    // --- Appointments ---

    /// Any non-cancelled appointment holding the given doctor/date/slot.
    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> PortResult<Option<Appointment>>;

    /// Slot labels held by non-cancelled appointments for a doctor on a date.
    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> PortResult<Vec<String>>;

    /// Fails with `Conflict` when a non-cancelled appointment already holds the slot.
    async fn create_appointment(&self, new_appointment: NewAppointment) -> PortResult<Appointment>;

    async fn get_appointment_by_id(&self, appointment_id: Uuid) -> PortResult<Appointment>;

    /// Fails with `Conflict` when a non-cancelled status would give the slot a
    /// second live appointment.
    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> PortResult<Appointment>;

    /// Marks the payment PAID and sets the given status in one write.
    async fn mark_appointment_paid(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> PortResult<Appointment>;

    async fn delete_appointment(&self, appointment_id: Uuid) -> PortResult<()>;

    /// Newest appointment date first.
    async fn list_appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<AppointmentDetail>>;

    /// Newest appointment date first, optionally truncated.
    async fn list_appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        limit: Option<i64>,
    ) -> PortResult<Vec<AppointmentDetail>>;

    /// Newest created first.
    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
        page: PageRequest,
    ) -> PortResult<Page<AppointmentDetail>>;

    // --- Rollups ---

    async fn count_appointments(
        &self,
        doctor_id: Option<Uuid>,
        status: Option<AppointmentStatus>,
    ) -> PortResult<i64>;

    /// Sum of payment amounts over PAID appointments; 0 when there are none.
    async fn sum_paid_revenue(&self, doctor_id: Option<Uuid>) -> PortResult<f64>;

    async fn count_distinct_patients(&self, doctor_id: Uuid) -> PortResult<i64>;
}
