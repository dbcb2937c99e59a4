//! crates/booking_core/src/domain.rs
//!
//! Defines the pure, core data structures for the booking platform.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ports::PortError;

//=========================================================================================
// Enumerations (stored and transmitted as their upper-case string tags)
//=========================================================================================

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PortError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err(PortError::BadRequest(format!(
                        "'{}' is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

string_enum!(
    /// The role embedded in every bearer token and checked by the route guards.
    Role {
        Patient => "PATIENT",
        Doctor => "DOCTOR",
        Admin => "ADMIN",
    }
);

string_enum!(
    /// Medical speciality tag used to filter the doctor directory.
    Speciality {
        GeneralPhysician => "General_physician",
        Gynecologist => "Gynecologist",
        Dermatologist => "Dermatologist",
        Pediatricians => "Pediatricians",
        Neurologist => "Neurologist",
        Gastroenterologist => "Gastroenterologist",
    }
);

string_enum!(
    AppointmentStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
);

string_enum!(
    PaymentStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Refunded => "REFUNDED",
    }
);

string_enum!(
    Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
);

impl AppointmentStatus {
    /// CANCELLED and COMPLETED accept no further lifecycle transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }
}

//=========================================================================================
// Users
//=========================================================================================

/// A platform account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub image: Option<String>,
}

/// Fields a user may change on their own profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
}

/// The public slice of a user that is attached to doctor listings.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            image: user.image.clone(),
        }
    }
}

//=========================================================================================
// Doctors
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub speciality: Speciality,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
    pub approved: bool,
    pub rating: f64,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A doctor record joined with its owning account.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub doctor: Doctor,
    pub user: UserSummary,
}

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub speciality: Speciality,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address_line1: String,
    pub address_line2: String,
    pub available: bool,
    pub approved: bool,
}

/// Partial update of a doctor record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct DoctorUpdate {
    pub speciality: Option<Speciality>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<f64>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub available: Option<bool>,
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    pub speciality: Option<Speciality>,
    pub available_only: bool,
    pub approved_only: bool,
}

//=========================================================================================
// Appointments
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub payment_amount: f64,
    pub payment_status: PaymentStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_slot: String,
    pub payment_amount: f64,
}

/// The doctor side of an appointment listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub speciality: Speciality,
    pub user: UserSummary,
}

/// An appointment joined with both parties, as returned by every listing.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetail {
    pub appointment: Appointment,
    pub doctor: DoctorSummary,
    pub patient: UserSummary,
}

/// A bookable half-hour slot. Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub time: String,
    pub datetime: NaiveDateTime,
}

//=========================================================================================
// Listings and Rollups
//=========================================================================================

/// Normalized page/limit pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        (self.total + self.limit - 1) / self.limit
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_doctors: i64,
    pub total_patients: i64,
    pub total_appointments: i64,
    pub pending_appointments: i64,
    pub completed_appointments: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone)]
pub struct DoctorDashboard {
    pub appointments: i64,
    pub earnings: f64,
    pub patients: i64,
    pub latest_appointments: Vec<AppointmentDetail>,
}
