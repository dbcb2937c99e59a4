//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, served by Swagger UI
//! and written to disk by the `openapi` binary.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::web::{admin, appointments, auth, doctors, dto, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        doctors::list_doctors_handler,
        doctors::doctors_by_speciality_handler,
        doctors::get_doctor_handler,
        doctors::doctor_slots_handler,
        doctors::register_doctor_handler,
        doctors::my_profile_handler,
        doctors::update_my_profile_handler,
        doctors::dashboard_handler,
        doctors::my_doctor_appointments_handler,
        appointments::book_handler,
        appointments::my_appointments_handler,
        appointments::cancel_handler,
        appointments::complete_handler,
        appointments::update_status_handler,
        users::get_profile_handler,
        users::update_profile_handler,
        admin::stats_handler,
        admin::users_handler,
        admin::appointments_handler,
        admin::all_doctors_handler,
        admin::add_doctor_handler,
        admin::change_approval_handler,
        admin::update_doctor_handler,
        admin::delete_doctor_handler,
        admin::delete_appointment_handler,
        admin::confirm_payment_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            doctors::DoctorSignupRequest,
            doctors::DoctorProfileUpdateRequest,
            appointments::BookAppointmentRequest,
            appointments::CancelAppointmentRequest,
            appointments::UpdateStatusRequest,
            users::UpdateProfileRequest,
            admin::DoctorIdRequest,
            admin::AdminDoctorUpdateRequest,
            dto::UserResponse,
            dto::AddressResponse,
            dto::DoctorResponse,
            dto::DoctorUserResponse,
            dto::SlotResponse,
            dto::DashboardResponse,
            dto::AppointmentResponse,
            dto::AppointmentDetailResponse,
            dto::AppointmentDoctorResponse,
            dto::AppointmentPatientResponse,
            dto::AdminStatsResponse,
            dto::UsersPageResponse,
            dto::AppointmentsPageResponse,
            dto::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login."),
        (name = "doctors", description = "Public doctor directory and the doctor workspace."),
        (name = "appointments", description = "Booking and the appointment lifecycle."),
        (name = "users", description = "The caller's own profile."),
        (name = "admin", description = "Admin panel rollups and management.")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
