//! services/api/src/web/router.rs
//!
//! Assembles the full HTTP application: route groups with their guards, CORS,
//! request tracing and the Swagger UI.

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    admin, appointments, auth, doctors,
    middleware::{require_admin, require_auth, require_doctor, require_patient},
    rest::ApiDoc,
    state::AppState,
    users,
};

/// Builds the application router. Every API route lives under `/api`.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/doctors", get(doctors::list_doctors_handler))
        .route(
            "/doctors/speciality/{speciality}",
            get(doctors::doctors_by_speciality_handler),
        )
        .route("/doctors/register", post(doctors::register_doctor_handler))
        .route("/doctors/{id}", get(doctors::get_doctor_handler))
        .route("/doctors/{id}/slots", get(doctors::doctor_slots_handler));

    // Any authenticated role
    let member_routes = Router::new()
        .route(
            "/user/profile",
            get(users::get_profile_handler).put(users::update_profile_handler),
        )
        .route("/user/appointments", get(appointments::my_appointments_handler))
        .route("/appointments/{id}/cancel", put(appointments::cancel_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let patient_routes = Router::new()
        .route("/appointments/book", post(appointments::book_handler))
        .route("/appointments/user", get(appointments::my_appointments_handler))
        .route_layer(axum_middleware::from_fn(require_patient))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let doctor_routes = Router::new()
        .route(
            "/doctors/profile",
            get(doctors::my_profile_handler).put(doctors::update_my_profile_handler),
        )
        .route("/doctors/dashboard", get(doctors::dashboard_handler))
        .route(
            "/doctors/my/appointments",
            get(doctors::my_doctor_appointments_handler),
        )
        .route(
            "/appointments/{id}/complete",
            put(appointments::complete_handler),
        )
        .route(
            "/appointments/{id}/status",
            put(appointments::update_status_handler),
        )
        .route_layer(axum_middleware::from_fn(require_doctor))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats_handler))
        .route("/admin/users", get(admin::users_handler))
        .route("/admin/appointments", get(admin::appointments_handler))
        .route("/admin/all-doctors", get(admin::all_doctors_handler))
        .route("/admin/add-doctor", post(admin::add_doctor_handler))
        .route("/admin/change-approval", post(admin::change_approval_handler))
        .route("/admin/delete-doctor", post(admin::delete_doctor_handler))
        .route("/admin/doctors/{id}", put(admin::update_doctor_handler))
        .route(
            "/admin/appointments/{id}",
            delete(admin::delete_appointment_handler),
        )
        .route(
            "/admin/appointments/{id}/confirm-payment",
            post(admin::confirm_payment_handler),
        )
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let cors = cors_layer(&state.config.allowed_origins);

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(patient_routes)
        .merge(doctor_routes)
        .merge(admin_routes)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}
