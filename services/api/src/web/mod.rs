pub mod admin;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod dto;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;
pub mod token;
pub mod users;

// Re-export the router builder so the binary and the integration tests share
// one definition of the HTTP surface.
pub use router::build_router;
pub use state::AppState;
