//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use booking_core::{AdminService, AppointmentService, DatabaseService, DoctorDirectory};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub appointments: AppointmentService,
    pub directory: DoctorDirectory,
    pub admin: AdminService,
}

impl AppState {
    /// Wires the core services over a single store.
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Self {
        Self {
            appointments: AppointmentService::new(db.clone()),
            directory: DoctorDirectory::new(db.clone()),
            admin: AdminService::new(db.clone()),
            db,
            config,
        }
    }
}
