//! crates/booking_core/src/admin.rs
//!
//! Read-side rollups for the admin panel. Everything is recomputed per call.

use std::sync::Arc;

use crate::domain::{
    AdminStats, AppointmentDetail, AppointmentStatus, Page, PageRequest, Role, User,
};
use crate::ports::{DatabaseService, PortResult};

#[derive(Clone)]
pub struct AdminService {
    db: Arc<dyn DatabaseService>,
}

impl AdminService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn stats(&self) -> PortResult<AdminStats> {
        Ok(AdminStats {
            total_users: self.db.count_users(None).await?,
            total_doctors: self.db.count_users(Some(Role::Doctor)).await?,
            total_patients: self.db.count_users(Some(Role::Patient)).await?,
            total_appointments: self.db.count_appointments(None, None).await?,
            pending_appointments: self
                .db
                .count_appointments(None, Some(AppointmentStatus::Pending))
                .await?,
            completed_appointments: self
                .db
                .count_appointments(None, Some(AppointmentStatus::Completed))
                .await?,
            total_revenue: self.db.sum_paid_revenue(None).await?,
        })
    }

    pub async fn users(&self, role: Option<Role>, page: PageRequest) -> PortResult<Page<User>> {
        self.db.list_users(role, page).await
    }

    pub async fn appointments(
        &self,
        status: Option<AppointmentStatus>,
        page: PageRequest,
    ) -> PortResult<Page<AppointmentDetail>> {
        self.db.list_appointments(status, page).await
    }
}
