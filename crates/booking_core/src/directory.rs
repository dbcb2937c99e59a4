//! crates/booking_core/src/directory.rs
//!
//! The doctor directory: public catalog, registration, self-service profile,
//! dashboard and the admin-side approval controls.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Doctor, DoctorDashboard, DoctorFilter, DoctorProfile, DoctorUpdate, NewDoctor, NewUser, Role,
    Slot, Speciality,
};
use crate::ports::{DatabaseService, PortError, PortResult};
use crate::slots::generate_slots;

/// Number of recent appointments shown on a doctor's dashboard.
const DASHBOARD_LATEST: i64 = 5;

#[derive(Clone)]
pub struct DoctorDirectory {
    db: Arc<dyn DatabaseService>,
}

impl DoctorDirectory {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    // --- Public catalog ---

    /// Approved, available doctors, optionally narrowed to one speciality.
    pub async fn list_public(&self, speciality: Option<Speciality>) -> PortResult<Vec<DoctorProfile>> {
        self.db
            .list_doctors(DoctorFilter {
                speciality,
                available_only: true,
                approved_only: true,
            })
            .await
    }

    pub async fn find(&self, doctor_id: Uuid) -> PortResult<DoctorProfile> {
        self.db.get_doctor_by_id(doctor_id).await
    }

    /// Open slots for a doctor on `date` (the day of `now` when absent).
    /// An unavailable doctor has no slots.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: Option<NaiveDate>,
        now: NaiveDateTime,
    ) -> PortResult<Vec<Slot>> {
        let profile = self.db.get_doctor_by_id(doctor_id).await?;
        if !profile.doctor.available {
            return Ok(Vec::new());
        }

        let date = date.unwrap_or_else(|| now.date());
        let booked = self.db.booked_slots(doctor_id, date).await?;
        Ok(generate_slots(date, now, &booked))
    }

    // --- Registration ---

    /// Doctor self-registration. The record stays hidden until an admin approves it.
    pub async fn register(&self, user: NewUser, doctor: NewDoctor) -> PortResult<DoctorProfile> {
        self.create(user, NewDoctor {
            available: true,
            approved: false,
            ..doctor
        })
        .await
    }

    /// Admin-created doctors are approved immediately.
    pub async fn add(&self, user: NewUser, doctor: NewDoctor) -> PortResult<DoctorProfile> {
        self.create(user, NewDoctor {
            available: true,
            approved: true,
            ..doctor
        })
        .await
    }

    async fn create(&self, user: NewUser, doctor: NewDoctor) -> PortResult<DoctorProfile> {
        validate_fees(doctor.fees)?;
        let profile = self
            .db
            .create_doctor_with_user(NewUser { role: Role::Doctor, ..user }, doctor)
            .await?;
        info!(
            doctor_id = %profile.doctor.id,
            approved = profile.doctor.approved,
            "Doctor registered"
        );
        Ok(profile)
    }

    // --- Doctor self-service ---

    pub async fn profile(&self, user_id: Uuid) -> PortResult<DoctorProfile> {
        self.db.get_doctor_by_user_id(user_id).await
    }

    /// Doctors may edit their about text, fee, address and availability only.
    pub async fn update_profile(&self, user_id: Uuid, update: DoctorUpdate) -> PortResult<DoctorProfile> {
        let doctor_id = self.db.get_doctor_by_user_id(user_id).await?.doctor.id;
        let allowed = DoctorUpdate {
            speciality: None,
            degree: None,
            experience: None,
            approved: None,
            ..update
        };
        if let Some(fees) = allowed.fees {
            validate_fees(fees)?;
        }
        self.db.update_doctor(doctor_id, allowed).await?;
        self.db.get_doctor_by_id(doctor_id).await
    }

    pub async fn dashboard(&self, user_id: Uuid) -> PortResult<DoctorDashboard> {
        let doctor_id = self.db.get_doctor_by_user_id(user_id).await?.doctor.id;

        Ok(DoctorDashboard {
            appointments: self.db.count_appointments(Some(doctor_id), None).await?,
            earnings: self.db.sum_paid_revenue(Some(doctor_id)).await?,
            patients: self.db.count_distinct_patients(doctor_id).await?,
            latest_appointments: self
                .db
                .list_appointments_for_doctor(doctor_id, Some(DASHBOARD_LATEST))
                .await?,
        })
    }

    // --- Admin controls ---

    /// Every doctor, approved or not.
    pub async fn list_all(&self) -> PortResult<Vec<DoctorProfile>> {
        self.db.list_doctors(DoctorFilter::default()).await
    }

    /// Flips the approval flag and returns the updated record.
    pub async fn toggle_approval(&self, doctor_id: Uuid) -> PortResult<Doctor> {
        let current = self.db.get_doctor_by_id(doctor_id).await?.doctor;
        let updated = self
            .db
            .update_doctor(
                doctor_id,
                DoctorUpdate {
                    approved: Some(!current.approved),
                    ..Default::default()
                },
            )
            .await?;
        info!(%doctor_id, approved = updated.approved, "Doctor approval changed");
        Ok(updated)
    }

    pub async fn admin_update(&self, doctor_id: Uuid, update: DoctorUpdate) -> PortResult<Doctor> {
        if let Some(fees) = update.fees {
            validate_fees(fees)?;
        }
        self.db.update_doctor(doctor_id, update).await
    }

    pub async fn delete(&self, doctor_id: Uuid) -> PortResult<()> {
        self.db.delete_doctor(doctor_id).await?;
        info!(%doctor_id, "Doctor deleted");
        Ok(())
    }
}

fn validate_fees(fees: f64) -> PortResult<()> {
    if fees.is_finite() && fees >= 0.0 {
        Ok(())
    } else {
        Err(PortError::BadRequest("Fees must be a non-negative amount".to_string()))
    }
}
