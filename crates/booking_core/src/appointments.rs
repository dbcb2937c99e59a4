//! crates/booking_core/src/appointments.rs
//!
//! The appointment lifecycle: booking, cancellation, completion, doctor-driven
//! status overrides and payment confirmation.
//!
//! ```text
//! PENDING ──pay──► CONFIRMED
//!    │  └──────────────┤
//!    ▼                 ▼
//! CANCELLED        COMPLETED      (terminal for cancel and payment)
//! ```
//!
//! Complete and the doctor status override bypass this table; the store still
//! refuses any write that leaves two live appointments in one slot.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{can_cancel, ensure_doctor_owns, Actor};
use crate::domain::{
    Appointment, AppointmentDetail, AppointmentStatus, NewAppointment, PaymentStatus, Role,
};
use crate::ports::{DatabaseService, PortError, PortResult};
use crate::slots::{parse_slot_label, slot_label};

#[derive(Clone)]
pub struct AppointmentService {
    db: Arc<dyn DatabaseService>,
}

impl AppointmentService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Books `time_slot` on `date` with a doctor, on behalf of a patient.
    ///
    /// The slot check is a point read before the insert; a store that enforces
    /// slot uniqueness reports a lost race as the same `Conflict`.
    pub async fn book(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> PortResult<Appointment> {
        let profile = self.db.get_doctor_by_id(doctor_id).await?;
        let doctor = profile.doctor;

        if !doctor.available {
            return Err(PortError::BadRequest("Doctor is not available".to_string()));
        }
        if !doctor.approved {
            return Err(PortError::BadRequest(
                "Doctor is not accepting appointments yet".to_string(),
            ));
        }

        let label = slot_label(parse_slot_label(time_slot)?);

        if self
            .db
            .find_active_appointment(doctor_id, date, &label)
            .await?
            .is_some()
        {
            warn!(%doctor_id, %date, slot = %label, "Rejected double booking");
            return Err(PortError::Conflict(
                "This time slot is already booked".to_string(),
            ));
        }

        let appointment = self
            .db
            .create_appointment(NewAppointment {
                patient_id,
                doctor_id,
                appointment_date: date,
                time_slot: label,
                payment_amount: doctor.fees,
            })
            .await?;

        info!(appointment_id = %appointment.id, %patient_id, %doctor_id, "Appointment booked");
        Ok(appointment)
    }

    /// Cancels an appointment. Allowed for its patient, its doctor, and admins.
    pub async fn cancel(
        &self,
        actor: &Actor,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> PortResult<Appointment> {
        let appointment = self.db.get_appointment_by_id(appointment_id).await?;

        let actor_doctor_id = match actor.role {
            Role::Doctor => self.own_doctor_id(actor.user_id).await?,
            _ => None,
        };
        if !can_cancel(actor, &appointment, actor_doctor_id) {
            return Err(PortError::Forbidden(
                "You can only cancel your own appointments".to_string(),
            ));
        }

        match appointment.status {
            AppointmentStatus::Cancelled => {
                return Err(PortError::BadRequest(
                    "Appointment is already cancelled".to_string(),
                ))
            }
            AppointmentStatus::Completed => {
                return Err(PortError::BadRequest(
                    "Cannot cancel completed appointment".to_string(),
                ))
            }
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
        }

        let cancelled = self
            .db
            .update_appointment_status(appointment_id, AppointmentStatus::Cancelled, reason)
            .await?;
        info!(%appointment_id, by = %actor.user_id, role = %actor.role, "Appointment cancelled");
        Ok(cancelled)
    }

    /// Marks an appointment as completed by its doctor, whatever its current
    /// status.
    pub async fn complete(&self, doctor_user_id: Uuid, appointment_id: Uuid) -> PortResult<Appointment> {
        let doctor_id = self.require_doctor_id(doctor_user_id).await?;
        let appointment = self.db.get_appointment_by_id(appointment_id).await?;
        ensure_doctor_owns(doctor_id, &appointment, "complete")?;

        let completed = self
            .db
            .update_appointment_status(appointment_id, AppointmentStatus::Completed, None)
            .await?;
        info!(%appointment_id, %doctor_id, "Appointment completed");
        Ok(completed)
    }

    /// Sets any status on an appointment the doctor owns. This is a deliberate
    /// override and does not consult the transition table.
    pub async fn update_status(
        &self,
        doctor_user_id: Uuid,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> PortResult<Appointment> {
        let doctor_id = self.require_doctor_id(doctor_user_id).await?;
        let appointment = self.db.get_appointment_by_id(appointment_id).await?;
        ensure_doctor_owns(doctor_id, &appointment, "update")?;

        let updated = self
            .db
            .update_appointment_status(appointment_id, status, None)
            .await?;
        info!(
            %appointment_id,
            from = %appointment.status,
            to = %status,
            "Appointment status overridden by doctor"
        );
        Ok(updated)
    }

    /// Records a successful payment: PAID, and PENDING moves to CONFIRMED.
    pub async fn confirm_payment(&self, appointment_id: Uuid) -> PortResult<Appointment> {
        let appointment = self.db.get_appointment_by_id(appointment_id).await?;

        if appointment.status.is_terminal() {
            return Err(PortError::BadRequest(format!(
                "Cannot take payment for a {} appointment",
                appointment.status.as_str().to_lowercase()
            )));
        }
        if appointment.payment_status == PaymentStatus::Paid {
            return Err(PortError::BadRequest(
                "Appointment is already paid".to_string(),
            ));
        }

        let paid = self
            .db
            .mark_appointment_paid(appointment_id, AppointmentStatus::Confirmed)
            .await?;
        info!(%appointment_id, amount = paid.payment_amount, "Payment confirmed");
        Ok(paid)
    }

    pub async fn delete(&self, appointment_id: Uuid) -> PortResult<()> {
        self.db.delete_appointment(appointment_id).await?;
        info!(%appointment_id, "Appointment deleted");
        Ok(())
    }

    pub async fn for_patient(&self, patient_id: Uuid) -> PortResult<Vec<AppointmentDetail>> {
        self.db.list_appointments_for_patient(patient_id).await
    }

    pub async fn for_doctor_user(
        &self,
        doctor_user_id: Uuid,
    ) -> PortResult<Vec<AppointmentDetail>> {
        let doctor_id = self.require_doctor_id(doctor_user_id).await?;
        self.db.list_appointments_for_doctor(doctor_id, None).await
    }

    async fn own_doctor_id(&self, user_id: Uuid) -> PortResult<Option<Uuid>> {
        match self.db.get_doctor_by_user_id(user_id).await {
            Ok(profile) => Ok(Some(profile.doctor.id)),
            Err(PortError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn require_doctor_id(&self, user_id: Uuid) -> PortResult<Uuid> {
        self.own_doctor_id(user_id)
            .await?
            .ok_or_else(|| PortError::NotFound("Doctor profile not found".to_string()))
    }
}
