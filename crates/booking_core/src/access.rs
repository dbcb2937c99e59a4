//! crates/booking_core/src/access.rs
//!
//! Role guards and ownership predicates. Routes check the role, operations check
//! ownership against the record they touch.

use uuid::Uuid;

use crate::domain::{Appointment, Role};
use crate::ports::{PortError, PortResult};

/// The authenticated caller, as re-validated against the store for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    pub fn require_role(&self, allowed: &[Role]) -> PortResult<()> {
        if self.has_role(allowed) {
            Ok(())
        } else {
            Err(PortError::Forbidden(format!(
                "Role {} is not allowed to perform this action",
                self.role
            )))
        }
    }
}

/// Who may cancel an appointment: its patient, its doctor, or any admin.
///
/// `actor_doctor_id` is the doctor record owned by the actor, if any.
pub fn can_cancel(actor: &Actor, appointment: &Appointment, actor_doctor_id: Option<Uuid>) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Patient => appointment.patient_id == actor.user_id,
        Role::Doctor => actor_doctor_id == Some(appointment.doctor_id),
    }
}

/// Doctors may only act on appointments booked with them.
pub fn ensure_doctor_owns(doctor_id: Uuid, appointment: &Appointment, action: &str) -> PortResult<()> {
    if appointment.doctor_id == doctor_id {
        Ok(())
    } else {
        Err(PortError::Forbidden(format!(
            "You can only {} your own appointments",
            action
        )))
    }
}
