//! crates/booking_core/src/testing.rs
//!
//! An in-memory `DatabaseService` for tests. It enforces the same unique email and
//! one-active-booking-per-slot constraints as the PostgreSQL schema, so the
//! business rules can be exercised without a database. Ordering ties, text
//! matching and transaction isolation are not modelled.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentDetail, AppointmentStatus, Doctor, DoctorFilter, DoctorProfile,
    DoctorSummary, DoctorUpdate, NewAppointment, NewDoctor, NewUser, Page, PageRequest,
    PaymentStatus, ProfileUpdate, Role, User, UserCredentials, UserSummary,
};
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct Tables {
    // Insertion order doubles as creation order.
    users: Vec<UserCredentials>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
}

#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> PortResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| PortError::Unexpected("in-memory store poisoned".to_string()))
    }
}

impl Tables {
    fn insert_user(&mut self, new_user: NewUser) -> PortResult<User> {
        if self.users.iter().any(|c| c.user.email == new_user.email) {
            return Err(PortError::Conflict("Email already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            is_active: true,
            phone: new_user.phone,
            address_line1: None,
            address_line2: None,
            gender: None,
            date_of_birth: None,
            image: new_user.image,
            created_at: now,
            updated_at: now,
        };
        self.users.push(UserCredentials {
            user: user.clone(),
            hashed_password: new_user.hashed_password,
        });
        Ok(user)
    }

    fn user(&self, user_id: Uuid) -> PortResult<&User> {
        self.users
            .iter()
            .map(|c| &c.user)
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    fn profile(&self, doctor: &Doctor) -> PortResult<DoctorProfile> {
        let user = self.user(doctor.user_id)?;
        Ok(DoctorProfile {
            doctor: doctor.clone(),
            user: UserSummary::from(user),
        })
    }

    fn appointment_mut(&mut self, appointment_id: Uuid) -> PortResult<&mut Appointment> {
        self.appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))
    }

    /// True when another live appointment holds the same doctor, date and slot.
    fn slot_taken(&self, candidate: &Appointment) -> bool {
        self.appointments.iter().any(|a| {
            a.id != candidate.id
                && a.doctor_id == candidate.doctor_id
                && a.appointment_date == candidate.appointment_date
                && a.time_slot == candidate.time_slot
                && a.status != AppointmentStatus::Cancelled
        })
    }

    /// Rejects a status change that would revive a cancelled appointment into
    /// a slot someone else has since booked.
    fn ensure_slot_free(&self, appointment_id: Uuid, status: AppointmentStatus) -> PortResult<()> {
        if status == AppointmentStatus::Cancelled {
            return Ok(());
        }
        let current = self
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))?;
        if self.slot_taken(current) {
            return Err(PortError::Conflict(
                "This time slot is already booked".to_string(),
            ));
        }
        Ok(())
    }

    fn detail(&self, appointment: &Appointment) -> PortResult<AppointmentDetail> {
        let doctor = self
            .doctors
            .iter()
            .find(|d| d.id == appointment.doctor_id)
            .ok_or_else(|| PortError::NotFound("Doctor not found".to_string()))?;
        Ok(AppointmentDetail {
            appointment: appointment.clone(),
            doctor: DoctorSummary {
                id: doctor.id,
                speciality: doctor.speciality,
                user: UserSummary::from(self.user(doctor.user_id)?),
            },
            patient: UserSummary::from(self.user(appointment.patient_id)?),
        })
    }

    fn details<'a>(
        &self,
        appointments: impl Iterator<Item = &'a Appointment>,
    ) -> PortResult<Vec<AppointmentDetail>> {
        appointments.map(|a| self.detail(a)).collect()
    }
}

fn by_date_desc(mut appointments: Vec<AppointmentDetail>) -> Vec<AppointmentDetail> {
    appointments.sort_by(|a, b| {
        b.appointment
            .appointment_date
            .cmp(&a.appointment.appointment_date)
    });
    appointments
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();
    Page {
        items,
        total,
        page: page.page,
        limit: page.limit,
    }
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        self.tables()?.insert_user(new_user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.tables()?.user(user_id).cloned()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables()?
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn update_user_profile(&self, user_id: Uuid, update: ProfileUpdate) -> PortResult<User> {
        let mut tables = self.tables()?;
        let creds = tables
            .users
            .iter_mut()
            .find(|c| c.user.id == user_id)
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?;
        let user = &mut creds.user;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(line1) = update.address_line1 {
            user.address_line1 = Some(line1);
        }
        if let Some(line2) = update.address_line2 {
            user.address_line2 = Some(line2);
        }
        if let Some(gender) = update.gender {
            user.gender = Some(gender);
        }
        if let Some(dob) = update.date_of_birth {
            user.date_of_birth = Some(dob);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self, role: Option<Role>, page: PageRequest) -> PortResult<Page<User>> {
        let tables = self.tables()?;
        let users = tables
            .users
            .iter()
            .rev()
            .map(|c| c.user.clone())
            .filter(|u| role.map_or(true, |r| u.role == r))
            .collect();
        Ok(paginate(users, page))
    }

    async fn count_users(&self, role: Option<Role>) -> PortResult<i64> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .iter()
            .filter(|c| role.map_or(true, |r| c.user.role == r))
            .count() as i64)
    }

    async fn create_doctor_with_user(
        &self,
        new_user: NewUser,
        new_doctor: NewDoctor,
    ) -> PortResult<DoctorProfile> {
        let mut tables = self.tables()?;
        let user = tables.insert_user(new_user)?;
        let doctor = Doctor {
            id: Uuid::new_v4(),
            user_id: user.id,
            speciality: new_doctor.speciality,
            degree: new_doctor.degree,
            experience: new_doctor.experience,
            about: new_doctor.about,
            fees: new_doctor.fees,
            address_line1: new_doctor.address_line1,
            address_line2: new_doctor.address_line2,
            available: new_doctor.available,
            approved: new_doctor.approved,
            rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
        };
        tables.doctors.push(doctor.clone());
        Ok(DoctorProfile {
            doctor,
            user: UserSummary::from(&user),
        })
    }

    async fn get_doctor_by_id(&self, doctor_id: Uuid) -> PortResult<DoctorProfile> {
        let tables = self.tables()?;
        let doctor = tables
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .ok_or_else(|| PortError::NotFound("Doctor not found".to_string()))?;
        tables.profile(doctor)
    }

    async fn get_doctor_by_user_id(&self, user_id: Uuid) -> PortResult<DoctorProfile> {
        let tables = self.tables()?;
        let doctor = tables
            .doctors
            .iter()
            .find(|d| d.user_id == user_id)
            .ok_or_else(|| PortError::NotFound("Doctor profile not found".to_string()))?;
        tables.profile(doctor)
    }

    async fn list_doctors(&self, filter: DoctorFilter) -> PortResult<Vec<DoctorProfile>> {
        let tables = self.tables()?;
        tables
            .doctors
            .iter()
            .rev()
            .filter(|d| filter.speciality.map_or(true, |s| d.speciality == s))
            .filter(|d| !filter.available_only || d.available)
            .filter(|d| !filter.approved_only || d.approved)
            .map(|d| tables.profile(d))
            .collect()
    }

    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> PortResult<Doctor> {
        let mut tables = self.tables()?;
        let doctor = tables
            .doctors
            .iter_mut()
            .find(|d| d.id == doctor_id)
            .ok_or_else(|| PortError::NotFound("Doctor not found".to_string()))?;
        if let Some(speciality) = update.speciality {
            doctor.speciality = speciality;
        }
        if let Some(degree) = update.degree {
            doctor.degree = degree;
        }
        if let Some(experience) = update.experience {
            doctor.experience = experience;
        }
        if let Some(about) = update.about {
            doctor.about = about;
        }
        if let Some(fees) = update.fees {
            doctor.fees = fees;
        }
        if let Some(line1) = update.address_line1 {
            doctor.address_line1 = line1;
        }
        if let Some(line2) = update.address_line2 {
            doctor.address_line2 = line2;
        }
        if let Some(available) = update.available {
            doctor.available = available;
        }
        if let Some(approved) = update.approved {
            doctor.approved = approved;
        }
        Ok(doctor.clone())
    }

    async fn delete_doctor(&self, doctor_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables()?;
        let user_id = tables
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .map(|d| d.user_id)
            .ok_or_else(|| PortError::NotFound("Doctor not found".to_string()))?;
        tables.users.retain(|c| c.user.id != user_id);
        tables.doctors.retain(|d| d.id != doctor_id);
        tables
            .appointments
            .retain(|a| a.doctor_id != doctor_id && a.patient_id != user_id);
        Ok(())
    }

    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> PortResult<Option<Appointment>> {
        let tables = self.tables()?;
        Ok(tables
            .appointments
            .iter()
            .find(|a| {
                a.doctor_id == doctor_id
                    && a.appointment_date == date
                    && a.time_slot == time_slot
                    && a.status != AppointmentStatus::Cancelled
            })
            .cloned())
    }

    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> PortResult<Vec<String>> {
        let tables = self.tables()?;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.appointment_date == date
                    && a.status != AppointmentStatus::Cancelled
            })
            .map(|a| a.time_slot.clone())
            .collect())
    }

    async fn create_appointment(&self, new_appointment: NewAppointment) -> PortResult<Appointment> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: new_appointment.patient_id,
            doctor_id: new_appointment.doctor_id,
            appointment_date: new_appointment.appointment_date,
            time_slot: new_appointment.time_slot,
            status: AppointmentStatus::Pending,
            payment_amount: new_appointment.payment_amount,
            payment_status: PaymentStatus::Pending,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        if tables.slot_taken(&appointment) {
            return Err(PortError::Conflict(
                "This time slot is already booked".to_string(),
            ));
        }
        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment_by_id(&self, appointment_id: Uuid) -> PortResult<Appointment> {
        self.tables()?
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> PortResult<Appointment> {
        let mut tables = self.tables()?;
        tables.ensure_slot_free(appointment_id, status)?;
        let appointment = tables.appointment_mut(appointment_id)?;
        appointment.status = status;
        if cancellation_reason.is_some() {
            appointment.cancellation_reason = cancellation_reason;
        }
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn mark_appointment_paid(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> PortResult<Appointment> {
        let mut tables = self.tables()?;
        tables.ensure_slot_free(appointment_id, status)?;
        let appointment = tables.appointment_mut(appointment_id)?;
        appointment.payment_status = PaymentStatus::Paid;
        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables()?;
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != appointment_id);
        if tables.appointments.len() == before {
            return Err(PortError::NotFound("Appointment not found".to_string()));
        }
        Ok(())
    }

    async fn list_appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<AppointmentDetail>> {
        let tables = self.tables()?;
        let mine = tables.details(
            tables
                .appointments
                .iter()
                .rev()
                .filter(|a| a.patient_id == patient_id),
        )?;
        Ok(by_date_desc(mine))
    }

    async fn list_appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        limit: Option<i64>,
    ) -> PortResult<Vec<AppointmentDetail>> {
        let tables = self.tables()?;
        let mine = tables.details(
            tables
                .appointments
                .iter()
                .rev()
                .filter(|a| a.doctor_id == doctor_id),
        )?;
        let mut sorted = by_date_desc(mine);
        if let Some(limit) = limit {
            sorted.truncate(limit.max(0) as usize);
        }
        Ok(sorted)
    }

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
        page: PageRequest,
    ) -> PortResult<Page<AppointmentDetail>> {
        let tables = self.tables()?;
        let appointments = tables.details(
            tables
                .appointments
                .iter()
                .rev()
                .filter(|a| status.map_or(true, |s| a.status == s)),
        )?;
        Ok(paginate(appointments, page))
    }

    async fn count_appointments(
        &self,
        doctor_id: Option<Uuid>,
        status: Option<AppointmentStatus>,
    ) -> PortResult<i64> {
        let tables = self.tables()?;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| doctor_id.map_or(true, |d| a.doctor_id == d))
            .filter(|a| status.map_or(true, |s| a.status == s))
            .count() as i64)
    }

    async fn sum_paid_revenue(&self, doctor_id: Option<Uuid>) -> PortResult<f64> {
        let tables = self.tables()?;
        Ok(tables
            .appointments
            .iter()
            .filter(|a| doctor_id.map_or(true, |d| a.doctor_id == d))
            .filter(|a| a.payment_status == PaymentStatus::Paid)
            .map(|a| a.payment_amount)
            .sum())
    }

    async fn count_distinct_patients(&self, doctor_id: Uuid) -> PortResult<i64> {
        let tables = self.tables()?;
        let patients: HashSet<Uuid> = tables
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id)
            .map(|a| a.patient_id)
            .collect();
        Ok(patients.len() as i64)
    }
}

//=========================================================================================
// Fixtures
//=========================================================================================

/// A new account with a placeholder hash; tests that log in hash their own password.
pub fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        email: email.to_string(),
        hashed_password: "not-a-real-hash".to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        role,
        phone: None,
        image: None,
    }
}

/// An approved, available general physician charging `fees`.
pub fn new_doctor(fees: f64) -> NewDoctor {
    NewDoctor {
        speciality: crate::domain::Speciality::GeneralPhysician,
        degree: "MBBS".to_string(),
        experience: "4 Years".to_string(),
        about: "General practice".to_string(),
        fees,
        address_line1: "17th Cross, Richmond".to_string(),
        address_line2: "Circle, Ring Road, London".to_string(),
        available: true,
        approved: true,
    }
}
