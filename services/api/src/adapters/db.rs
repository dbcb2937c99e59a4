//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from `booking_core`. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use booking_core::domain::{
    Appointment, AppointmentDetail, AppointmentStatus, Doctor, DoctorFilter, DoctorProfile,
    DoctorSummary, DoctorUpdate, Gender, NewAppointment, NewDoctor, NewUser, Page, PageRequest,
    ProfileUpdate, Role, User, UserCredentials, UserSummary,
};
use booking_core::ports::{DatabaseService, PortError, PortResult};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// Column Lists
//=========================================================================================

const USER_COLUMNS: &str = "id, email, password_hash, name, role, is_active, phone, \
     address_line1, address_line2, gender, date_of_birth, image, created_at, updated_at";

const DOCTOR_SELECT: &str = "SELECT d.id, d.user_id, d.speciality, d.degree, d.experience, \
     d.about, d.fees, d.address_line1, d.address_line2, d.available, d.approved, d.rating, \
     d.review_count, d.created_at, u.name AS user_name, u.email AS user_email, \
     u.phone AS user_phone, u.image AS user_image \
     FROM doctors d JOIN users u ON u.id = d.user_id";

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, appointment_date, time_slot, \
     status, payment_amount, payment_status, cancellation_reason, created_at, updated_at";

const APPOINTMENT_DETAIL_SELECT: &str = "SELECT a.id, a.patient_id, a.doctor_id, \
     a.appointment_date, a.time_slot, a.status, a.payment_amount, a.payment_status, \
     a.cancellation_reason, a.created_at, a.updated_at, d.user_id AS doctor_user_id, \
     d.speciality AS doctor_speciality, du.name AS doctor_name, du.email AS doctor_email, \
     du.phone AS doctor_phone, du.image AS doctor_image, p.name AS patient_name, \
     p.email AS patient_email, p.phone AS patient_phone, p.image AS patient_image \
     FROM appointments a \
     JOIN doctors d ON d.id = a.doctor_id \
     JOIN users du ON du.id = d.user_id \
     JOIN users p ON p.id = a.patient_id";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    is_active: bool,
    phone: Option<String>,
    address_line1: Option<String>,
    address_line2: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<NaiveDate>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_credentials(self) -> PortResult<UserCredentials> {
        let hashed_password = self.password_hash.clone();
        Ok(UserCredentials {
            user: self.to_domain()?,
            hashed_password,
        })
    }

    fn to_domain(self) -> PortResult<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: stored(&self.role)?,
            is_active: self.is_active,
            phone: self.phone,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            gender: self.gender.as_deref().map(stored::<Gender>).transpose()?,
            date_of_birth: self.date_of_birth,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DoctorRecord {
    id: Uuid,
    user_id: Uuid,
    speciality: String,
    degree: String,
    experience: String,
    about: String,
    fees: f64,
    address_line1: String,
    address_line2: String,
    available: bool,
    approved: bool,
    rating: f64,
    review_count: i32,
    created_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    user_phone: Option<String>,
    user_image: Option<String>,
}
impl DoctorRecord {
    fn to_domain(self) -> PortResult<DoctorProfile> {
        Ok(DoctorProfile {
            user: UserSummary {
                id: self.user_id,
                name: self.user_name,
                email: self.user_email,
                phone: self.user_phone,
                image: self.user_image,
            },
            doctor: Doctor {
                id: self.id,
                user_id: self.user_id,
                speciality: stored(&self.speciality)?,
                degree: self.degree,
                experience: self.experience,
                about: self.about,
                fees: self.fees,
                address_line1: self.address_line1,
                address_line2: self.address_line2,
                available: self.available,
                approved: self.approved,
                rating: self.rating,
                review_count: self.review_count,
                created_at: self.created_at,
            },
        })
    }
}

#[derive(FromRow)]
struct AppointmentRecord {
    id: Uuid,
    patient_id: Uuid,
    doctor_id: Uuid,
    appointment_date: NaiveDate,
    time_slot: String,
    status: String,
    payment_amount: f64,
    payment_status: String,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl AppointmentRecord {
    fn to_domain(self) -> PortResult<Appointment> {
        Ok(Appointment {
            id: self.id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            appointment_date: self.appointment_date,
            time_slot: self.time_slot,
            status: stored(&self.status)?,
            payment_amount: self.payment_amount,
            payment_status: stored(&self.payment_status)?,
            cancellation_reason: self.cancellation_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct AppointmentDetailRecord {
    id: Uuid,
    patient_id: Uuid,
    doctor_id: Uuid,
    appointment_date: NaiveDate,
    time_slot: String,
    status: String,
    payment_amount: f64,
    payment_status: String,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    doctor_user_id: Uuid,
    doctor_speciality: String,
    doctor_name: String,
    doctor_email: String,
    doctor_phone: Option<String>,
    doctor_image: Option<String>,
    patient_name: String,
    patient_email: String,
    patient_phone: Option<String>,
    patient_image: Option<String>,
}
impl AppointmentDetailRecord {
    fn to_domain(self) -> PortResult<AppointmentDetail> {
        Ok(AppointmentDetail {
            doctor: DoctorSummary {
                id: self.doctor_id,
                speciality: stored(&self.doctor_speciality)?,
                user: UserSummary {
                    id: self.doctor_user_id,
                    name: self.doctor_name,
                    email: self.doctor_email,
                    phone: self.doctor_phone,
                    image: self.doctor_image,
                },
            },
            patient: UserSummary {
                id: self.patient_id,
                name: self.patient_name,
                email: self.patient_email,
                phone: self.patient_phone,
                image: self.patient_image,
            },
            appointment: Appointment {
                id: self.id,
                patient_id: self.patient_id,
                doctor_id: self.doctor_id,
                appointment_date: self.appointment_date,
                time_slot: self.time_slot,
                status: stored(&self.status)?,
                payment_amount: self.payment_amount,
                payment_status: stored(&self.payment_status)?,
                cancellation_reason: self.cancellation_reason,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }
}

//=========================================================================================
// Error Mapping Helpers
//=========================================================================================

/// Parses an enum tag read back from the database. A bad tag is corrupt data, not bad input.
fn stored<T>(raw: &str) -> PortResult<T>
where
    T: std::str::FromStr<Err = PortError>,
{
    raw.parse::<T>().map_err(|e| PortError::Unexpected(e.to_string()))
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn conflict_or_unexpected(e: sqlx::Error, conflict: &str) -> PortError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return PortError::Conflict(conflict.to_string());
        }
    }
    unexpected(e)
}

fn details_to_domain(records: Vec<AppointmentDetailRecord>) -> PortResult<Vec<AppointmentDetail>> {
    records.into_iter().map(|r| r.to_domain()).collect()
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name, role, phone, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.hashed_password)
            .bind(&new_user.name)
            .bind(new_user.role.as_str())
            .bind(&new_user.phone)
            .bind(&new_user.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_unexpected(e, "Email already exists"))?;
        record.to_domain()
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?
            .to_domain()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?
            .to_credentials()
    }

    async fn update_user_profile(&self, user_id: Uuid, update: ProfileUpdate) -> PortResult<User> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                address_line1 = COALESCE($4, address_line1), \
                address_line2 = COALESCE($5, address_line2), \
                gender = COALESCE($6, gender), \
                date_of_birth = COALESCE($7, date_of_birth), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .bind(update.name)
            .bind(update.phone)
            .bind(update.address_line1)
            .bind(update.address_line2)
            .bind(update.gender.map(|g| g.as_str()))
            .bind(update.date_of_birth)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))?
            .to_domain()
    }

    async fn list_users(&self, role: Option<Role>, page: PageRequest) -> PortResult<Page<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE ($1::text IS NULL OR role = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            USER_COLUMNS
        );
        let records = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(role.map(|r| r.as_str()))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let items = records
            .into_iter()
            .map(|r| r.to_domain())
            .collect::<PortResult<Vec<_>>>()?;
        Ok(Page {
            items,
            total: self.count_users(role).await?,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn count_users(&self, role: Option<Role>) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR role = $1)",
        )
        .bind(role.map(|r| r.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn create_doctor_with_user(
        &self,
        new_user: NewUser,
        new_doctor: NewDoctor,
    ) -> PortResult<DoctorProfile> {
        let user_id = Uuid::new_v4();
        let doctor_id = Uuid::new_v4();

        // Both rows or neither.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role, phone, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user_id)
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(&new_user.name)
        .bind(new_user.role.as_str())
        .bind(&new_user.phone)
        .bind(&new_user.image)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_or_unexpected(e, "User with this email already exists"))?;

        sqlx::query(
            "INSERT INTO doctors (id, user_id, speciality, degree, experience, about, fees, \
             address_line1, address_line2, available, approved) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(doctor_id)
        .bind(user_id)
        .bind(new_doctor.speciality.as_str())
        .bind(&new_doctor.degree)
        .bind(&new_doctor.experience)
        .bind(&new_doctor.about)
        .bind(new_doctor.fees)
        .bind(&new_doctor.address_line1)
        .bind(&new_doctor.address_line2)
        .bind(new_doctor.available)
        .bind(new_doctor.approved)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;

        self.get_doctor_by_id(doctor_id).await
    }

    async fn get_doctor_by_id(&self, doctor_id: Uuid) -> PortResult<DoctorProfile> {
        let sql = format!("{} WHERE d.id = $1", DOCTOR_SELECT);
        sqlx::query_as::<_, DoctorRecord>(&sql)
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("Doctor not found".to_string()))?
            .to_domain()
    }

    async fn get_doctor_by_user_id(&self, user_id: Uuid) -> PortResult<DoctorProfile> {
        let sql = format!("{} WHERE d.user_id = $1", DOCTOR_SELECT);
        sqlx::query_as::<_, DoctorRecord>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("Doctor profile not found".to_string()))?
            .to_domain()
    }

    async fn list_doctors(&self, filter: DoctorFilter) -> PortResult<Vec<DoctorProfile>> {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR d.speciality = $1) \
               AND (NOT $2 OR d.available) \
               AND (NOT $3 OR d.approved) \
             ORDER BY d.created_at DESC",
            DOCTOR_SELECT
        );
        let records = sqlx::query_as::<_, DoctorRecord>(&sql)
            .bind(filter.speciality.map(|s| s.as_str()))
            .bind(filter.available_only)
            .bind(filter.approved_only)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn update_doctor(&self, doctor_id: Uuid, update: DoctorUpdate) -> PortResult<Doctor> {
        let result = sqlx::query(
            "UPDATE doctors SET \
                speciality = COALESCE($2, speciality), \
                degree = COALESCE($3, degree), \
                experience = COALESCE($4, experience), \
                about = COALESCE($5, about), \
                fees = COALESCE($6, fees), \
                address_line1 = COALESCE($7, address_line1), \
                address_line2 = COALESCE($8, address_line2), \
                available = COALESCE($9, available), \
                approved = COALESCE($10, approved) \
             WHERE id = $1",
        )
        .bind(doctor_id)
        .bind(update.speciality.map(|s| s.as_str()))
        .bind(update.degree)
        .bind(update.experience)
        .bind(update.about)
        .bind(update.fees)
        .bind(update.address_line1)
        .bind(update.address_line2)
        .bind(update.available)
        .bind(update.approved)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Doctor not found".to_string()));
        }
        Ok(self.get_doctor_by_id(doctor_id).await?.doctor)
    }

    async fn delete_doctor(&self, doctor_id: Uuid) -> PortResult<()> {
        // Cascades to the doctor row and to every appointment referencing either.
        let result =
            sqlx::query("DELETE FROM users WHERE id = (SELECT user_id FROM doctors WHERE id = $1)")
                .bind(doctor_id)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Doctor not found".to_string()));
        }
        Ok(())
    }

    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> PortResult<Option<Appointment>> {
        let sql = format!(
            "SELECT {} FROM appointments \
             WHERE doctor_id = $1 AND appointment_date = $2 AND time_slot = $3 \
               AND status <> 'CANCELLED' \
             LIMIT 1",
            APPOINTMENT_COLUMNS
        );
        sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(doctor_id)
            .bind(date)
            .bind(time_slot)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(|r| r.to_domain())
            .transpose()
    }

    async fn booked_slots(&self, doctor_id: Uuid, date: NaiveDate) -> PortResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT time_slot FROM appointments \
             WHERE doctor_id = $1 AND appointment_date = $2 AND status <> 'CANCELLED'",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn create_appointment(&self, new_appointment: NewAppointment) -> PortResult<Appointment> {
        let sql = format!(
            "INSERT INTO appointments \
                (id, patient_id, doctor_id, appointment_date, time_slot, payment_amount) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_appointment.patient_id)
            .bind(new_appointment.doctor_id)
            .bind(new_appointment.appointment_date)
            .bind(&new_appointment.time_slot)
            .bind(new_appointment.payment_amount)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_or_unexpected(e, "This time slot is already booked"))?
            .to_domain()
    }

    async fn get_appointment_by_id(&self, appointment_id: Uuid) -> PortResult<Appointment> {
        let sql = format!("SELECT {} FROM appointments WHERE id = $1", APPOINTMENT_COLUMNS);
        sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))?
            .to_domain()
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> PortResult<Appointment> {
        let sql = format!(
            "UPDATE appointments SET status = $2, \
                cancellation_reason = COALESCE($3, cancellation_reason), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(appointment_id)
            .bind(status.as_str())
            .bind(cancellation_reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or_unexpected(e, "This time slot is already booked"))?
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))?
            .to_domain()
    }

    async fn mark_appointment_paid(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> PortResult<Appointment> {
        let sql = format!(
            "UPDATE appointments SET payment_status = 'PAID', status = $2, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            APPOINTMENT_COLUMNS
        );
        sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(appointment_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or_unexpected(e, "This time slot is already booked"))?
            .ok_or_else(|| PortError::NotFound("Appointment not found".to_string()))?
            .to_domain()
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Appointment not found".to_string()));
        }
        Ok(())
    }

    async fn list_appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<AppointmentDetail>> {
        let sql = format!(
            "{} WHERE a.patient_id = $1 \
             ORDER BY a.appointment_date DESC, a.created_at DESC",
            APPOINTMENT_DETAIL_SELECT
        );
        let records = sqlx::query_as::<_, AppointmentDetailRecord>(&sql)
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        details_to_domain(records)
    }

    async fn list_appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        limit: Option<i64>,
    ) -> PortResult<Vec<AppointmentDetail>> {
        // LIMIT NULL means no limit in PostgreSQL.
        let sql = format!(
            "{} WHERE a.doctor_id = $1 \
             ORDER BY a.appointment_date DESC, a.created_at DESC LIMIT $2",
            APPOINTMENT_DETAIL_SELECT
        );
        let records = sqlx::query_as::<_, AppointmentDetailRecord>(&sql)
            .bind(doctor_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        details_to_domain(records)
    }

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
        page: PageRequest,
    ) -> PortResult<Page<AppointmentDetail>> {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR a.status = $1) \
             ORDER BY a.created_at DESC LIMIT $2 OFFSET $3",
            APPOINTMENT_DETAIL_SELECT
        );
        let records = sqlx::query_as::<_, AppointmentDetailRecord>(&sql)
            .bind(status.map(|s| s.as_str()))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(Page {
            items: details_to_domain(records)?,
            total: self.count_appointments(None, status).await?,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn count_appointments(
        &self,
        doctor_id: Option<Uuid>,
        status: Option<AppointmentStatus>,
    ) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments \
             WHERE ($1::uuid IS NULL OR doctor_id = $1) AND ($2::text IS NULL OR status = $2)",
        )
        .bind(doctor_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn sum_paid_revenue(&self, doctor_id: Option<Uuid>) -> PortResult<f64> {
        sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(payment_amount), 0)::float8 FROM appointments \
             WHERE payment_status = 'PAID' AND ($1::uuid IS NULL OR doctor_id = $1)",
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn count_distinct_patients(&self, doctor_id: Uuid) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT patient_id) FROM appointments WHERE doctor_id = $1",
        )
        .bind(doctor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)
    }
}
