pub mod access;
pub mod admin;
pub mod appointments;
pub mod directory;
pub mod domain;
pub mod ports;
pub mod slots;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use access::Actor;
pub use admin::AdminService;
pub use appointments::AppointmentService;
pub use directory::DoctorDirectory;
pub use domain::{
    AdminStats, Appointment, AppointmentDetail, AppointmentStatus, Doctor, DoctorDashboard,
    DoctorFilter, DoctorProfile, DoctorSummary, DoctorUpdate, Gender, NewAppointment, NewDoctor,
    NewUser, Page, PageRequest, PaymentStatus, ProfileUpdate, Role, Slot, Speciality, User,
    UserCredentials, UserSummary,
};
pub use ports::{DatabaseService, PortError, PortResult};
