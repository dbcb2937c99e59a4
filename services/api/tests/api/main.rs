mod admin;
mod appointments;
mod auth;
mod doctors;
mod helpers;
