pub mod admin;
pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod schedule;
