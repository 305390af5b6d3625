pub mod appointment;
pub mod doctor;
pub mod schedule;
pub mod slot;
