//! # Appointment engine
//!
//! [`AppointmentService`] is the single entry point the routing layer calls.
//! Its operations are split by concern:
//!
//! - [`availability`]: slot enumeration over a date window
//! - [`booking`]: booking confirmation and cancellation
//! - [`schedule`]: weekly schedule and doctor administration
//! - [`listing`]: patient and administrator appointment listings
//!
//! The service never authenticates anybody. Callers are expected to have
//! checked roles already; only data ownership is enforced here.

pub mod availability;
pub mod booking;
pub mod listing;
pub mod schedule;

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::errors::{CareError, CareResult};
use crate::models::doctor::Doctor;
use crate::repository::Repository;

#[derive(Clone)]
pub struct AppointmentService {
    repo: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
}

impl AppointmentService {
    pub fn new(repo: Arc<dyn Repository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    async fn require_doctor(&self, doctor_id: Uuid) -> CareResult<Doctor> {
        self.repo
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("Doctor with ID {} not found", doctor_id)))
    }
}
