//! Booking confirmation and cancellation.

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::{AppointmentService, availability::is_schedule_slot};
use crate::errors::{CareError, CareResult};
use crate::models::appointment::{Appointment, AppointmentStatus, NewAppointment};

/// Cancellations must happen at least this many hours before the appointment.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 24;

impl AppointmentService {
    /// Books the slot at `date` `time` with `doctor_id` for `patient_id`.
    ///
    /// The slot must be a start time of the doctor's weekly schedule and lie in
    /// the future. The doctor, the schedule and the slot are all checked inside
    /// the transaction that inserts the appointment; of two concurrent bookings
    /// of one slot exactly one succeeds.
    ///
    /// # Errors
    ///
    /// * `CareError::NotFound` - unknown doctor
    /// * `CareError::InvalidInput` - slot in the past or outside the schedule
    /// * `CareError::SlotConflict` - slot already booked
    /// * `CareError::Database` - storage failure
    pub async fn confirm_booking(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CareResult<Appointment> {
        let mut tx = self.repo.begin().await?;

        // The doctor row is held until commit; removal and schedule changes wait.
        if tx.get_doctor(doctor_id).await?.is_none() {
            return Err(CareError::NotFound(format!("Doctor with ID {} not found", doctor_id)));
        }

        let starts_at = date.and_time(time);
        if starts_at <= self.clock.now() {
            return Err(CareError::InvalidInput(format!(
                "Cannot book a slot in the past: {}",
                starts_at
            )));
        }

        let entries = tx.get_weekly_schedule(doctor_id).await?;
        if !is_schedule_slot(&entries, date, time) {
            return Err(CareError::InvalidInput(format!(
                "{} is not a bookable slot for doctor {}",
                starts_at, doctor_id
            )));
        }

        if let Some(existing) = tx.find_scheduled_appointment(doctor_id, date, time).await? {
            warn!(
                "Slot already taken: doctor_id={}, slot={}, appointment_id={}",
                doctor_id,
                existing.slot_key(),
                existing.id
            );
            return Err(CareError::SlotConflict(format!(
                "The slot {} is already booked",
                existing.slot_key()
            )));
        }

        let appointment = tx
            .insert_appointment(NewAppointment {
                patient_id,
                doctor_id,
                appointment_date: date,
                appointment_time: time,
            })
            .await?;
        tx.commit().await?;

        info!(
            "Appointment booked: id={}, patient_id={}, doctor_id={}, slot={}",
            appointment.id,
            patient_id,
            doctor_id,
            appointment.slot_key()
        );
        Ok(appointment)
    }

    /// Cancels an appointment on behalf of the patient who owns it.
    ///
    /// Allowed until [`CANCELLATION_CUTOFF_HOURS`] hours before the
    /// appointment, the cutoff instant included. Cancelling a cancelled
    /// appointment fails with `CareError::InvalidState`.
    ///
    /// # Errors
    ///
    /// * `CareError::NotFound` - unknown appointment
    /// * `CareError::Unauthorized` - requester is not the patient
    /// * `CareError::InvalidState` - appointment already cancelled
    /// * `CareError::TooLate` - cutoff has passed
    /// * `CareError::Database` - storage failure
    pub async fn cancel_appointment(
        &self,
        requester_id: Uuid,
        appointment_id: Uuid,
    ) -> CareResult<Appointment> {
        let mut tx = self.repo.begin().await?;

        let appointment = tx
            .get_appointment_for_update(appointment_id)
            .await?
            .ok_or_else(|| {
                CareError::NotFound(format!("Appointment with ID {} not found", appointment_id))
            })?;

        if appointment.patient_id != requester_id {
            warn!(
                "Rejected cancellation: appointment_id={}, requester_id={}",
                appointment_id, requester_id
            );
            return Err(CareError::Unauthorized(
                "Only the patient who booked an appointment can cancel it".to_string(),
            ));
        }

        if appointment.status != AppointmentStatus::Scheduled {
            return Err(CareError::InvalidState(format!(
                "Appointment {} is already {}",
                appointment_id, appointment.status
            )));
        }

        let cutoff = appointment.starts_at() - Duration::hours(CANCELLATION_CUTOFF_HOURS);
        if self.clock.now() > cutoff {
            return Err(CareError::TooLate(format!(
                "Appointments can only be cancelled up to {} hours in advance",
                CANCELLATION_CUTOFF_HOURS
            )));
        }

        let cancelled = tx
            .update_appointment_status(appointment_id, AppointmentStatus::Cancelled)
            .await?;
        tx.commit().await?;

        info!(
            "Appointment cancelled: id={}, patient_id={}, slot={}",
            cancelled.id,
            cancelled.patient_id,
            cancelled.slot_key()
        );
        Ok(cancelled)
    }
}
