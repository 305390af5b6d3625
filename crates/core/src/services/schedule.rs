//! Weekly schedule and doctor administration.

use tracing::{info, warn};
use uuid::Uuid;

use super::AppointmentService;
use crate::errors::{CareError, CareResult};
use crate::models::{
    doctor::{CreateDoctorRequest, Doctor, UpdateDoctorRequest},
    schedule::{ScheduleEntryRequest, WeeklyScheduleEntry},
};
use crate::repository::RepositoryTx;

impl AppointmentService {
    /// Replaces the whole weekly schedule of a doctor.
    ///
    /// At most one entry per day of week; an empty list clears the schedule.
    pub async fn set_weekly_schedule(
        &self,
        doctor_id: Uuid,
        entries: Vec<ScheduleEntryRequest>,
    ) -> CareResult<Vec<WeeklyScheduleEntry>> {
        if entries.len() > 7 {
            return Err(CareError::InvalidInput(format!(
                "A weekly schedule has at most 7 entries, got {}",
                entries.len()
            )));
        }

        let mut seen = [false; 7];
        for entry in &entries {
            entry.validate()?;
            let day = usize::from(entry.day_of_week);
            if seen[day] {
                return Err(CareError::InvalidInput(format!(
                    "Duplicate schedule entry for day_of_week {}",
                    entry.day_of_week
                )));
            }
            seen[day] = true;
        }

        let mut entries: Vec<WeeklyScheduleEntry> = entries
            .into_iter()
            .map(|entry| entry.into_entry(doctor_id))
            .collect();
        entries.sort_by_key(|entry| entry.day_of_week);

        let mut tx = self.repo.begin().await?;
        lock_doctor(tx.as_mut(), doctor_id).await?;
        tx.replace_weekly_schedule(doctor_id, &entries).await?;
        tx.commit().await?;

        info!(
            "Weekly schedule replaced: doctor_id={}, entries={}",
            doctor_id,
            entries.len()
        );
        Ok(entries)
    }

    pub async fn weekly_schedule(&self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>> {
        self.require_doctor(doctor_id).await?;
        self.repo.get_weekly_schedule(doctor_id).await
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> CareResult<Doctor> {
        request.validate()?;
        let doctor = self.repo.create_doctor(request).await?;
        info!("Doctor created: id={}, name={}", doctor.id, doctor.name);
        Ok(doctor)
    }

    pub async fn list_doctors(&self, only_available: bool) -> CareResult<Vec<Doctor>> {
        self.repo.list_doctors(only_available).await
    }

    /// Edits a doctor's profile. Turning `is_available` off hides the doctor
    /// from the patient directory; existing appointments are kept.
    pub async fn update_doctor(&self, doctor_id: Uuid, changes: UpdateDoctorRequest) -> CareResult<Doctor> {
        changes.validate()?;
        let doctor = self
            .repo
            .update_doctor(doctor_id, changes)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("Doctor with ID {} not found", doctor_id)))?;
        info!(
            "Doctor updated: id={}, name={}, is_available={}",
            doctor.id, doctor.name, doctor.is_available
        );
        Ok(doctor)
    }

    /// Deletes a doctor and their weekly schedule.
    ///
    /// Refused with `CareError::InvalidState` while the doctor still has
    /// scheduled appointments. Past appointments stay on record.
    pub async fn remove_doctor(&self, doctor_id: Uuid) -> CareResult<()> {
        let mut tx = self.repo.begin().await?;
        lock_doctor(tx.as_mut(), doctor_id).await?;
        let active = tx.count_scheduled_appointments(doctor_id).await?;
        if active > 0 {
            warn!(
                "Refusing to delete doctor_id={} with {} scheduled appointments",
                doctor_id, active
            );
            return Err(CareError::InvalidState(format!(
                "Doctor {} still has {} scheduled appointments",
                doctor_id, active
            )));
        }
        tx.delete_doctor(doctor_id).await?;
        tx.commit().await?;

        info!("Doctor deleted: id={}", doctor_id);
        Ok(())
    }
}

/// Takes the doctor row exclusively for the rest of the transaction; bookings
/// of this doctor wait until it ends.
async fn lock_doctor(tx: &mut dyn RepositoryTx, doctor_id: Uuid) -> CareResult<Doctor> {
    tx.get_doctor_for_update(doctor_id)
        .await?
        .ok_or_else(|| CareError::NotFound(format!("Doctor with ID {} not found", doctor_id)))
}
