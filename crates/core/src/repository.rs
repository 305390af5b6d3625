//! Storage contracts of the appointment engine.
//!
//! [`Repository`] serves the reads that need no isolation. Anything that
//! checks and then writes goes through a [`RepositoryTx`] obtained from
//! [`Repository::begin`]; dropping the transaction without calling
//! [`RepositoryTx::commit`] rolls it back.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::errors::CareResult;
use crate::models::{
    appointment::{Appointment, AppointmentFilter, AppointmentPage, AppointmentStatus, NewAppointment},
    doctor::{CreateDoctorRequest, Doctor, UpdateDoctorRequest},
    schedule::WeeklyScheduleEntry,
};

#[async_trait]
pub trait Repository: Send + Sync {
    /// Opens a transaction scope for a compound check-then-write.
    async fn begin(&self) -> CareResult<Box<dyn RepositoryTx>>;

    async fn create_doctor(&self, doctor: CreateDoctorRequest) -> CareResult<Doctor>;

    async fn get_doctor(&self, id: Uuid) -> CareResult<Option<Doctor>>;

    async fn list_doctors(&self, only_available: bool) -> CareResult<Vec<Doctor>>;

    /// Applies the fields set in `changes`; `None` when the doctor is unknown.
    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctorRequest) -> CareResult<Option<Doctor>>;

    /// Entries of the doctor ordered by day of week.
    async fn get_weekly_schedule(&self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>>;

    /// Scheduled appointments of a doctor with `from <= date < until`.
    async fn list_scheduled_appointments(
        &self,
        doctor_id: Uuid,
        from: NaiveDate,
        until: NaiveDate,
    ) -> CareResult<Vec<Appointment>>;

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>>;

    async fn list_appointments(&self, filter: AppointmentFilter) -> CareResult<AppointmentPage>;
}

#[async_trait]
pub trait RepositoryTx: Send {
    /// Reads a doctor and keeps the row from being changed or deleted until
    /// the transaction ends. Other shared readers are not blocked.
    async fn get_doctor(&mut self, id: Uuid) -> CareResult<Option<Doctor>>;

    /// Reads a doctor and holds the row exclusively until the transaction
    /// ends.
    async fn get_doctor_for_update(&mut self, id: Uuid) -> CareResult<Option<Doctor>>;

    async fn get_weekly_schedule(&mut self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>>;

    async fn find_scheduled_appointment(
        &mut self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CareResult<Option<Appointment>>;

    /// Inserts a scheduled appointment.
    ///
    /// Fails with `CareError::SlotConflict` when another scheduled
    /// appointment already holds the same doctor, date and time.
    async fn insert_appointment(&mut self, appointment: NewAppointment) -> CareResult<Appointment>;

    /// Reads an appointment and holds it against concurrent writers until
    /// the transaction ends.
    async fn get_appointment_for_update(&mut self, id: Uuid) -> CareResult<Option<Appointment>>;

    async fn update_appointment_status(
        &mut self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> CareResult<Appointment>;

    /// Deletes every entry of the doctor and inserts `entries` in their place.
    async fn replace_weekly_schedule(
        &mut self,
        doctor_id: Uuid,
        entries: &[WeeklyScheduleEntry],
    ) -> CareResult<()>;

    async fn count_scheduled_appointments(&mut self, doctor_id: Uuid) -> CareResult<u64>;

    /// Deletes the doctor together with their weekly schedule.
    async fn delete_doctor(&mut self, doctor_id: Uuid) -> CareResult<()>;

    async fn commit(self: Box<Self>) -> CareResult<()>;
}
