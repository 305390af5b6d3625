//! PostgreSQL implementation of the storage contracts.

use async_trait::async_trait;
use carebook_core::{
    errors::{CareError, CareResult},
    models::{
        appointment::{Appointment, AppointmentFilter, AppointmentPage, AppointmentStatus, NewAppointment},
        doctor::{CreateDoctorRequest, Doctor, UpdateDoctorRequest},
        schedule::WeeklyScheduleEntry,
    },
    repository::{Repository, RepositoryTx},
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::DbPool;
use crate::models::DbAppointment;
use crate::repositories::{appointment, doctor, schedule};

#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_appointments(rows: Vec<DbAppointment>) -> CareResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

fn to_count(count: i64) -> CareResult<u64> {
    u64::try_from(count).map_err(|_| CareError::Database(eyre::eyre!("Negative row count {}", count)))
}

/// Whether a storage failure is the partial unique index on scheduled slots.
fn is_unique_violation(report: &eyre::Report) -> bool {
    match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn begin(&self) -> CareResult<Box<dyn RepositoryTx>> {
        let tx = self.pool.begin().await.map_err(eyre::Report::from)?;
        Ok(Box::new(PgRepositoryTx { tx }))
    }

    async fn create_doctor(&self, request: CreateDoctorRequest) -> CareResult<Doctor> {
        let row = doctor::create_doctor(&self.pool, &request).await?;
        Ok(row.into())
    }

    async fn get_doctor(&self, id: Uuid) -> CareResult<Option<Doctor>> {
        let row = doctor::get_doctor_by_id(&self.pool, id).await?;
        Ok(row.map(Doctor::from))
    }

    async fn list_doctors(&self, only_available: bool) -> CareResult<Vec<Doctor>> {
        let rows = doctor::list_doctors(&self.pool, only_available).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctorRequest) -> CareResult<Option<Doctor>> {
        let row = doctor::update_doctor(&self.pool, id, &changes).await?;
        Ok(row.map(Doctor::from))
    }

    async fn get_weekly_schedule(&self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>> {
        let rows = schedule::get_weekly_schedule(&self.pool, doctor_id).await?;
        rows.into_iter().map(WeeklyScheduleEntry::try_from).collect()
    }

    async fn list_scheduled_appointments(
        &self,
        doctor_id: Uuid,
        from: NaiveDate,
        until: NaiveDate,
    ) -> CareResult<Vec<Appointment>> {
        let rows = appointment::list_scheduled_in_range(&self.pool, doctor_id, from, until).await?;
        to_appointments(rows)
    }

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> CareResult<AppointmentPage> {
        let total = appointment::count_filtered(&self.pool, &filter).await?;
        let rows = appointment::list_filtered(&self.pool, &filter).await?;

        Ok(AppointmentPage {
            items: to_appointments(rows)?,
            page: filter.page,
            per_page: filter.per_page,
            total: to_count(total)?,
        })
    }
}

pub struct PgRepositoryTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RepositoryTx for PgRepositoryTx {
    async fn get_doctor(&mut self, id: Uuid) -> CareResult<Option<Doctor>> {
        let row = doctor::get_doctor_for_share(&mut *self.tx, id).await?;
        Ok(row.map(Doctor::from))
    }

    async fn get_doctor_for_update(&mut self, id: Uuid) -> CareResult<Option<Doctor>> {
        let row = doctor::get_doctor_for_update(&mut *self.tx, id).await?;
        Ok(row.map(Doctor::from))
    }

    async fn get_weekly_schedule(&mut self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>> {
        let rows = schedule::get_weekly_schedule(&mut *self.tx, doctor_id).await?;
        rows.into_iter().map(WeeklyScheduleEntry::try_from).collect()
    }

    async fn find_scheduled_appointment(
        &mut self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CareResult<Option<Appointment>> {
        appointment::find_scheduled_appointment(&mut *self.tx, doctor_id, date, time)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn insert_appointment(&mut self, new: NewAppointment) -> CareResult<Appointment> {
        match appointment::create_appointment(&mut *self.tx, &new).await {
            Ok(row) => row.try_into(),
            Err(report) if is_unique_violation(&report) => {
                tracing::debug!("Unique index rejected appointment: {}", report);
                Err(CareError::SlotConflict(format!(
                    "{} {} is already booked",
                    new.appointment_date,
                    new.appointment_time.format("%H:%M")
                )))
            }
            Err(report) => Err(report.into()),
        }
    }

    async fn get_appointment_for_update(&mut self, id: Uuid) -> CareResult<Option<Appointment>> {
        appointment::get_appointment_for_update(&mut *self.tx, id)
            .await?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn update_appointment_status(
        &mut self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> CareResult<Appointment> {
        appointment::update_appointment_status(&mut *self.tx, id, status)
            .await?
            .try_into()
    }

    async fn replace_weekly_schedule(
        &mut self,
        doctor_id: Uuid,
        entries: &[WeeklyScheduleEntry],
    ) -> CareResult<()> {
        schedule::delete_weekly_schedule(&mut *self.tx, doctor_id).await?;
        for entry in entries {
            schedule::create_schedule_entry(&mut *self.tx, entry).await?;
        }
        Ok(())
    }

    async fn count_scheduled_appointments(&mut self, doctor_id: Uuid) -> CareResult<u64> {
        let count = appointment::count_scheduled_for_doctor(&mut *self.tx, doctor_id).await?;
        to_count(count)
    }

    async fn delete_doctor(&mut self, doctor_id: Uuid) -> CareResult<()> {
        if doctor::delete_doctor(&mut *self.tx, doctor_id).await? {
            Ok(())
        } else {
            Err(CareError::NotFound(format!("Doctor with ID {} not found", doctor_id)))
        }
    }

    async fn commit(self: Box<Self>) -> CareResult<()> {
        self.tx.commit().await.map_err(eyre::Report::from)?;
        Ok(())
    }
}
