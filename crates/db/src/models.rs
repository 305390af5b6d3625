use carebook_core::{
    errors::{CareError, CareResult},
    models::{appointment::Appointment, doctor::Doctor, schedule::WeeklyScheduleEntry},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub qualifications: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWeeklySchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            email: row.email,
            phone: row.phone,
            experience_years: row.experience_years,
            qualifications: row.qualifications,
            is_available: row.is_available,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbWeeklySchedule> for WeeklyScheduleEntry {
    type Error = CareError;

    fn try_from(row: DbWeeklySchedule) -> CareResult<Self> {
        let day_of_week = u8::try_from(row.day_of_week)
            .map_err(|_| eyre!("Corrupt day_of_week {} in schedule {}", row.day_of_week, row.id))?;
        let slot_duration_minutes = u32::try_from(row.slot_duration_minutes).map_err(|_| {
            eyre!(
                "Corrupt slot_duration_minutes {} in schedule {}",
                row.slot_duration_minutes,
                row.id
            )
        })?;

        Ok(WeeklyScheduleEntry {
            doctor_id: row.doctor_id,
            day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration_minutes,
        })
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = CareError;

    fn try_from(row: DbAppointment) -> CareResult<Self> {
        let status = row
            .status
            .parse()
            .map_err(|_| eyre!("Corrupt status '{}' on appointment {}", row.status, row.id))?;

        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
