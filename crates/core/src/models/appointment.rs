use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};
use crate::models::slot::SLOT_KEY_FORMAT;

/// Lifecycle of an appointment: `Scheduled` on creation, `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CareError;

    fn from_str(s: &str) -> CareResult<Self> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(CareError::InvalidInput(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.appointment_time)
    }

    pub fn slot_key(&self) -> String {
        self.starts_at().format(SLOT_KEY_FORMAT).to_string()
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    /// Slot key in `YYYY-MM-DD HH:MM` form.
    pub appointment_datetime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Selection of appointments for listings. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<NaiveDate>,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl AppointmentFilter {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentPage {
    pub items: Vec<Appointment>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
}
