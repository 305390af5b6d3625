use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// Format of the human-readable slot key, e.g. `2025-06-10 09:30`.
pub const SLOT_KEY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A bookable appointment start for one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub key: String,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        let key = date.and_time(time).format(SLOT_KEY_FORMAT).to_string();
        Self { date, time, key }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Parses a slot key back into its date and time.
    pub fn parse_key(key: &str) -> CareResult<(NaiveDate, NaiveTime)> {
        let parsed = NaiveDateTime::parse_from_str(key.trim(), SLOT_KEY_FORMAT).map_err(|_| {
            CareError::InvalidInput(format!(
                "Invalid appointment datetime '{}', expected YYYY-MM-DD HH:MM",
                key
            ))
        })?;
        Ok((parsed.date(), parsed.time()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub doctor_id: Uuid,
    pub from: NaiveDate,
    pub days: u32,
    pub slots: Vec<Slot>,
}
