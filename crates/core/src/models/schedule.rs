use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// Number of minutes in a day, the upper bound for a slot duration.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Recurring availability of one doctor on one weekday.
///
/// `day_of_week` counts from Monday (0) to Sunday (6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScheduleEntry {
    pub doctor_id: Uuid,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
}

impl WeeklyScheduleEntry {
    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_index(self.day_of_week)
    }

    /// Start times of every slot that fits entirely before `end_time`.
    pub fn slot_starts(&self) -> SlotStarts {
        SlotStarts {
            next: self.start_time.num_seconds_from_midnight(),
            end: self.end_time.num_seconds_from_midnight(),
            step: self.slot_duration_minutes.checked_mul(60).unwrap_or(0),
        }
    }

    pub fn is_slot_start(&self, time: NaiveTime) -> bool {
        self.slot_starts().any(|start| start == time)
    }
}

/// Iterator over slot start times of a single day.
#[derive(Debug, Clone)]
pub struct SlotStarts {
    next: u32,
    end: u32,
    step: u32,
}

impl Iterator for SlotStarts {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        if self.step == 0 {
            return None;
        }

        let start = self.next;
        // Trailing partial slots are dropped.
        if start.checked_add(self.step)? > self.end {
            return None;
        }
        self.next = start + self.step;

        NaiveTime::from_num_seconds_from_midnight_opt(start, 0)
    }
}

pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_monday() as u8
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntryRequest {
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u32,
}

fn default_slot_duration() -> u32 {
    30
}

impl ScheduleEntryRequest {
    pub fn validate(&self) -> CareResult<()> {
        if weekday_from_index(self.day_of_week).is_none() {
            return Err(CareError::InvalidInput(format!(
                "day_of_week must be between 0 (Monday) and 6 (Sunday), got {}",
                self.day_of_week
            )));
        }
        if self.start_time >= self.end_time {
            return Err(CareError::InvalidInput(format!(
                "Start time {} must be before end time {}",
                self.start_time, self.end_time
            )));
        }
        if self.slot_duration_minutes == 0 || self.slot_duration_minutes > MINUTES_PER_DAY {
            return Err(CareError::InvalidInput(format!(
                "slot_duration_minutes must be between 1 and {}, got {}",
                MINUTES_PER_DAY, self.slot_duration_minutes
            )));
        }
        Ok(())
    }

    pub fn into_entry(self, doctor_id: Uuid) -> WeeklyScheduleEntry {
        WeeklyScheduleEntry {
            doctor_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            slot_duration_minutes: self.slot_duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWeeklyScheduleRequest {
    #[serde(default)]
    pub entries: Vec<ScheduleEntryRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleResponse {
    pub doctor_id: Uuid,
    pub entries: Vec<WeeklyScheduleEntry>,
}
