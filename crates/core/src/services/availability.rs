//! Slot enumeration.
//!
//! A doctor's open slots over a window are the slot starts of their weekly
//! schedule, day by day, minus the (date, time) pairs already held by a
//! scheduled appointment. The listing is computed lazily from a snapshot
//! taken when [`AppointmentService::list_available_slots`] returns, so it can
//! be iterated any number of times with identical results.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use super::AppointmentService;
use crate::errors::{CareError, CareResult};
use crate::models::{
    schedule::{SlotStarts, WeeklyScheduleEntry, weekday_index},
    slot::Slot,
};

/// Longest window a single listing may span.
pub const MAX_WINDOW_DAYS: u32 = 366;

impl AppointmentService {
    /// Lists the bookable slots of a doctor for `window_days` days starting at
    /// `window_start`, ordered by date then time.
    ///
    /// # Errors
    ///
    /// * `CareError::InvalidInput` - window shorter than one day or longer
    ///   than [`MAX_WINDOW_DAYS`]
    /// * `CareError::NotFound` - unknown doctor
    /// * `CareError::Database` - storage failure
    pub async fn list_available_slots(
        &self,
        doctor_id: Uuid,
        window_start: NaiveDate,
        window_days: u32,
    ) -> CareResult<AvailableSlots> {
        let window_end = window_end(window_start, window_days)?;
        self.require_doctor(doctor_id).await?;

        let entries = self.repo.get_weekly_schedule(doctor_id).await?;
        let booked = self
            .repo
            .list_scheduled_appointments(doctor_id, window_start, window_end)
            .await?;

        debug!(
            "Listing slots: doctor_id={}, from={}, days={}, schedule_entries={}, booked={}",
            doctor_id,
            window_start,
            window_days,
            entries.len(),
            booked.len()
        );

        Ok(AvailableSlots::new(
            doctor_id,
            window_start,
            window_days,
            entries,
            booked
                .iter()
                .map(|a| (a.appointment_date, a.appointment_time)),
        ))
    }
}

fn window_end(window_start: NaiveDate, window_days: u32) -> CareResult<NaiveDate> {
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(CareError::InvalidInput(format!(
            "Window length must be between 1 and {} days, got {}",
            MAX_WINDOW_DAYS, window_days
        )));
    }

    window_start
        .checked_add_days(Days::new(u64::from(window_days)))
        .ok_or_else(|| CareError::InvalidInput(format!("Window starting {} is out of range", window_start)))
}

/// Whether `time` on `date` is a slot start of the given weekly schedule.
pub(crate) fn is_schedule_slot(entries: &[WeeklyScheduleEntry], date: NaiveDate, time: NaiveTime) -> bool {
    let day = weekday_index(date.weekday());
    entries
        .iter()
        .filter(|entry| entry.day_of_week == day)
        .any(|entry| entry.is_slot_start(time))
}

/// Open slots of one doctor over a date window.
#[derive(Debug, Clone)]
pub struct AvailableSlots {
    doctor_id: Uuid,
    start: NaiveDate,
    days: u32,
    week: [Option<WeeklyScheduleEntry>; 7],
    booked: HashSet<(NaiveDate, NaiveTime)>,
}

impl AvailableSlots {
    pub fn new(
        doctor_id: Uuid,
        start: NaiveDate,
        days: u32,
        entries: Vec<WeeklyScheduleEntry>,
        booked: impl IntoIterator<Item = (NaiveDate, NaiveTime)>,
    ) -> Self {
        let mut week: [Option<WeeklyScheduleEntry>; 7] = Default::default();

        for entry in entries {
            if entry.weekday().is_none() || entry.slot_duration_minutes == 0 {
                warn!(
                    "Skipping unusable schedule entry: doctor_id={}, day_of_week={}, slot_duration_minutes={}",
                    entry.doctor_id, entry.day_of_week, entry.slot_duration_minutes
                );
                continue;
            }

            let day = usize::from(entry.day_of_week);
            if week[day].is_some() {
                warn!(
                    "Duplicate schedule entry for doctor_id={} on day_of_week={}, keeping the last one",
                    entry.doctor_id, entry.day_of_week
                );
            }
            week[day] = Some(entry);
        }

        Self {
            doctor_id,
            start,
            days,
            week,
            booked: booked.into_iter().collect(),
        }
    }

    pub fn doctor_id(&self) -> Uuid {
        self.doctor_id
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn iter(&self) -> AvailableSlotsIter<'_> {
        AvailableSlotsIter {
            slots: self,
            day: 0,
            current: None,
        }
    }

    pub fn to_vec(&self) -> Vec<Slot> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a AvailableSlots {
    type Item = Slot;
    type IntoIter = AvailableSlotsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct AvailableSlotsIter<'a> {
    slots: &'a AvailableSlots,
    day: u32,
    current: Option<(NaiveDate, SlotStarts)>,
}

impl Iterator for AvailableSlotsIter<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        loop {
            if let Some((date, starts)) = &mut self.current {
                let date = *date;
                let booked = &self.slots.booked;
                if let Some(time) = starts.find(|time| !booked.contains(&(date, *time))) {
                    return Some(Slot::new(date, time));
                }
            }
            self.current = None;

            if self.day >= self.slots.days {
                return None;
            }
            let date = self.slots.start.checked_add_days(Days::new(u64::from(self.day)))?;
            self.day += 1;

            if let Some(entry) = &self.slots.week[usize::from(weekday_index(date.weekday()))] {
                self.current = Some((date, entry.slot_starts()));
            }
        }
    }
}
