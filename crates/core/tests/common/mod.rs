#![allow(dead_code)]

use std::sync::Arc;

use carebook_core::{
    clock::FixedClock,
    memory::MemoryRepository,
    models::{
        doctor::{CreateDoctorRequest, Doctor},
        schedule::ScheduleEntryRequest,
    },
    services::AppointmentService,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub struct Fixture {
    pub repo: Arc<MemoryRepository>,
    pub clock: Arc<FixedClock>,
    pub service: AppointmentService,
}

impl Fixture {
    pub fn at(now: NaiveDateTime) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let clock = Arc::new(FixedClock::new(now));
        let service = AppointmentService::new(repo.clone(), clock.clone());
        Self { repo, clock, service }
    }

    pub async fn doctor(&self, name: &str) -> Doctor {
        self.service
            .create_doctor(CreateDoctorRequest {
                name: name.to_string(),
                specialization: "Cardiology".to_string(),
                email: None,
                phone: None,
                experience_years: Some(8),
                qualifications: None,
                is_available: true,
            })
            .await
            .expect("Failed to create doctor")
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_time(time(h, min))
}

pub fn day(day_of_week: u8, start: NaiveTime, end: NaiveTime, minutes: u32) -> ScheduleEntryRequest {
    ScheduleEntryRequest {
        day_of_week,
        start_time: start,
        end_time: end,
        slot_duration_minutes: minutes,
    }
}
