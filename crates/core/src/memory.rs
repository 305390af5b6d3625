//! In-process implementation of the repository traits.
//!
//! Transactions take the store lock for their whole lifetime, so they are
//! fully serialized. They write straight into the shared state and keep an
//! undo log; dropping a transaction without committing replays the log in
//! reverse, so a rolled back transaction leaves no trace. Scheduled slots are
//! indexed by doctor, date and time, which enforces the
//! one-scheduled-appointment-per-slot rule on insert the same way the
//! PostgreSQL partial unique index does it.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};
use crate::models::{
    appointment::{
        Appointment, AppointmentFilter, AppointmentPage, AppointmentStatus, NewAppointment,
        SortOrder,
    },
    doctor::{CreateDoctorRequest, Doctor, UpdateDoctorRequest},
    schedule::WeeklyScheduleEntry,
};
use crate::repository::{Repository, RepositoryTx};

type SlotIndexKey = (Uuid, NaiveDate, NaiveTime);

fn slot_of(appointment: &Appointment) -> SlotIndexKey {
    (
        appointment.doctor_id,
        appointment.appointment_date,
        appointment.appointment_time,
    )
}

#[derive(Debug, Default)]
struct MemoryState {
    doctors: BTreeMap<Uuid, Doctor>,
    schedules: HashMap<Uuid, Vec<WeeklyScheduleEntry>>,
    appointments: BTreeMap<Uuid, Appointment>,
    /// Scheduled appointment holding each booked slot.
    scheduled: HashMap<SlotIndexKey, Uuid>,
}

impl MemoryState {
    fn scheduled_at(&self, doctor_id: Uuid, date: NaiveDate, time: NaiveTime) -> Option<&Appointment> {
        self.scheduled
            .get(&(doctor_id, date, time))
            .and_then(|id| self.appointments.get(id))
    }

    /// Stores `appointment`, keeping the slot index in step. Returns the
    /// version it replaced.
    fn put_appointment(&mut self, appointment: Appointment) -> Option<Appointment> {
        let previous = self.remove_appointment(appointment.id);
        if appointment.is_scheduled() {
            self.scheduled.insert(slot_of(&appointment), appointment.id);
        }
        self.appointments.insert(appointment.id, appointment);
        previous
    }

    fn remove_appointment(&mut self, id: Uuid) -> Option<Appointment> {
        let previous = self.appointments.remove(&id)?;
        let slot = slot_of(&previous);
        if self.scheduled.get(&slot) == Some(&id) {
            self.scheduled.remove(&slot);
        }
        Some(previous)
    }

    fn revert(&mut self, change: Undo) {
        match change {
            Undo::Appointment { id, previous } => {
                match previous {
                    Some(appointment) => self.put_appointment(appointment),
                    None => self.remove_appointment(id),
                };
            }
            Undo::Doctor { id, previous } => {
                match previous {
                    Some(doctor) => self.doctors.insert(id, doctor),
                    None => self.doctors.remove(&id),
                };
            }
            Undo::Schedule { doctor_id, previous } => {
                match previous {
                    Some(entries) => self.schedules.insert(doctor_id, entries),
                    None => self.schedules.remove(&doctor_id),
                };
            }
        }
    }
}

/// What a record looked like before a transaction touched it.
#[derive(Debug)]
enum Undo {
    Appointment {
        id: Uuid,
        previous: Option<Appointment>,
    },
    Doctor {
        id: Uuid,
        previous: Option<Doctor>,
    },
    Schedule {
        doctor_id: Uuid,
        previous: Option<Vec<WeeklyScheduleEntry>>,
    },
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn begin(&self) -> CareResult<Box<dyn RepositoryTx>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTx {
            guard,
            undo: Vec::new(),
        }))
    }

    async fn create_doctor(&self, doctor: CreateDoctorRequest) -> CareResult<Doctor> {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: doctor.name,
            specialization: doctor.specialization,
            email: doctor.email,
            phone: doctor.phone,
            experience_years: doctor.experience_years,
            qualifications: doctor.qualifications,
            is_available: doctor.is_available,
            created_at: Utc::now(),
        };

        let mut state = self.state.lock().await;
        state.doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn get_doctor(&self, id: Uuid) -> CareResult<Option<Doctor>> {
        let state = self.state.lock().await;
        Ok(state.doctors.get(&id).cloned())
    }

    async fn list_doctors(&self, only_available: bool) -> CareResult<Vec<Doctor>> {
        let state = self.state.lock().await;
        let mut doctors: Vec<Doctor> = state
            .doctors
            .values()
            .filter(|d| !only_available || d.is_available)
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    async fn update_doctor(&self, id: Uuid, changes: UpdateDoctorRequest) -> CareResult<Option<Doctor>> {
        let mut state = self.state.lock().await;
        let Some(doctor) = state.doctors.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(doctor);
        Ok(Some(doctor.clone()))
    }

    async fn get_weekly_schedule(&self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>> {
        let state = self.state.lock().await;
        Ok(state.schedules.get(&doctor_id).cloned().unwrap_or_default())
    }

    async fn list_scheduled_appointments(
        &self,
        doctor_id: Uuid,
        from: NaiveDate,
        until: NaiveDate,
    ) -> CareResult<Vec<Appointment>> {
        let state = self.state.lock().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.is_scheduled()
                    && a.appointment_date >= from
                    && a.appointment_date < until
            })
            .cloned()
            .collect();
        appointments.sort_by_key(Appointment::starts_at);
        Ok(appointments)
    }

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>> {
        let state = self.state.lock().await;
        Ok(state.appointments.get(&id).cloned())
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> CareResult<AppointmentPage> {
        let state = self.state.lock().await;
        let mut matching: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| filter.patient_id.is_none_or(|p| a.patient_id == p))
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| filter.from_date.is_none_or(|d| a.appointment_date >= d))
            .cloned()
            .collect();

        matching.sort_by_key(|a| (a.starts_at(), a.created_at));
        if filter.order == SortOrder::Descending {
            matching.reverse();
        }

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.per_page as usize)
            .collect();

        Ok(AppointmentPage {
            items,
            page: filter.page,
            per_page: filter.per_page,
            total,
        })
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    undo: Vec<Undo>,
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        while let Some(change) = self.undo.pop() {
            self.guard.revert(change);
        }
    }
}

#[async_trait]
impl RepositoryTx for MemoryTx {
    async fn get_doctor(&mut self, id: Uuid) -> CareResult<Option<Doctor>> {
        Ok(self.guard.doctors.get(&id).cloned())
    }

    async fn get_doctor_for_update(&mut self, id: Uuid) -> CareResult<Option<Doctor>> {
        Ok(self.guard.doctors.get(&id).cloned())
    }

    async fn get_weekly_schedule(&mut self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>> {
        Ok(self.guard.schedules.get(&doctor_id).cloned().unwrap_or_default())
    }

    async fn find_scheduled_appointment(
        &mut self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> CareResult<Option<Appointment>> {
        Ok(self.guard.scheduled_at(doctor_id, date, time).cloned())
    }

    async fn insert_appointment(&mut self, appointment: NewAppointment) -> CareResult<Appointment> {
        if self
            .guard
            .scheduled_at(
                appointment.doctor_id,
                appointment.appointment_date,
                appointment.appointment_time,
            )
            .is_some()
        {
            return Err(CareError::SlotConflict(format!(
                "Doctor {} is already booked on {} at {}",
                appointment.doctor_id, appointment.appointment_date, appointment.appointment_time
            )));
        }

        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        let previous = self.guard.put_appointment(created.clone());
        self.undo.push(Undo::Appointment {
            id: created.id,
            previous,
        });
        Ok(created)
    }

    async fn get_appointment_for_update(&mut self, id: Uuid) -> CareResult<Option<Appointment>> {
        Ok(self.guard.appointments.get(&id).cloned())
    }

    async fn update_appointment_status(
        &mut self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> CareResult<Appointment> {
        let mut appointment = self
            .guard
            .appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", id)))?;
        appointment.status = status;
        appointment.updated_at = Utc::now();

        let previous = self.guard.put_appointment(appointment.clone());
        self.undo.push(Undo::Appointment { id, previous });
        Ok(appointment)
    }

    async fn replace_weekly_schedule(
        &mut self,
        doctor_id: Uuid,
        entries: &[WeeklyScheduleEntry],
    ) -> CareResult<()> {
        let mut entries = entries.to_vec();
        entries.sort_by_key(|e| e.day_of_week);
        let previous = self.guard.schedules.insert(doctor_id, entries);
        self.undo.push(Undo::Schedule { doctor_id, previous });
        Ok(())
    }

    async fn count_scheduled_appointments(&mut self, doctor_id: Uuid) -> CareResult<u64> {
        let count = self
            .guard
            .scheduled
            .keys()
            .filter(|(doctor, _, _)| *doctor == doctor_id)
            .count();
        Ok(count as u64)
    }

    async fn delete_doctor(&mut self, doctor_id: Uuid) -> CareResult<()> {
        let Some(doctor) = self.guard.doctors.remove(&doctor_id) else {
            return Err(CareError::NotFound(format!(
                "Doctor with ID {} not found",
                doctor_id
            )));
        };
        self.undo.push(Undo::Doctor {
            id: doctor_id,
            previous: Some(doctor),
        });
        let schedule = self.guard.schedules.remove(&doctor_id);
        self.undo.push(Undo::Schedule {
            doctor_id,
            previous: schedule,
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> CareResult<()> {
        let mut tx = self;
        tx.undo.clear();
        Ok(())
    }
}
