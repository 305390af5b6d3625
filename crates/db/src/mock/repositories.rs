use async_trait::async_trait;
use carebook_core::{
    errors::CareResult,
    models::{
        appointment::{Appointment, AppointmentFilter, AppointmentPage},
        doctor::{CreateDoctorRequest, Doctor, UpdateDoctorRequest},
        schedule::WeeklyScheduleEntry,
    },
    repository::{Repository, RepositoryTx},
};
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

// Mock repository for handler and service tests
mock! {
    pub Repo {}

    #[async_trait]
    impl Repository for Repo {
        async fn begin(&self) -> CareResult<Box<dyn RepositoryTx>>;

        async fn create_doctor(&self, doctor: CreateDoctorRequest) -> CareResult<Doctor>;

        async fn get_doctor(&self, id: Uuid) -> CareResult<Option<Doctor>>;

        async fn list_doctors(&self, only_available: bool) -> CareResult<Vec<Doctor>>;

        async fn update_doctor(&self, id: Uuid, changes: UpdateDoctorRequest) -> CareResult<Option<Doctor>>;

        async fn get_weekly_schedule(&self, doctor_id: Uuid) -> CareResult<Vec<WeeklyScheduleEntry>>;

        async fn list_scheduled_appointments(
            &self,
            doctor_id: Uuid,
            from: NaiveDate,
            until: NaiveDate,
        ) -> CareResult<Vec<Appointment>>;

        async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>>;

        async fn list_appointments(&self, filter: AppointmentFilter) -> CareResult<AppointmentPage>;
    }
}
