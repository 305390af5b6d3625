//! Appointment listings for patients and administrators.

use uuid::Uuid;

use super::AppointmentService;
use crate::errors::{CareError, CareResult};
use crate::models::appointment::{
    Appointment, AppointmentFilter, AppointmentPage, AppointmentStatus, SortOrder,
};

pub const HISTORY_PAGE_SIZE: u32 = 10;
pub const ADMIN_PAGE_SIZE: u32 = 20;
/// Rows fetched per query while collecting upcoming appointments.
const UPCOMING_BATCH: u32 = 100;

impl AppointmentService {
    /// Every scheduled appointment of the patient from today on, soonest
    /// first. The list is not paginated.
    pub async fn upcoming_appointments(&self, patient_id: Uuid) -> CareResult<Vec<Appointment>> {
        let mut filter = AppointmentFilter {
            patient_id: Some(patient_id),
            status: Some(AppointmentStatus::Scheduled),
            from_date: Some(self.clock.today()),
            order: SortOrder::Ascending,
            page: 1,
            per_page: UPCOMING_BATCH,
        };

        let mut upcoming = Vec::new();
        loop {
            let batch = self.repo.list_appointments(filter.clone()).await?;
            let fetched = batch.items.len();
            upcoming.extend(batch.items);
            if fetched < UPCOMING_BATCH as usize || upcoming.len() as u64 >= batch.total {
                return Ok(upcoming);
            }
            filter.page += 1;
        }
    }

    /// All appointments of the patient, newest first.
    pub async fn appointment_history(&self, patient_id: Uuid, page: u32) -> CareResult<AppointmentPage> {
        check_page(page)?;
        self.repo
            .list_appointments(AppointmentFilter {
                patient_id: Some(patient_id),
                status: None,
                from_date: None,
                order: SortOrder::Descending,
                page,
                per_page: HISTORY_PAGE_SIZE,
            })
            .await
    }

    /// Every appointment in the system, newest first, optionally by status.
    pub async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
        page: u32,
    ) -> CareResult<AppointmentPage> {
        check_page(page)?;
        self.repo
            .list_appointments(AppointmentFilter {
                patient_id: None,
                status,
                from_date: None,
                order: SortOrder::Descending,
                page,
                per_page: ADMIN_PAGE_SIZE,
            })
            .await
    }
}

fn check_page(page: u32) -> CareResult<()> {
    if page == 0 {
        return Err(CareError::InvalidInput("Pages start at 1".to_string()));
    }
    Ok(())
}
