use crate::models::DbWeeklySchedule;
use carebook_core::models::schedule::WeeklyScheduleEntry;
use eyre::{Result, eyre};
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn get_weekly_schedule<'e, E>(executor: E, doctor_id: Uuid) -> Result<Vec<DbWeeklySchedule>>
where
    E: PgExecutor<'e>,
{
    let entries = sqlx::query_as::<_, DbWeeklySchedule>(
        r#"
        SELECT id, doctor_id, day_of_week, start_time, end_time, slot_duration_minutes
        FROM weekly_schedules
        WHERE doctor_id = $1
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

pub async fn delete_weekly_schedule<'e, E>(executor: E, doctor_id: Uuid) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        DELETE FROM weekly_schedules
        WHERE doctor_id = $1
        "#,
    )
    .bind(doctor_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn create_schedule_entry<'e, E>(executor: E, entry: &WeeklyScheduleEntry) -> Result<DbWeeklySchedule>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let slot_duration_minutes = i32::try_from(entry.slot_duration_minutes)
        .map_err(|_| eyre!("slot_duration_minutes {} out of range", entry.slot_duration_minutes))?;

    tracing::debug!(
        "Creating schedule entry: doctor_id={}, day_of_week={}, {}-{} every {} minutes",
        entry.doctor_id,
        entry.day_of_week,
        entry.start_time,
        entry.end_time,
        entry.slot_duration_minutes
    );

    let created = sqlx::query_as::<_, DbWeeklySchedule>(
        r#"
        INSERT INTO weekly_schedules (id, doctor_id, day_of_week, start_time, end_time, slot_duration_minutes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, doctor_id, day_of_week, start_time, end_time, slot_duration_minutes
        "#,
    )
    .bind(id)
    .bind(entry.doctor_id)
    .bind(i16::from(entry.day_of_week))
    .bind(entry.start_time)
    .bind(entry.end_time)
    .bind(slot_duration_minutes)
    .fetch_one(executor)
    .await?;

    Ok(created)
}
