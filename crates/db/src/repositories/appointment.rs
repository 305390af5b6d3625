use crate::models::DbAppointment;
use carebook_core::models::appointment::{
    AppointmentFilter, AppointmentStatus, NewAppointment, SortOrder,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::{Result, eyre};
use sqlx::PgExecutor;
use uuid::Uuid;

const COLUMNS: &str =
    "id, patient_id, doctor_id, appointment_date, appointment_time, status, created_at, updated_at";

pub async fn create_appointment<'e, E>(executor: E, appointment: &NewAppointment) -> Result<DbAppointment>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, at {} {}",
        id,
        appointment.doctor_id,
        appointment.appointment_date,
        appointment.appointment_time
    );

    let created = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments ({COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment.patient_id)
    .bind(appointment.doctor_id)
    .bind(appointment.appointment_date)
    .bind(appointment.appointment_time)
    .bind(AppointmentStatus::Scheduled.as_str())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(created)
}

pub async fn find_scheduled_appointment<'e, E>(
    executor: E,
    doctor_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<Option<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE doctor_id = $1 AND appointment_date = $2 AND appointment_time = $3 AND status = 'scheduled'
        "#
    ))
    .bind(doctor_id)
    .bind(date)
    .bind(time)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

/// Same as [`get_appointment_by_id`] but locks the row until the
/// surrounding transaction ends.
pub async fn get_appointment_for_update<'e, E>(executor: E, id: Uuid) -> Result<Option<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        FOR UPDATE
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

pub async fn update_appointment_status<'e, E>(
    executor: E,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<DbAppointment>
where
    E: PgExecutor<'e>,
{
    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    updated.ok_or_else(|| eyre!("Appointment {} vanished during status update", id))
}

pub async fn list_scheduled_in_range<'e, E>(
    executor: E,
    doctor_id: Uuid,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE doctor_id = $1
          AND status = 'scheduled'
          AND appointment_date >= $2
          AND appointment_date < $3
        ORDER BY appointment_date ASC, appointment_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(from)
    .bind(until)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn count_scheduled_for_doctor<'e, E>(executor: E, doctor_id: Uuid) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE doctor_id = $1 AND status = 'scheduled'
        "#,
    )
    .bind(doctor_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

const FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR patient_id = $1)
      AND ($2::text IS NULL OR status = $2)
      AND ($3::date IS NULL OR appointment_date >= $3)
"#;

pub async fn count_filtered<'e, E>(executor: E, filter: &AppointmentFilter) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM appointments {FILTER}"))
        .bind(filter.patient_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from_date)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

pub async fn list_filtered<'e, E>(executor: E, filter: &AppointmentFilter) -> Result<Vec<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let direction = match filter.order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };
    let offset = i64::try_from(filter.offset()).map_err(|_| eyre!("Page {} is out of range", filter.page))?;

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        {FILTER}
        ORDER BY appointment_date {direction}, appointment_time {direction}, created_at {direction}
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(filter.patient_id)
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.from_date)
    .bind(i64::from(filter.per_page))
    .bind(offset)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}
