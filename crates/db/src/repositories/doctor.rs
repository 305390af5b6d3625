use crate::models::DbDoctor;
use carebook_core::models::doctor::{CreateDoctorRequest, UpdateDoctorRequest};
use chrono::Utc;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn create_doctor<'e, E>(executor: E, doctor: &CreateDoctorRequest) -> Result<DbDoctor>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating doctor: id={}, name={}", id, doctor.name);

    let created = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        "#,
    )
    .bind(id)
    .bind(&doctor.name)
    .bind(&doctor.specialization)
    .bind(doctor.email.as_deref())
    .bind(doctor.phone.as_deref())
    .bind(doctor.experience_years)
    .bind(doctor.qualifications.as_deref())
    .bind(doctor.is_available)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(created)
}

pub async fn get_doctor_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbDoctor>>
where
    E: PgExecutor<'e>,
{
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doctor)
}

/// Reads a doctor under `FOR SHARE`. Concurrent bookings can hold the row
/// together, while removal and schedule replacement wait for them.
pub async fn get_doctor_for_share<'e, E>(executor: E, id: Uuid) -> Result<Option<DbDoctor>>
where
    E: PgExecutor<'e>,
{
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        FROM doctors
        WHERE id = $1
        FOR SHARE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doctor)
}

pub async fn get_doctor_for_update<'e, E>(executor: E, id: Uuid) -> Result<Option<DbDoctor>>
where
    E: PgExecutor<'e>,
{
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        FROM doctors
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(doctor)
}

pub async fn list_doctors<'e, E>(executor: E, only_available: bool) -> Result<Vec<DbDoctor>>
where
    E: PgExecutor<'e>,
{
    let doctors = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        FROM doctors
        WHERE ($1 = FALSE OR is_available = TRUE)
        ORDER BY name ASC
        "#,
    )
    .bind(only_available)
    .fetch_all(executor)
    .await?;

    Ok(doctors)
}

/// Overwrites the columns whose change is set and keeps the others.
pub async fn update_doctor<'e, E>(
    executor: E,
    id: Uuid,
    changes: &UpdateDoctorRequest,
) -> Result<Option<DbDoctor>>
where
    E: PgExecutor<'e>,
{
    tracing::debug!("Updating doctor: id={}", id);

    let updated = sqlx::query_as::<_, DbDoctor>(
        r#"
        UPDATE doctors
        SET name = COALESCE($2, name),
            specialization = COALESCE($3, specialization),
            email = COALESCE($4, email),
            phone = COALESCE($5, phone),
            experience_years = COALESCE($6, experience_years),
            qualifications = COALESCE($7, qualifications),
            is_available = COALESCE($8, is_available)
        WHERE id = $1
        RETURNING id, name, specialization, email, phone, experience_years, qualifications, is_available, created_at
        "#,
    )
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.specialization.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.phone.as_deref())
    .bind(changes.experience_years)
    .bind(changes.qualifications.as_deref())
    .bind(changes.is_available)
    .fetch_optional(executor)
    .await?;

    Ok(updated)
}

/// Deletes a doctor; their weekly schedule goes with them through the
/// cascading foreign key. Returns whether a row was deleted.
pub async fn delete_doctor<'e, E>(executor: E, id: Uuid) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
