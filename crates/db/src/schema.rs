use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const STATEMENTS: &[&str] = &[
    // Doctors
    r#"
    CREATE TABLE IF NOT EXISTS doctors (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(100) NOT NULL,
        specialization VARCHAR(100) NOT NULL,
        email VARCHAR(120) NULL,
        phone VARCHAR(15) NULL,
        experience_years INTEGER NULL,
        qualifications TEXT NULL,
        is_available BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    // Weekly recurring schedule, one row per doctor and weekday (0 = Monday)
    r#"
    CREATE TABLE IF NOT EXISTS weekly_schedules (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        doctor_id UUID NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
        day_of_week SMALLINT NOT NULL,
        start_time TIME NOT NULL,
        end_time TIME NOT NULL,
        slot_duration_minutes INTEGER NOT NULL DEFAULT 30,
        CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
        CONSTRAINT valid_schedule_range CHECK (end_time > start_time),
        CONSTRAINT valid_slot_duration CHECK (slot_duration_minutes > 0),
        CONSTRAINT one_entry_per_day UNIQUE (doctor_id, day_of_week)
    );
    "#,
    // Appointments are a historical record and keep their doctor_id after
    // the doctor is removed, hence no foreign key.
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        patient_id UUID NOT NULL,
        doctor_id UUID NOT NULL,
        appointment_date DATE NOT NULL,
        appointment_time TIME NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'scheduled',
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_status CHECK (status IN ('scheduled', 'cancelled'))
    );
    "#,
    // At most one scheduled appointment per doctor and slot
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS uq_appointments_scheduled_slot
        ON appointments (doctor_id, appointment_date, appointment_time)
        WHERE status = 'scheduled';
    "#,
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id);",
    "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_date ON appointments(doctor_id, appointment_date);",
    "CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
