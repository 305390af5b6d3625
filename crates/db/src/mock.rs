pub mod repositories;

#[cfg(test)]
pub async fn create_test_pool() -> Option<crate::DbPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    crate::schema::initialize_database(&pool)
        .await
        .expect("Failed to initialize test database schema");

    Some(pool)
}
