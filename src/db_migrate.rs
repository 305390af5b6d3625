use carebook_db::schema::initialize_database;
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    tracing::subscriber::set_global_default(FmtSubscriber::new())?;

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL must be set to run migrations")?;

    info!("Connecting to database...");
    let db_pool = carebook_db::create_pool(&database_url).await?;

    initialize_database(&db_pool).await?;

    Ok(())
}
