use std::sync::Arc;

use carebook_api::config::ApiConfig;
use carebook_core::{memory::MemoryRepository, repository::Repository};
use carebook_db::{PgRepository, create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    carebook_api::init_tracing(&config)?;

    let repo: Arc<dyn Repository> = match &config.database_url {
        Some(database_url) => {
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;
            info!("Using PostgreSQL storage");
            Arc::new(PgRepository::new(db_pool))
        }
        None => {
            warn!("DATABASE_URL is not set, appointments are kept in memory and lost on exit");
            Arc::new(MemoryRepository::new())
        }
    };

    // Start API server
    carebook_api::start_server(config, repo).await?;

    Ok(())
}
