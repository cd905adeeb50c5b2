use clinic_api::config::ApiConfig;
use clinic_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Fails fast on a missing DATABASE_URL or an inconsistent booking policy
    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url).await?;

    // Tables and indexes are created idempotently
    initialize_database(&db_pool).await?;

    clinic_api::start_server(config, db_pool).await?;

    Ok(())
}
