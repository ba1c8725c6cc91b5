//! Online pharmacy API server
//!
//! ```bash
//! DATABASE_URL=sqlite://pharmacy.db?mode=rwc cargo run -p pharmacy-api
//! ```
//!
//! Then visit:
//! - **API**: <http://localhost:5000/api/products>
//! - **Documentation**: <http://localhost:5000/docs>

use pharmacy_api::{AppConfig, AppState, app, migration::Migrator};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db: DatabaseConnection = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let state = AppState::new(db, &config.jwt_secret);
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %config.socket_addr(), "Listening; docs at /docs");
    axum::serve(listener, app(&state)).await?;
    Ok(())
}
