//! # pharmacy-api
//!
//! The axum + sea-orm backend of the online pharmacy: a public catalog,
//! patient prescriptions and an admin back-office. List endpoints are built on
//! the [`pharmacy`] query layer; everything here binds it to concrete tables.
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let db = Database::connect(&config.database_url).await?;
//! Migrator::up(&db, None).await?;
//! let app = routes::app(&AppState::new(db, &config.jwt_secret));
//! ```

pub mod auth;
pub mod config;
pub mod entities;
pub mod migration;
pub mod payload;
pub mod resources;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::app;
pub use state::AppState;
