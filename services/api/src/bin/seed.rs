//! services/api/src/bin/seed.rs
//!
//! Creates the first admin account. Admins cannot self-register, so a fresh
//! database is bootstrapped with this binary. Running it twice is harmless.

use api_lib::{
    adapters::DbAdapter, config::Config, error::ApiError, web::auth::hash_password,
    web::auth::validate_credentials,
};
use booking_core::{DatabaseService, NewUser, PortError, Role};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn required(name: &str) -> Result<String, ApiError> {
    std::env::var(name).map_err(|_| ApiError::Internal(format!("{} must be set", name)))
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = required("ADMIN_EMAIL")?.trim().to_lowercase();
    let password = required("ADMIN_PASSWORD")?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    validate_credentials(&email, &password)?;

    let db_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    let db = DbAdapter::new(db_pool);
    db.run_migrations().await?;

    let admin = NewUser {
        email: email.clone(),
        hashed_password: hash_password(&password)?,
        name,
        role: Role::Admin,
        phone: None,
        image: None,
    };
    match db.create_user(admin).await {
        Ok(user) => info!(user_id = %user.id, %email, "Admin account created"),
        Err(PortError::Conflict(_)) => warn!(%email, "An account with this email already exists"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
