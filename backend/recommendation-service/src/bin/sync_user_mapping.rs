//! One-off job: create `user_mapping` rows for auth users that have none.

use anyhow::Context;
use hotel_recommendation_service::db::UserMappingRepo;
use hotel_recommendation_service::jobs::sync_user_mappings;
use hotel_recommendation_service::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = UserMappingRepo::new(pool);
    let report = sync_user_mappings(&repo)
        .await
        .context("User mapping sync failed")?;

    if report.created == 0 {
        println!("No new users to sync.");
    } else {
        println!("Synced {} new users.", report.created);
    }

    Ok(())
}
