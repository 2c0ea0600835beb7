use anyhow::Context;
use coin_tracker::{ Config, DatabaseEngine };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "coin_tracker=debug,sea_orm=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Refuse to start without a usable DATABASE_URL
    let config = Config::from_env().context("failed to load configuration")?;

    let engine = DatabaseEngine::connect(&config).await.context("failed to connect to database")?;

    engine.init_schema().await.context("failed to initialize schema")?;

    tracing::info!("Schema ready");

    engine.close().await?;

    Ok(())
}
