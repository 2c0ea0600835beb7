use migration::{ Migrator, MigratorTrait };
use sea_orm::{
    ConnectOptions,
    ConnectionTrait,
    DatabaseConnection,
    DatabaseTransaction,
    TransactionTrait,
};

use crate::config::Config;
use crate::error::Result;

pub mod entity;
pub use entity::*;

mod cryptocurrency_repository;
pub use cryptocurrency_repository::{ CryptocurrencyRepository, MarketData, NewCryptocurrency };

mod price_history_repository;
pub use price_history_repository::PriceHistoryRepository;

mod price_alert_repository;
pub use price_alert_repository::PriceAlertRepository;

mod portfolio_transaction_repository;
pub use portfolio_transaction_repository::{
    NewPortfolioTransaction,
    PortfolioTransactionRepository,
};

/// A unit of work bound to the shared pool.
///
/// Nothing written through a session is visible to other connections until
/// [`DatabaseTransaction::commit`] is called. `rollback()`, or dropping the
/// session, discards the work.
pub type Session = DatabaseTransaction;

/// The process-wide connection pool plus schema and session helpers.
///
/// Constructed once from a [`Config`] and shared by reference (or `Arc`)
/// with everything that needs database access.
#[derive(Debug, Clone)]
pub struct DatabaseEngine {
    conn: DatabaseConnection,
}

impl DatabaseEngine {
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .sqlx_logging(config.sql_logging);

        tracing::info!(url = %config.redacted_url(), "Connecting to database");

        let conn = sea_orm::Database::connect(options).await?;

        tracing::info!(backend = ?conn.get_database_backend(), "Database connected");

        Ok(Self { conn })
    }

    /// Create any missing tables and indexes. Existing tables are left as
    /// they are, so this is safe to run on every startup.
    pub async fn init_schema(&self) -> Result<()> {
        let pending = Migrator::get_pending_migrations(&self.conn).await?;

        if pending.is_empty() {
            tracing::debug!("Schema up to date");
            return Ok(());
        }

        tracing::info!("Applying {} pending migration(s)", pending.len());
        Migrator::up(&self.conn, None).await?;
        tracing::info!("Schema initialized");

        Ok(())
    }

    /// Open a new session. The caller owns it and must commit or roll back.
    pub async fn new_session(&self) -> Result<Session> {
        let session = self.conn.begin().await?;
        tracing::trace!("Session opened");
        Ok(session)
    }

    /// The shared pool, for reads that don't need a session.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub async fn ping(&self) -> Result<()> {
        self.conn.ping().await?;
        Ok(())
    }

    /// Close every pooled connection. The engine is unusable afterwards.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}
