pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_cryptocurrencies_table;
mod m20240102_000001_create_price_history_table;
mod m20240103_000001_create_price_alerts_table;
mod m20240104_000001_create_portfolio_transactions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_cryptocurrencies_table::Migration),
            Box::new(m20240102_000001_create_price_history_table::Migration),
            Box::new(m20240103_000001_create_price_alerts_table::Migration),
            Box::new(m20240104_000001_create_portfolio_transactions_table::Migration)
        ]
    }
}
