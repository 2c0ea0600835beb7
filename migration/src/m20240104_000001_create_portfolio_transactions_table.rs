use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager.create_table(
            Table::create()
                .table(PortfolioTransactions::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PortfolioTransactions::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(PortfolioTransactions::CryptocurrencyId).integer().not_null())
                .col(
                    ColumnDef::new(PortfolioTransactions::TransactionType)
                        .string_len(4)
                        .not_null()
                        .check(
                            Expr::col(PortfolioTransactions::TransactionType).is_in(["buy", "sell"])
                        )
                )
                .col(amount_column(PortfolioTransactions::Quantity, backend))
                .col(amount_column(PortfolioTransactions::PricePerCoin, backend))
                .col(
                    ColumnDef::new(PortfolioTransactions::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_portfolio_transactions_cryptocurrency")
                        .from(PortfolioTransactions::Table, PortfolioTransactions::CryptocurrencyId)
                        .to(Cryptocurrencies::Table, Cryptocurrencies::Id)
                        .on_delete(ForeignKeyAction::NoAction)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_portfolio_transactions_coin_timestamp")
                .table(PortfolioTransactions::Table)
                .col(PortfolioTransactions::CryptocurrencyId)
                .col(PortfolioTransactions::Timestamp)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PortfolioTransactions::Table).to_owned()).await
    }
}

/// decimal(18, 8), or TEXT on SQLite, which has no exact decimal type and
/// whose sea-query DDL rejects precision above 16.
fn amount_column<T: IntoIden>(name: T, backend: DatabaseBackend) -> ColumnDef {
    let mut def = ColumnDef::new(name);
    match backend {
        DatabaseBackend::Sqlite => def.text(),
        _ => def.decimal_len(18, 8),
    };
    def.not_null();
    def
}

#[derive(DeriveIden)]
enum PortfolioTransactions {
    Table,
    Id,
    CryptocurrencyId,
    TransactionType,
    Quantity,
    PricePerCoin,
    Timestamp,
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_sql<T: SchemaBuilder>(backend: DatabaseBackend, builder: T) -> String {
        Table::create()
            .table(PortfolioTransactions::Table)
            .col(amount_column(PortfolioTransactions::Quantity, backend))
            .to_string(builder)
    }

    #[test]
    fn test_amount_column_per_backend() {
        let sqlite = create_sql(DatabaseBackend::Sqlite, SqliteQueryBuilder);
        assert!(sqlite.contains("\"quantity\" text NOT NULL"), "{sqlite}");

        let postgres = create_sql(DatabaseBackend::Postgres, PostgresQueryBuilder);
        assert!(postgres.contains("\"quantity\" decimal(18, 8) NOT NULL"), "{postgres}");
    }
}
