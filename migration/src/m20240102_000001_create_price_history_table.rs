use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(PriceHistory::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PriceHistory::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(PriceHistory::CryptocurrencyId).integer().not_null())
                .col(ColumnDef::new(PriceHistory::Price).double().not_null())
                .col(
                    ColumnDef::new(PriceHistory::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_price_history_cryptocurrency")
                        .from(PriceHistory::Table, PriceHistory::CryptocurrencyId)
                        .to(Cryptocurrencies::Table, Cryptocurrencies::Id)
                        .on_delete(ForeignKeyAction::NoAction)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // Time-series reads are always per coin, newest first
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_price_history_coin_timestamp")
                .table(PriceHistory::Table)
                .col(PriceHistory::CryptocurrencyId)
                .col(PriceHistory::Timestamp)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PriceHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PriceHistory {
    Table,
    Id,
    CryptocurrencyId,
    Price,
    Timestamp,
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
}
