use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Cryptocurrencies::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Cryptocurrencies::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(Cryptocurrencies::CoinId).string().not_null().unique_key())
                .col(ColumnDef::new(Cryptocurrencies::Symbol).string().not_null())
                .col(ColumnDef::new(Cryptocurrencies::Name).string().not_null())
                .col(ColumnDef::new(Cryptocurrencies::CurrentPrice).double().null())
                .col(ColumnDef::new(Cryptocurrencies::MarketCap).double().null())
                .col(ColumnDef::new(Cryptocurrencies::PriceChange24h).double().null())
                .col(
                    ColumnDef::new(Cryptocurrencies::LastUpdated)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_cryptocurrencies_symbol")
                .table(Cryptocurrencies::Table)
                .col(Cryptocurrencies::Symbol)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cryptocurrencies::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
    CoinId,
    Symbol,
    Name,
    CurrentPrice,
    MarketCap,
    #[sea_orm(iden = "price_change_24h")]
    PriceChange24h,
    LastUpdated,
}
