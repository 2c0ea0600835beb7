use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(PriceAlerts::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PriceAlerts::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(PriceAlerts::CryptocurrencyId).integer().not_null())
                .col(ColumnDef::new(PriceAlerts::TargetPrice).double().not_null())
                .col(
                    ColumnDef::new(PriceAlerts::Condition)
                        .string_len(8)
                        .not_null()
                        .check(Expr::col(PriceAlerts::Condition).is_in(["above", "below"]))
                )
                .col(ColumnDef::new(PriceAlerts::IsActive).boolean().not_null().default(true))
                .col(
                    ColumnDef::new(PriceAlerts::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(PriceAlerts::TriggeredAt).timestamp_with_time_zone().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_price_alerts_cryptocurrency")
                        .from(PriceAlerts::Table, PriceAlerts::CryptocurrencyId)
                        .to(Cryptocurrencies::Table, Cryptocurrencies::Id)
                        .on_delete(ForeignKeyAction::NoAction)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_price_alerts_cryptocurrency_id")
                .table(PriceAlerts::Table)
                .col(PriceAlerts::CryptocurrencyId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_price_alerts_is_active")
                .table(PriceAlerts::Table)
                .col(PriceAlerts::IsActive)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PriceAlerts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PriceAlerts {
    Table,
    Id,
    CryptocurrencyId,
    TargetPrice,
    Condition,
    IsActive,
    CreatedAt,
    TriggeredAt,
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
}
