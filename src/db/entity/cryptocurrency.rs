use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cryptocurrencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Stable identifier from the external price-data provider, e.g. "bitcoin".
    #[sea_orm(unique)]
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    /// 24h change in percent.
    pub price_change_24h: Option<f64>,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_history::Entity")]
    PriceHistory,
    #[sea_orm(has_many = "super::price_alert::Entity")]
    PriceAlert,
    #[sea_orm(has_many = "super::portfolio_transaction::Entity")]
    PortfolioTransaction,
}

impl Related<super::price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl Related<super::price_alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceAlert.def()
    }
}

impl Related<super::portfolio_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortfolioTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            last_updated: Set(chrono::Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
