use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{ Deserialize, Serialize };

use crate::amount::Amount;
use crate::enums::TransactionType;

/// A recorded buy or sell. Amounts are fixed-point decimal(18, 8) and are
/// read back through a text cast so no backend rounds them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cryptocurrency_id: i32,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Decimal(Some((18, 8)))", select_as = "text")]
    pub quantity: Amount,
    #[sea_orm(column_type = "Decimal(Some((18, 8)))", select_as = "text")]
    pub price_per_coin: Amount,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cryptocurrency::Entity",
        from = "Column::CryptocurrencyId",
        to = "super::cryptocurrency::Column::Id",
        on_update = "Cascade",
        on_delete = "NoAction"
    )]
    Cryptocurrency,
}

impl Related<super::cryptocurrency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cryptocurrency.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            timestamp: Set(chrono::Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
