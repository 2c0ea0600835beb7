use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{ Deserialize, Serialize };

use crate::enums::AlertCondition;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cryptocurrency_id: i32,
    pub target_price: f64,
    pub condition: AlertCondition,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub triggered_at: Option<DateTimeUtc>,
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
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            triggered_at: Set(None),
            ..ActiveModelTrait::default()
        }
    }
}
