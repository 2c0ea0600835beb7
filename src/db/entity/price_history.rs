use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{ Deserialize, Serialize };

/// One observed price sample. Rows are never updated once written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cryptocurrency_id: i32,
    pub price: f64,
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
