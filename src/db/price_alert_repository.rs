use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};

use crate::db::entity::{ price_alert, PriceAlert };
use crate::enums::AlertCondition;
use crate::error::{ AppError, Result };

pub struct PriceAlertRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PriceAlertRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Create an active alert
    pub async fn create(
        &self,
        cryptocurrency_id: i32,
        target_price: f64,
        condition: AlertCondition
    ) -> Result<price_alert::Model> {
        let alert = price_alert::ActiveModel {
            cryptocurrency_id: Set(cryptocurrency_id),
            target_price: Set(target_price),
            condition: Set(condition),
            ..Default::default()
        };

        let alert = alert.insert(self.db).await?;
        Ok(alert)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<price_alert::Model> {
        PriceAlert::find_by_id(id)
            .one(self.db).await?
            .ok_or_else(|| AppError::NotFound(format!("Price alert {}", id)))
    }

    /// Active alerts, optionally for a single coin, oldest first
    pub async fn find_active(
        &self,
        cryptocurrency_id: Option<i32>
    ) -> Result<Vec<price_alert::Model>> {
        let mut query = PriceAlert::find().filter(price_alert::Column::IsActive.eq(true));

        if let Some(cryptocurrency_id) = cryptocurrency_id {
            query = query.filter(price_alert::Column::CryptocurrencyId.eq(cryptocurrency_id));
        }

        let alerts = query.order_by_asc(price_alert::Column::Id).all(self.db).await?;
        Ok(alerts)
    }

    /// Mark alert as triggered
    pub async fn mark_triggered(&self, id: i32) -> Result<price_alert::Model> {
        let alert = self.find_by_id(id).await?;

        let mut active: price_alert::ActiveModel = alert.into();
        active.is_active = Set(false);
        active.triggered_at = Set(Some(Utc::now()));

        let alert = active.update(self.db).await?;
        tracing::debug!(id = alert.id, "Price alert triggered");
        Ok(alert)
    }

    /// Delete an alert
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = PriceAlert::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Price alert {}", id)));
        }

        Ok(())
    }
}
