use sea_orm::prelude::DateTimeUtc;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};

use crate::db::entity::{ price_history, PriceHistory };
use crate::error::Result;

pub struct PriceHistoryRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PriceHistoryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Append one price sample. `observed_at` defaults to now.
    pub async fn record(
        &self,
        cryptocurrency_id: i32,
        price: f64,
        observed_at: Option<DateTimeUtc>
    ) -> Result<price_history::Model> {
        let mut sample = price_history::ActiveModel {
            cryptocurrency_id: Set(cryptocurrency_id),
            price: Set(price),
            ..Default::default()
        };
        if let Some(at) = observed_at {
            sample.timestamp = Set(at);
        }

        let sample = sample.insert(self.db).await?;
        Ok(sample)
    }

    /// Samples for one coin, newest first.
    pub async fn find_for_coin(
        &self,
        cryptocurrency_id: i32,
        since: Option<DateTimeUtc>,
        limit: Option<u64>
    ) -> Result<Vec<price_history::Model>> {
        let mut query = PriceHistory::find()
            .filter(price_history::Column::CryptocurrencyId.eq(cryptocurrency_id))
            .order_by_desc(price_history::Column::Timestamp)
            .order_by_desc(price_history::Column::Id);

        if let Some(since) = since {
            query = query.filter(price_history::Column::Timestamp.gte(since));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let samples = query.all(self.db).await?;
        Ok(samples)
    }

    pub async fn latest(&self, cryptocurrency_id: i32) -> Result<Option<price_history::Model>> {
        let sample = PriceHistory::find()
            .filter(price_history::Column::CryptocurrencyId.eq(cryptocurrency_id))
            .order_by_desc(price_history::Column::Timestamp)
            .order_by_desc(price_history::Column::Id)
            .one(self.db).await?;

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{ Duration, TimeZone, Utc };

    use super::*;
    use crate::db::test_support::memory_engine;
    use crate::db::{ CryptocurrencyRepository, NewCryptocurrency };

    async fn seed_coin<C: ConnectionTrait>(db: &C) -> i32 {
        CryptocurrencyRepository::new(db)
            .create(NewCryptocurrency {
                coin_id: "bitcoin".to_string(),
                symbol: "BTC".to_string(),
                name: "Bitcoin".to_string(),
                current_price: None,
                market_cap: None,
                price_change_24h: None,
            }).await
            .unwrap().id
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;
        let repo = PriceHistoryRepository::new(db);

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        for (i, price) in [64000.0, 64500.0, 63900.0].into_iter().enumerate() {
            repo.record(coin_id, price, Some(start + Duration::minutes(i as i64))).await.unwrap();
        }

        let prices: Vec<f64> = repo
            .find_for_coin(coin_id, None, None).await
            .unwrap()
            .into_iter()
            .map(|s| s.price)
            .collect();
        assert_eq!(prices, vec![63900.0, 64500.0, 64000.0]);

        let recent = repo
            .find_for_coin(coin_id, Some(start + Duration::minutes(1)), Some(1)).await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].price, 63900.0);

        assert_eq!(repo.latest(coin_id).await.unwrap().unwrap().price, 63900.0);
    }

    #[tokio::test]
    async fn test_record_defaults_timestamp() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;

        let before = Utc::now() - Duration::seconds(1);
        let sample = PriceHistoryRepository::new(db).record(coin_id, 1.0, None).await.unwrap();
        assert!(sample.timestamp >= before);
        assert!(PriceHistoryRepository::new(db).latest(coin_id + 1).await.unwrap().is_none());
    }
}
