use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};

use crate::db::entity::{ cryptocurrency, Cryptocurrency };
use crate::error::{ AppError, Result };

#[derive(Debug, Clone)]
pub struct NewCryptocurrency {
    pub coin_id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_24h: Option<f64>,
}

/// Fields refreshed by the price-feed updater.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketData {
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_24h: Option<f64>,
}

pub struct CryptocurrencyRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CryptocurrencyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewCryptocurrency) -> Result<cryptocurrency::Model> {
        let coin = cryptocurrency::ActiveModel {
            coin_id: Set(input.coin_id),
            symbol: Set(input.symbol),
            name: Set(input.name),
            current_price: Set(input.current_price),
            market_cap: Set(input.market_cap),
            price_change_24h: Set(input.price_change_24h),
            ..Default::default()
        };

        let coin = coin.insert(self.db).await?;
        tracing::debug!(id = coin.id, coin_id = %coin.coin_id, "Cryptocurrency created");
        Ok(coin)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<cryptocurrency::Model> {
        Cryptocurrency::find_by_id(id)
            .one(self.db).await?
            .ok_or_else(|| AppError::NotFound(format!("Cryptocurrency {}", id)))
    }

    pub async fn find_by_coin_id(&self, coin_id: &str) -> Result<Option<cryptocurrency::Model>> {
        let coin = Cryptocurrency::find()
            .filter(cryptocurrency::Column::CoinId.eq(coin_id))
            .one(self.db).await?;

        Ok(coin)
    }

    /// All tracked coins, largest market cap first. Coins without a market
    /// cap come last.
    pub async fn list(&self) -> Result<Vec<cryptocurrency::Model>> {
        let coins = Cryptocurrency::find()
            .order_by_with_nulls(
                cryptocurrency::Column::MarketCap,
                sea_orm::Order::Desc,
                NullOrdering::Last
            )
            .order_by_asc(cryptocurrency::Column::Id)
            .all(self.db).await?;

        Ok(coins)
    }

    pub async fn update_market_data(
        &self,
        id: i32,
        data: MarketData
    ) -> Result<cryptocurrency::Model> {
        let coin = self.find_by_id(id).await?;

        let mut active: cryptocurrency::ActiveModel = coin.into();
        active.current_price = Set(data.current_price);
        active.market_cap = Set(data.market_cap);
        active.price_change_24h = Set(data.price_change_24h);
        active.last_updated = Set(chrono::Utc::now());

        let updated = active.update(self.db).await?;
        Ok(updated)
    }

    /// Deleting a coin that still has history, alerts or transactions fails
    /// with a foreign-key violation; dependents must be removed first.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = Cryptocurrency::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Cryptocurrency {}", id)));
        }

        Ok(())
    }
}
