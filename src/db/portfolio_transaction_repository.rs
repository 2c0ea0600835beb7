use sea_orm::prelude::{ DateTimeUtc, Decimal };
use sea_orm::sea_query::Query;
use sea_orm::{ ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder };

use crate::amount::Amount;
use crate::db::entity::{ portfolio_transaction, PortfolioTransaction };
use crate::enums::TransactionType;
use crate::error::{ AppError, Result };

#[derive(Debug, Clone)]
pub struct NewPortfolioTransaction {
    pub cryptocurrency_id: i32,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub price_per_coin: Decimal,
    /// Trade time; defaults to now.
    pub timestamp: Option<DateTimeUtc>,
}

pub struct PortfolioTransactionRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PortfolioTransactionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Record a trade. Rows are immutable once written.
    ///
    /// Quantity must be positive. A zero price is allowed for transfers and
    /// airdrops. Both must fit decimal(18, 8) exactly.
    pub async fn record(&self, input: NewPortfolioTransaction) -> Result<portfolio_transaction::Model> {
        let quantity = Amount::new(input.quantity).map_err(|e| field_error("quantity", e))?;
        if quantity.is_zero() {
            return Err(AppError::InvalidInput("quantity must be positive, got 0".to_string()));
        }
        let price_per_coin = Amount::new(input.price_per_coin).map_err(|e|
            field_error("price_per_coin", e)
        )?;

        // Amounts are written as text on SQLite so they are stored exactly.
        let backend = self.db.get_database_backend();
        let mut insert = Query::insert();
        insert
            .into_table(PortfolioTransaction)
            .columns([
                portfolio_transaction::Column::CryptocurrencyId,
                portfolio_transaction::Column::TransactionType,
                portfolio_transaction::Column::Quantity,
                portfolio_transaction::Column::PricePerCoin,
                portfolio_transaction::Column::Timestamp,
            ]);
        insert
            .values([
                input.cryptocurrency_id.into(),
                input.transaction_type.as_str().into(),
                quantity.to_storage(backend),
                price_per_coin.to_storage(backend),
                input.timestamp.unwrap_or_else(chrono::Utc::now).into(),
            ])
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        insert.returning_col(portfolio_transaction::Column::Id);

        let row = self.db
            .query_one(backend.build(&insert)).await?
            .ok_or(DbErr::RecordNotInserted)?;
        let id: i32 = row.try_get("", "id")?;

        let txn = PortfolioTransaction::find_by_id(id)
            .one(self.db).await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("portfolio transaction {}", id)))?;

        tracing::debug!(
            id = txn.id,
            kind = %txn.transaction_type,
            cryptocurrency_id = txn.cryptocurrency_id,
            "Portfolio transaction recorded"
        );
        Ok(txn)
    }

    /// Trades for one coin in the order they happened.
    pub async fn find_for_coin(
        &self,
        cryptocurrency_id: i32
    ) -> Result<Vec<portfolio_transaction::Model>> {
        let txns = PortfolioTransaction::find()
            .filter(portfolio_transaction::Column::CryptocurrencyId.eq(cryptocurrency_id))
            .order_by_asc(portfolio_transaction::Column::Timestamp)
            .order_by_asc(portfolio_transaction::Column::Id)
            .all(self.db).await?;

        Ok(txns)
    }

    pub async fn list(&self) -> Result<Vec<portfolio_transaction::Model>> {
        let txns = PortfolioTransaction::find()
            .order_by_asc(portfolio_transaction::Column::Timestamp)
            .order_by_asc(portfolio_transaction::Column::Id)
            .all(self.db).await?;

        Ok(txns)
    }
}

fn field_error(field: &str, err: AppError) -> AppError {
    match err {
        AppError::InvalidInput(msg) => AppError::InvalidInput(format!("{}: {}", field, msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{ Duration, TimeZone, Utc };
    use sea_orm::{ ColumnType, Statement };

    use super::*;
    use crate::amount::{ AMOUNT_PRECISION, AMOUNT_SCALE };
    use crate::db::test_support::memory_engine;
    use crate::db::{ CryptocurrencyRepository, NewCryptocurrency };

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn seed_coin<C: ConnectionTrait>(db: &C) -> i32 {
        CryptocurrencyRepository::new(db)
            .create(NewCryptocurrency {
                coin_id: "ethereum".to_string(),
                symbol: "ETH".to_string(),
                name: "Ethereum".to_string(),
                current_price: Some(3200.0),
                market_cap: None,
                price_change_24h: None,
            }).await
            .unwrap().id
    }

    fn buy(cryptocurrency_id: i32, quantity: &str, price_per_coin: &str) -> NewPortfolioTransaction {
        NewPortfolioTransaction {
            cryptocurrency_id,
            transaction_type: TransactionType::Buy,
            quantity: dec(quantity),
            price_per_coin: dec(price_per_coin),
            timestamp: None,
        }
    }

    #[test]
    fn test_amount_columns_are_fixed_point() {
        for column in [
            portfolio_transaction::Column::Quantity,
            portfolio_transaction::Column::PricePerCoin,
        ] {
            assert_eq!(
                column.def().get_column_type(),
                &ColumnType::Decimal(Some((AMOUNT_PRECISION, AMOUNT_SCALE)))
            );
        }
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;
        let repo = PortfolioTransactionRepository::new(db);

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        repo.record(NewPortfolioTransaction {
            cryptocurrency_id: coin_id,
            transaction_type: TransactionType::Sell,
            quantity: dec("0.25"),
            price_per_coin: dec("3300"),
            timestamp: Some(at + Duration::days(1)),
        }).await.unwrap();
        let buy = repo
            .record(NewPortfolioTransaction {
                cryptocurrency_id: coin_id,
                transaction_type: TransactionType::Buy,
                quantity: dec("0.5"),
                price_per_coin: dec("3100"),
                timestamp: Some(at),
            }).await
            .unwrap();

        assert_eq!(buy.transaction_type, TransactionType::Buy);
        assert_eq!(buy.timestamp, at);

        let history = repo.find_for_coin(coin_id).await.unwrap();
        let kinds: Vec<TransactionType> = history
            .iter()
            .map(|t| t.transaction_type)
            .collect();
        assert_eq!(kinds, vec![TransactionType::Buy, TransactionType::Sell]);
        assert_eq!(history[0].quantity.value(), dec("0.5"));
        assert_eq!(history[0].price_per_coin.value(), dec("3100"));

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert!(repo.find_for_coin(coin_id + 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_boundary_amounts_stored_exactly() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;
        let repo = PortfolioTransactionRepository::new(db);

        let cases = [
            ("1234567890.12345678", "0.00000001"),
            ("9999999999.99999999", "9999999999.99999999"),
            ("0.00000001", "1234567890.12345678"),
        ];
        for (quantity, price_per_coin) in cases {
            let txn = repo.record(buy(coin_id, quantity, price_per_coin)).await.unwrap();

            let stored = PortfolioTransaction::find_by_id(txn.id).one(db).await.unwrap().unwrap();
            assert_eq!(stored.quantity.value(), dec(quantity));
            assert_eq!(stored.price_per_coin.value(), dec(price_per_coin));
            assert_eq!(stored.quantity.to_string(), quantity);
            assert_eq!(stored.price_per_coin.to_string(), price_per_coin);
        }

        // The raw column holds the exact digits, not a float approximation
        let row = db
            .query_one(
                Statement::from_string(
                    db.get_database_backend(),
                    "SELECT quantity FROM portfolio_transactions ORDER BY id LIMIT 1"
                )
            ).await
            .unwrap()
            .unwrap();
        let raw: String = row.try_get("", "quantity").unwrap();
        assert_eq!(raw, "1234567890.12345678");
    }

    #[tokio::test]
    async fn test_zero_price_allowed() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;
        let repo = PortfolioTransactionRepository::new(db);

        let airdrop = repo.record(buy(coin_id, "25", "0")).await.unwrap();
        assert!(airdrop.price_per_coin.is_zero());
        assert_eq!(airdrop.quantity.value(), dec("25"));

        let err = repo.record(buy(coin_id, "0", "100")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = repo.record(buy(coin_id, "1", "-0.01")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_rejects_before_storage() {
        let engine = memory_engine().await;
        let db = engine.connection();
        let coin_id = seed_coin(db).await;
        let repo = PortfolioTransactionRepository::new(db);

        for (quantity, price_per_coin) in [
            ("123456789012.34567890", "1"),
            ("1", "0.000000001"),
            ("-2", "1"),
        ] {
            let err = repo.record(buy(coin_id, quantity, price_per_coin)).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{quantity} @ {price_per_coin}");
        }
        assert!(repo.list().await.unwrap().is_empty());
    }
}
