pub mod cryptocurrency;
pub mod price_history;
pub mod price_alert;
pub mod portfolio_transaction;

pub use cryptocurrency::Entity as Cryptocurrency;
pub use price_history::Entity as PriceHistory;
pub use price_alert::Entity as PriceAlert;
pub use portfolio_transaction::Entity as PortfolioTransaction;
