pub mod amount;
pub mod config;
pub mod enums;
pub mod error;
pub mod db;

pub use amount::Amount;
pub use config::Config;
pub use db::{ DatabaseEngine, Session };
pub use enums::{ AlertCondition, TransactionType };
pub use error::{ AppError, Result };
