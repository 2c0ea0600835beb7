use sea_orm::SqlErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")] Database(#[from] sea_orm::DbErr),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Invalid input: {0}")] InvalidInput(String),

    #[error("Not found: {0}")] NotFound(String),
}

impl AppError {
    /// Storage-level classification of a database failure, if the driver
    /// reported one (unique or foreign-key violation).
    pub fn sql_err(&self) -> Option<SqlErr> {
        match self {
            AppError::Database(e) => e.sql_err(),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
