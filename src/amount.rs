use std::fmt;

use sea_orm::prelude::Decimal;
use sea_orm::sea_query::{ ArrayType, ColumnType, Nullable, SimpleExpr, ValueType, ValueTypeErr };
use sea_orm::{ ColIdx, DbBackend, DbErr, QueryResult, TryGetError, TryGetable, Value };
use serde::{ Deserialize, Serialize };

use crate::error::{ AppError, Result };

/// Total digits of a stored amount.
pub const AMOUNT_PRECISION: u32 = 18;
/// Fractional digits of a stored amount.
pub const AMOUNT_SCALE: u32 = 8;

/// Non-negative fixed-point amount that fits decimal(18, 8) exactly.
///
/// Postgres keeps it in a `numeric(18, 8)` column. SQLite has no exact
/// decimal type, so there it is kept as text. Reads always select the column
/// cast to text and parse it back, which is lossless on both backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AppError::InvalidInput(format!("amount must not be negative, got {}", value)));
        }

        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(
                AppError::InvalidInput(
                    format!("amount has more than {} fractional digits: {}", AMOUNT_SCALE, value)
                )
            );
        }

        let integer_limit = Decimal::from(10i64.pow(AMOUNT_PRECISION - AMOUNT_SCALE));
        if value.trunc() >= integer_limit {
            return Err(
                AppError::InvalidInput(
                    format!(
                        "amount exceeds {} integer digits: {}",
                        AMOUNT_PRECISION - AMOUNT_SCALE,
                        value
                    )
                )
            );
        }

        Ok(Self(value.normalize()))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Bind expression for writing this amount on `backend`.
    pub(crate) fn to_storage(self, backend: DbBackend) -> SimpleExpr {
        match backend {
            DbBackend::Sqlite => SimpleExpr::from(self.0.to_string()),
            _ => SimpleExpr::from(self.0),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AppError;

    fn try_from(value: Decimal) -> Result<Self> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Value {
    fn from(amount: Amount) -> Self {
        Value::from(amount.0)
    }
}

impl TryGetable for Amount {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> std::result::Result<Self, TryGetError> {
        let raw = String::try_get_by(res, index)?;
        raw.trim()
            .parse::<Decimal>()
            .map(|d| Amount(d.normalize()))
            .map_err(|e| {
                TryGetError::DbErr(DbErr::Type(format!("invalid stored amount {:?}: {}", raw, e)))
            })
    }
}

impl ValueType for Amount {
    fn try_from(v: Value) -> std::result::Result<Self, ValueTypeErr> {
        <Decimal as ValueType>::try_from(v).map(Amount)
    }

    fn type_name() -> String {
        "Amount".to_owned()
    }

    fn array_type() -> ArrayType {
        <Decimal as ValueType>::array_type()
    }

    fn column_type() -> ColumnType {
        ColumnType::Decimal(Some((AMOUNT_PRECISION, AMOUNT_SCALE)))
    }
}

impl Nullable for Amount {
    fn null() -> Value {
        <Decimal as Nullable>::null()
    }
}
