//! Conversion of annual percentages into per-period decimal rates.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// How an annual percentage maps onto a monthly rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateConvention {
    /// Nominal annual rate split evenly across twelve months.
    #[default]
    Nominal,
    /// Effective annual rate, compounded down to its monthly equivalent.
    Effective,
}

impl RateConvention {
    /// Derives the monthly decimal rate for `annual_rate_percent` under this convention.
    pub fn monthly_rate(self, annual_rate_percent: Decimal) -> Result<Decimal, ProjectionError> {
        match self {
            RateConvention::Nominal => Ok(nominal_monthly_rate(annual_rate_percent)),
            RateConvention::Effective => effective_monthly_rate(annual_rate_percent),
        }
    }
}

/// Converts a nominal annual percentage (e.g. 6.5 for 6.5%) to a monthly decimal rate.
pub fn nominal_monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Normalizes an effective annual percentage to its compounded monthly equivalent.
///
/// 12% per year yields roughly 0.9488% per month, since `(1.12)^(1/12) - 1 ≈ 0.009488`.
///
/// # Errors
///
/// Returns [`ProjectionError::RateConversion`] if the fractional power cannot be computed.
pub fn effective_monthly_rate(annual_rate_percent: Decimal) -> Result<Decimal, ProjectionError> {
    if annual_rate_percent.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let base = Decimal::ONE + annual_rate_percent / dec!(100);
    let exponent = Decimal::ONE / dec!(12);

    base.checked_powd(exponent)
        .map(|power| power - Decimal::ONE)
        .ok_or(ProjectionError::RateConversion { annual_rate_percent })
}
