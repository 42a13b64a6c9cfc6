use rust_decimal::Decimal;

/// Errors raised by the projection engine.
///
/// Inputs that are merely out of range (negative amounts or rates) are
/// clamped by [`crate::ProjectionInput::validated`] and never reach here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Total periods cannot be zero.")]
    ZeroPeriods,

    #[error("Compound factor overflowed after {periods} periods")]
    Overflow { periods: u32 },

    #[error("Cannot derive an effective monthly rate from {annual_rate_percent}% per year")]
    RateConversion { annual_rate_percent: Decimal },
}
