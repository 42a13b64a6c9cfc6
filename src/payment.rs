//! Solving for the constant periodic payment.

use rust_decimal::{Decimal, MathematicalOps};

use crate::error::ProjectionError;
use crate::input::ProjectionMode;
use crate::rate::nominal_monthly_rate;

/// Solves the constant monthly payment for a nominal annual rate.
///
/// See [`solve_payment_with_rate`] for the formulas applied.
///
/// # Errors
///
/// Returns an error if `periods_total` is zero or the compound factor overflows.
pub fn solve_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    periods_total: u32,
    mode: ProjectionMode,
) -> Result<Decimal, ProjectionError> {
    solve_payment_with_rate(
        principal,
        nominal_monthly_rate(annual_rate_percent),
        periods_total,
        mode,
    )
}

/// Solves the constant payment for an already-derived periodic rate.
///
/// - Amortizing loan (Price table): `PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1]`
/// - Sinking fund: `PMT = P * i / [(1 + i)^n – 1]`
///
/// A zero rate falls back to `P / n` in both modes, and a non-positive principal
/// needs no payment at all.
///
/// # Errors
///
/// Returns [`ProjectionError::ZeroPeriods`] if `periods_total` is zero and
/// [`ProjectionError::Overflow`] if `(1 + i)^n` or any product built from it does
/// not fit in a `Decimal`.
pub fn solve_payment_with_rate(
    principal: Decimal,
    periodic_rate: Decimal,
    periods_total: u32,
    mode: ProjectionMode,
) -> Result<Decimal, ProjectionError> {
    if periods_total == 0 {
        return Err(ProjectionError::ZeroPeriods);
    }
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods_total));
    }

    let overflow = ProjectionError::Overflow { periods: periods_total };

    let i_plus_1_pow_n = Decimal::ONE
        .checked_add(periodic_rate)
        .and_then(|base| base.checked_powu(periods_total.into()))
        .ok_or(overflow.clone())?;
    let growth = i_plus_1_pow_n - Decimal::ONE;

    // Rates below Decimal resolution leave no measurable growth.
    if growth.is_zero() {
        return Ok(principal / Decimal::from(periods_total));
    }

    let payment = match mode {
        ProjectionMode::AmortizeDown => periodic_rate
            .checked_mul(i_plus_1_pow_n)
            .and_then(|factor| principal.checked_mul(factor)),
        ProjectionMode::AccumulateUp => principal.checked_mul(periodic_rate),
    }
    .and_then(|numerator| numerator.checked_div(growth));

    payment.ok_or(overflow)
}
