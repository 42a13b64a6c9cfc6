//! Projection parameters and the boundary policy applied to them.

use anyhow::Context;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::rate::RateConvention;

/// Direction in which a balance moves across the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// A loan: the balance is paid down to zero.
    AmortizeDown,
    /// A savings goal: contributions and interest grow the balance.
    AccumulateUp,
}

/// Input parameters for a single projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Amount to amortize, or the savings still missing to reach the goal.
    pub principal: Decimal,
    /// Balance already on hand. Zero for loans.
    #[serde(default)]
    pub starting_balance: Decimal,
    /// The annual interest rate as a percentage (e.g., 6.5 for 6.5%).
    pub annual_rate_percent: Decimal,
    /// Number of monthly periods in the schedule.
    pub periods_total: u32,
    /// Whether the balance is paid down or built up.
    pub mode: ProjectionMode,
    /// Balance at which an accumulating schedule stops early.
    #[serde(default)]
    pub target: Option<Decimal>,
    /// How `annual_rate_percent` becomes a monthly rate. Nominal unless stated.
    #[serde(default)]
    pub rate_convention: RateConvention,
}

impl ProjectionInput {
    /// A loan of `principal` repaid over `periods_total` months.
    pub fn loan(principal: Decimal, annual_rate_percent: Decimal, periods_total: u32) -> Self {
        Self {
            principal,
            starting_balance: Decimal::ZERO,
            annual_rate_percent,
            periods_total,
            mode: ProjectionMode::AmortizeDown,
            target: None,
            rate_convention: RateConvention::Nominal,
        }
    }

    /// A savings plan that grows `current_savings` to `target` within `periods_total` months.
    pub fn savings_goal(
        target: Decimal,
        current_savings: Decimal,
        annual_rate_percent: Decimal,
        periods_total: u32,
    ) -> Self {
        Self {
            principal: target.saturating_sub(current_savings).max(Decimal::ZERO),
            starting_balance: current_savings,
            annual_rate_percent,
            periods_total,
            mode: ProjectionMode::AccumulateUp,
            target: Some(target),
            rate_convention: RateConvention::Nominal,
        }
    }

    /// Replaces the rate convention, keeping every other parameter.
    pub fn with_rate_convention(mut self, rate_convention: RateConvention) -> Self {
        self.rate_convention = rate_convention;
        self
    }

    /// Parses a projection request from a JSON document.
    ///
    /// `starting_balance`, `target` and `rate_convention` may be omitted.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let input: ProjectionInput =
            serde_json::from_str(json).context("Invalid projection input")?;
        Ok(input)
    }

    /// Applies the boundary policy: negative amounts and rates are clamped to zero,
    /// a zero-length schedule is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::ZeroPeriods`] if `periods_total` is zero.
    pub fn validated(self) -> Result<Self, ProjectionError> {
        if self.periods_total == 0 {
            return Err(ProjectionError::ZeroPeriods);
        }

        Ok(Self {
            principal: clamp_non_negative("principal", self.principal),
            starting_balance: clamp_non_negative("starting_balance", self.starting_balance),
            annual_rate_percent: clamp_non_negative("annual_rate_percent", self.annual_rate_percent),
            target: self.target.map(|target| clamp_non_negative("target", target)),
            ..self
        })
    }
}

/// Amount left to finance after the down payment and trade-in are applied, floored at zero.
pub fn financed_amount(price: Decimal, down_payment: Decimal, trade_in: Decimal) -> Decimal {
    price
        .saturating_sub(down_payment)
        .saturating_sub(trade_in)
        .max(Decimal::ZERO)
}

fn clamp_non_negative(field: &str, value: Decimal) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        warn!("{field} was negative ({value}); clamping to 0");
        return Decimal::ZERO;
    }
    value
}
