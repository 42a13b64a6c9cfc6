//! Period-by-period schedules and the totals derived from them.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::input::{ProjectionInput, ProjectionMode};
use crate::payment::solve_payment_with_rate;

/// Represents the payment details for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based position in the schedule.
    pub period_index: u32,
    /// The constant payment or contribution made this period.
    pub payment_amount: Decimal,
    /// Interest charged (loan) or credited (savings) on the opening balance.
    pub interest_component: Decimal,
    /// For a loan, the part of the payment that reduces the balance.
    /// For savings, the contribution plus credited interest.
    pub principal_component: Decimal,
    /// The balance after this period.
    pub ending_balance: Decimal,
}

/// Contains the results of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// The constant payment or contribution solved for the schedule.
    pub periodic_payment: Decimal,
    /// Payment times the number of periods actually emitted.
    pub total_paid: Decimal,
    /// Sum of the interest component across the ledger.
    pub total_interest: Decimal,
    /// A vector containing the breakdown for each emitted period.
    pub ledger: Vec<PeriodRecord>,
}

impl ProjectionResult {
    fn empty() -> Self {
        Self {
            periodic_payment: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            ledger: Vec::new(),
        }
    }

    /// Number of periods emitted, which is below the term when a schedule stops early.
    pub fn periods_used(&self) -> usize {
        self.ledger.len()
    }

    /// Balance after the last emitted period, if any period was emitted.
    pub fn final_balance(&self) -> Option<Decimal> {
        self.ledger.last().map(|record| record.ending_balance)
    }

    /// A presentation copy with every amount rounded to `dp` decimal places.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            periodic_payment: self.periodic_payment.round_dp(dp),
            total_paid: self.total_paid.round_dp(dp),
            total_interest: self.total_interest.round_dp(dp),
            ledger: self
                .ledger
                .iter()
                .map(|record| PeriodRecord {
                    period_index: record.period_index,
                    payment_amount: record.payment_amount.round_dp(dp),
                    interest_component: record.interest_component.round_dp(dp),
                    principal_component: record.principal_component.round_dp(dp),
                    ending_balance: record.ending_balance.round_dp(dp),
                })
                .collect(),
        }
    }
}

/// Aggregate figures over an emitted ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of every payment made.
    pub total_paid: Decimal,
    /// Sum of every interest component.
    pub total_interest: Decimal,
}

/// Sums payments and interest across `ledger`.
///
/// # Errors
///
/// Returns [`ProjectionError::Overflow`] if either sum does not fit in a `Decimal`.
pub fn summarize(ledger: &[PeriodRecord]) -> Result<Totals, ProjectionError> {
    let mut totals = Totals {
        total_paid: Decimal::ZERO,
        total_interest: Decimal::ZERO,
    };

    for record in ledger {
        let overflow = || ProjectionError::Overflow { periods: record.period_index };
        totals.total_paid = totals
            .total_paid
            .checked_add(record.payment_amount)
            .ok_or_else(overflow)?;
        totals.total_interest = totals
            .total_interest
            .checked_add(record.interest_component)
            .ok_or_else(overflow)?;
    }

    Ok(totals)
}

/// Walks the schedule for `input` at a given `periodic_payment`.
///
/// A loan opens at `principal + starting_balance` and stops at the first period
/// that brings the balance to zero. A savings plan opens at `starting_balance` and
/// stops at the first period that reaches `target`, when one is given. A
/// non-positive principal produces an empty ledger.
///
/// The ledger is never capped here; callers that only display a window of rows
/// should slice it themselves.
///
/// # Errors
///
/// Returns an error if the rate convention cannot be applied, `periods_total` is zero,
/// or a balance or total overflows `Decimal`.
pub fn build_ledger(
    input: &ProjectionInput,
    periodic_payment: Decimal,
) -> Result<ProjectionResult, ProjectionError> {
    if input.periods_total == 0 {
        return Err(ProjectionError::ZeroPeriods);
    }
    if input.principal <= Decimal::ZERO {
        return Ok(ProjectionResult::empty());
    }

    let periodic_rate = input.rate_convention.monthly_rate(input.annual_rate_percent)?;

    let mut balance = match input.mode {
        ProjectionMode::AmortizeDown => input
            .principal
            .checked_add(input.starting_balance)
            .ok_or(ProjectionError::Overflow { periods: 0 })?,
        ProjectionMode::AccumulateUp => input.starting_balance,
    };
    let mut ledger = Vec::new();

    for period_index in 1..=input.periods_total {
        let overflow = ProjectionError::Overflow { periods: period_index };
        let interest = balance.checked_mul(periodic_rate).ok_or(overflow.clone())?;

        let (principal_component, stop) = match input.mode {
            ProjectionMode::AmortizeDown => {
                let amortization = periodic_payment
                    .checked_sub(interest)
                    .ok_or(overflow.clone())?;
                balance = balance
                    .checked_sub(amortization)
                    .ok_or(overflow)?
                    .max(Decimal::ZERO);
                (amortization, balance.is_zero())
            }
            ProjectionMode::AccumulateUp => {
                let contribution = periodic_payment
                    .checked_add(interest)
                    .ok_or(overflow.clone())?;
                balance = balance.checked_add(contribution).ok_or(overflow)?;
                (contribution, input.target.is_some_and(|target| balance >= target))
            }
        };

        ledger.push(PeriodRecord {
            period_index,
            payment_amount: periodic_payment,
            interest_component: interest,
            principal_component,
            ending_balance: balance,
        });

        if stop {
            break;
        }
    }

    let totals = summarize(&ledger)?;

    Ok(ProjectionResult {
        periodic_payment,
        total_paid: totals.total_paid,
        total_interest: totals.total_interest,
        ledger,
    })
}

/// Validates `input`, solves its payment and walks the resulting schedule.
///
/// This is the main entry point for a calculator front-end.
///
/// # Errors
///
/// Returns an error if `periods_total` is zero or the schedule overflows.
pub fn project(input: ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
    let input = input.validated()?;
    let periodic_rate = input.rate_convention.monthly_rate(input.annual_rate_percent)?;

    let periodic_payment = solve_payment_with_rate(
        input.principal,
        periodic_rate,
        input.periods_total,
        input.mode,
    )?;
    let result = build_ledger(&input, periodic_payment)?;

    debug!(
        "{:?} projection: payment {} over {} of {} periods",
        input.mode,
        periodic_payment,
        result.periods_used(),
        input.periods_total
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::RateConvention;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn close(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_car_loan_scenario() {
        let result = project(ProjectionInput::loan(dec!(25000), dec!(6), 60)).unwrap();

        assert_eq!(result.periodic_payment.round_dp(2), dec!(483.32));
        assert_eq!(result.periods_used(), 60);
        assert_eq!(result.total_interest.round_dp(2), dec!(3999.20));
        assert!(close(result.final_balance().unwrap(), dec!(0), dec!(0.000001)));
    }

    #[test]
    fn test_zero_rate_loan_scenario() {
        let result = project(ProjectionInput::loan(dec!(12000), dec!(0), 24)).unwrap();

        assert_eq!(result.periodic_payment, dec!(500));
        assert_eq!(result.total_paid, dec!(12000));
        assert_eq!(result.total_interest, dec!(0));
        assert_eq!(result.periods_used(), 24);
        assert_eq!(result.final_balance(), Some(dec!(0)));
    }

    #[test]
    fn test_savings_goal_scenario() {
        let input = ProjectionInput::savings_goal(dec!(15000), dec!(2000), dec!(4), 36);
        let result = project(input).unwrap();

        assert_eq!(result.periodic_payment.round_dp(2), dec!(340.48));
        assert_eq!(result.periods_used(), 36);
        assert!(result.final_balance().unwrap() >= dec!(15000));
        assert_eq!(result.final_balance().unwrap().round_dp(2), dec!(15254.54));
        assert!(result.ledger[34].ending_balance < dec!(15000));
    }

    #[test]
    fn test_zero_principal_scenario() {
        let result = project(ProjectionInput::loan(dec!(0), dec!(6), 60)).unwrap();

        assert_eq!(result.periodic_payment, dec!(0));
        assert!(result.ledger.is_empty());
        assert_eq!(result.final_balance(), None);
    }

    #[test]
    fn test_goal_already_met_is_empty() {
        let input = ProjectionInput::savings_goal(dec!(1000), dec!(1500), dec!(3), 12);
        let result = project(input).unwrap();
        assert!(result.ledger.is_empty());
    }

    #[test]
    fn test_price_table_with_effective_rate() {
        let input = ProjectionInput::loan(dec!(12000), dec!(12), 12)
            .with_rate_convention(RateConvention::Effective);
        let result = project(input).unwrap();

        assert_eq!(result.periodic_payment.round_dp(2), dec!(1062.74));
        assert_eq!(result.total_paid.round_dp(2), dec!(12752.94));
    }

    #[rstest]
    #[case(dec!(25000), dec!(6), 60)]
    #[case(dec!(360000), dec!(10.5), 420)]
    #[case(dec!(8500), dec!(19.99), 18)]
    #[case(dec!(1), dec!(0.1), 1)]
    fn test_loan_interest_matches_paid_minus_principal(
        #[case] principal: Decimal,
        #[case] annual_rate: Decimal,
        #[case] months: u32,
    ) {
        let result = project(ProjectionInput::loan(principal, annual_rate, months)).unwrap();

        assert_eq!(result.periods_used(), months as usize);
        assert!(close(
            result.total_paid,
            result.periodic_payment * Decimal::from(months),
            dec!(0.000001)
        ));
        assert!(close(
            result.total_interest,
            result.total_paid - principal,
            dec!(0.000001)
        ));
        assert!(close(
            result.final_balance().unwrap(),
            dec!(0),
            principal * dec!(0.000001)
        ));
    }

    #[test]
    fn test_loan_balances_never_increase() {
        let result = project(ProjectionInput::loan(dec!(42000), dec!(8.75), 84)).unwrap();

        let mut previous = dec!(42000);
        for record in &result.ledger {
            assert!(record.ending_balance <= previous);
            assert!(record.ending_balance >= dec!(0));
            assert_eq!(record.payment_amount, result.periodic_payment);
            previous = record.ending_balance;
        }
    }

    #[test]
    fn test_savings_balances_never_decrease() {
        let input = ProjectionInput::savings_goal(dec!(50000), dec!(7500), dec!(5.5), 120);
        let result = project(input).unwrap();

        let mut previous = dec!(7500);
        for record in &result.ledger {
            assert!(record.ending_balance >= previous);
            previous = record.ending_balance;
        }
    }

    #[test]
    fn test_overpayment_stops_loan_early() {
        let input = ProjectionInput::loan(dec!(1000), dec!(0), 12);
        let result = build_ledger(&input, dec!(400)).unwrap();

        assert_eq!(result.periods_used(), 3);
        assert_eq!(result.final_balance(), Some(dec!(0)));
        assert_eq!(result.total_paid, dec!(1200));
    }

    #[test]
    fn test_accumulation_without_target_runs_full_term() {
        let input = ProjectionInput {
            target: None,
            ..ProjectionInput::savings_goal(dec!(100), dec!(0), dec!(0), 10)
        };
        let result = build_ledger(&input, dec!(50)).unwrap();

        assert_eq!(result.periods_used(), 10);
        assert_eq!(result.final_balance(), Some(dec!(500)));
    }

    #[test]
    fn test_accumulation_stops_at_target() {
        let input = ProjectionInput::savings_goal(dec!(100), dec!(0), dec!(0), 10);
        let result = build_ledger(&input, dec!(50)).unwrap();

        assert_eq!(result.periods_used(), 2);
        assert_eq!(result.ledger[1].principal_component, dec!(50));
    }

    #[test]
    fn test_unbounded_accumulation_reports_overflow() {
        let input = ProjectionInput {
            target: None,
            ..ProjectionInput::savings_goal(dec!(1000), dec!(0), dec!(12), 10000)
        };
        let result = build_ledger(&input, dec!(100));

        assert!(matches!(
            result,
            Err(ProjectionError::Overflow { periods }) if periods > 1 && periods < 10000
        ));
    }

    #[test]
    fn test_oversized_loan_balance_reports_overflow() {
        let input = ProjectionInput {
            starting_balance: Decimal::MAX,
            ..ProjectionInput::loan(Decimal::MAX, dec!(6), 12)
        };
        let result = build_ledger(&input, dec!(100));
        assert_eq!(result, Err(ProjectionError::Overflow { periods: 0 }));
    }

    #[test]
    fn test_summarize_overflow() {
        let record = PeriodRecord {
            period_index: 1,
            payment_amount: Decimal::MAX,
            interest_component: dec!(0),
            principal_component: Decimal::MAX,
            ending_balance: dec!(0),
        };
        let second = PeriodRecord {
            period_index: 2,
            ..record.clone()
        };

        assert_eq!(
            summarize(&[record, second]),
            Err(ProjectionError::Overflow { periods: 2 })
        );
    }

    #[test]
    fn test_first_period_breakdown() {
        let result = project(ProjectionInput::loan(dec!(25000), dec!(6), 60)).unwrap();
        let first = &result.ledger[0];

        assert_eq!(first.period_index, 1);
        assert_eq!(first.interest_component, dec!(125));
        assert_eq!(
            first.principal_component,
            first.payment_amount - first.interest_component
        );
    }

    #[test]
    fn test_projection_is_idempotent() {
        let input = ProjectionInput::savings_goal(dec!(20000), dec!(1250), dec!(3.75), 48);
        assert_eq!(project(input.clone()).unwrap(), project(input).unwrap());
    }

    #[test]
    fn test_negative_inputs_are_clamped() {
        let input = ProjectionInput::loan(dec!(-5000), dec!(6), 12);
        let result = project(input).unwrap();
        assert!(result.ledger.is_empty());

        let input = ProjectionInput::loan(dec!(1200), dec!(-4), 12);
        let result = project(input).unwrap();
        assert_eq!(result.periodic_payment, dec!(100));
    }

    #[test]
    fn test_zero_periods_error() {
        let result = project(ProjectionInput::loan(dec!(100000), dec!(10), 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_rounded_copy() {
        let result = project(ProjectionInput::loan(dec!(25000), dec!(6), 60)).unwrap();
        let rounded = result.rounded(2);

        assert_eq!(rounded.periodic_payment, dec!(483.32));
        assert_eq!(rounded.ledger.len(), result.ledger.len());
        assert_eq!(rounded.ledger[0].interest_component, dec!(125.00));
        assert_eq!(rounded.final_balance(), Some(dec!(0.00)));
    }

    #[test]
    fn test_summarize_empty_ledger() {
        let totals = summarize(&[]).unwrap();
        assert_eq!(totals.total_paid, dec!(0));
        assert_eq!(totals.total_interest, dec!(0));
    }
}
