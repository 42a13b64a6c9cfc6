//! `amortization_engine` computes payment schedules for calculator front-ends.
//!
//! It covers the two directions a constant periodic payment can run:
//! - **Amortizing loans**: a fixed payment pays a principal down to zero, blending
//!   shrinking interest with growing amortization (the Price table).
//! - **Savings goals**: a fixed contribution, compounded monthly, grows an existing
//!   balance toward a target (a sinking fund).
//!
//! Each calculation is pure. The caller supplies fresh parameters on every change
//! and reads back the payment, the totals and the full period ledger.
//!
//! ## Usage
//!
//! ```rust
//! use amortization_engine::{project, ProjectionInput};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let loan = ProjectionInput::loan(dec!(25_000), dec!(6), 60);
//!
//!     match project(loan) {
//!         Ok(result) => {
//!             println!("Monthly payment: {:.2}", result.periodic_payment);
//!             println!("Total paid:      {:.2}", result.total_paid);
//!             println!("Total interest:  {:.2}", result.total_interest);
//!         }
//!         Err(e) => {
//!             eprintln!("Error projecting loan: {}", e);
//!         }
//!     }
//!
//!     let goal = ProjectionInput::savings_goal(dec!(15_000), dec!(2_000), dec!(4), 36);
//!     let result = project(goal).unwrap();
//!     assert!(result.final_balance().unwrap() >= dec!(15_000));
//! }
//! ```
//!
//! The engine never caps the ledger. A front-end that only renders the first
//! rows should slice [`ProjectionResult::ledger`] itself.

mod error;
mod input;
mod ledger;
mod payment;
mod rate;

pub use error::ProjectionError;
pub use input::{ProjectionInput, ProjectionMode, financed_amount};
pub use ledger::{PeriodRecord, ProjectionResult, Totals, build_ledger, project, summarize};
pub use payment::{solve_payment, solve_payment_with_rate};
pub use rate::{RateConvention, effective_monthly_rate, nominal_monthly_rate};
