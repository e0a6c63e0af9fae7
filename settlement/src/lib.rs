//! Expense Settlement Engine
//!
//! Computes the person-to-person transfers that settle a trip's shared
//! expenses.
//!
//! # Architecture

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
//!
//! Settlement is a pure function of the expense list, run per currency:
//!
//! 1. **Accumulation**: Fold shared expenses into signed net balances
//! 2. **Rounding**: Round balances to the minor unit, keeping their sum at zero
//! 3. **Partition**: Split members into creditors and debtors
//! 4. **Netting**: Greedily pair the largest debtor with the largest creditor
//!
//! # Invariants
//!
//! - Conservation: balances in each currency sum to zero
//! - Zeroing: after the transfers every balance is within one minor unit of zero
//! - Currency isolation: currencies are never pooled or converted
//! - Deterministic output: ties are broken by member ID
//!
//! # Example
//!
//! ```
//! use expense_settlement::{settle, Currency, Expense, MemberId};
//! use rust_decimal::Decimal;
//!
//! let members = ["A", "B", "C"].map(MemberId::from);
//! let expenses = vec![Expense::shared("A", Decimal::from(3000), Currency::jpy(), members)];
//!
//! for transfer in settle(&expenses) {
//!     println!("{}", transfer); // B -> A 1000 JPY, C -> A 1000 JPY
//! }
//! ```

#![warn(missing_debug_implementations, clippy::all)]

pub mod types;
pub mod validation;
pub mod balances;
pub mod netting;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use validation::{ExcludedExpense, ExclusionReason};
pub use balances::{accumulate, NetBalances};
pub use config::Config;
pub use engine::{settle, SettlementEngine, SettlementReport};
