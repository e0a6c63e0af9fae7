//! Malformed expense detection
//!
//! A single bad record never aborts settlement for the whole trip: shared
//! expenses that fail these checks are left out of the balances and
//! reported back to the caller.

use crate::types::Expense;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a shared expense was left out of settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Nobody to split the amount with
    NoParticipants,
    /// Amount is zero or negative
    NonPositiveAmount,
    /// Payer or a participant has an empty identifier
    BlankMember,
    /// Amount would push a balance past the representable range
    AmountOutOfRange,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::NoParticipants => write!(f, "no participants"),
            ExclusionReason::NonPositiveAmount => write!(f, "non-positive amount"),
            ExclusionReason::BlankMember => write!(f, "blank member name"),
            ExclusionReason::AmountOutOfRange => write!(f, "amount out of range"),
        }
    }
}

/// Shared expense that settlement skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedExpense {
    /// Expense ID
    pub expense_id: Uuid,

    /// Reason for exclusion
    pub reason: ExclusionReason,
}

/// Check a shared expense; `None` means it can be settled
pub fn check_expense(expense: &Expense) -> Option<ExclusionReason> {
    if expense.participants.is_empty() {
        return Some(ExclusionReason::NoParticipants);
    }

    if expense.amount <= Decimal::ZERO {
        return Some(ExclusionReason::NonPositiveAmount);
    }

    if expense.payer.is_blank() || expense.participants.iter().any(|p| p.is_blank()) {
        return Some(ExclusionReason::BlankMember);
    }

    None
}
