//! Net balance accumulation
//!
//! Expenses are partitioned by currency *before* any arithmetic, so an
//! expense in one currency can never move a balance in another.
//!
//! # Example
//!
//! ```text
//! A pays 3000 JPY, split among A, B, C (1000 each):
//!   A: +3000 - 1000 = +2000 (is owed)
//!   B:        -1000 = -1000 (owes)
//!   C:        -1000 = -1000 (owes)
//! ```

use crate::{
    types::{Currency, Expense, MemberId, Transfer},
    validation::{check_expense, ExcludedExpense, ExclusionReason},
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Signed balances of every member in one currency
///
/// Positive = is owed money, negative = owes money. Values are kept
/// unrounded; rounding only happens when transfers are emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyBalances {
    balances: BTreeMap<MemberId, Decimal>,
}

impl CurrencyBalances {
    /// Credit a member (they fronted money)
    pub fn credit(&mut self, member: &MemberId, amount: Decimal) {
        *self.balances.entry(member.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Debit a member (they consumed a share)
    pub fn debit(&mut self, member: &MemberId, amount: Decimal) {
        *self.balances.entry(member.clone()).or_insert(Decimal::ZERO) -= amount;
    }

    /// Net balance of a member (zero if unknown)
    pub fn net(&self, member: &MemberId) -> Decimal {
        self.balances.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    /// Members and balances in member order
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> + '_ {
        self.balances.iter().map(|(member, balance)| (member, *balance))
    }

    /// Sum of all balances; zero (within tolerance) by conservation
    pub fn total(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    /// Number of members with a balance entry
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// True when no member has a balance entry
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Members whose balance is outside the tolerance band
    pub fn unsettled_count(&self, tolerance: Decimal) -> usize {
        self.balances
            .values()
            .filter(|balance| balance.abs() > tolerance)
            .count()
    }

    /// Apply a transfer: the debtor's balance rises, the creditor's falls
    pub fn apply_transfer(&mut self, transfer: &Transfer) {
        self.credit(&transfer.from, transfer.amount);
        self.debit(&transfer.to, transfer.amount);
    }

    /// Fold one shared expense in, all or nothing
    ///
    /// Returns `None` and leaves every balance untouched if any step would
    /// overflow.
    fn add_expense(&mut self, expense: &Expense) -> Option<()> {
        let participants = expense.distinct_participants();
        let share = expense
            .amount
            .checked_div(Decimal::from(participants.len()))?;

        let mut staged = BTreeMap::new();
        staged.insert(
            expense.payer.clone(),
            self.net(&expense.payer).checked_add(expense.amount)?,
        );
        for participant in participants {
            let current = staged
                .get(participant)
                .copied()
                .unwrap_or_else(|| self.net(participant));
            staged.insert(participant.clone(), current.checked_sub(share)?);
        }

        self.balances.extend(staged);
        Some(())
    }
}

/// Balances for every currency seen in the shared expenses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetBalances {
    by_currency: BTreeMap<Currency, CurrencyBalances>,
}

impl NetBalances {
    /// Balances for one currency
    pub fn currency(&self, currency: &Currency) -> Option<&CurrencyBalances> {
        self.by_currency.get(currency)
    }

    /// Net balance of a member in a currency (zero if unknown)
    pub fn net(&self, currency: &Currency, member: &MemberId) -> Decimal {
        self.currency(currency)
            .map(|balances| balances.net(member))
            .unwrap_or(Decimal::ZERO)
    }

    /// Currencies in code order
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &CurrencyBalances)> + '_ {
        self.by_currency.iter()
    }

    /// Currencies present
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> + '_ {
        self.by_currency.keys()
    }

    /// True when no shared expense contributed a balance
    pub fn is_empty(&self) -> bool {
        self.by_currency.is_empty()
    }

    /// Apply transfers to the matching currency balances
    pub fn apply_transfers<'a>(&mut self, transfers: impl IntoIterator<Item = &'a Transfer>) {
        for transfer in transfers {
            self.by_currency
                .entry(transfer.currency.clone())
                .or_default()
                .apply_transfer(transfer);
        }
    }

    /// Every balance in every currency lies within the tolerance band
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.by_currency
            .values()
            .all(|balances| balances.unsettled_count(tolerance) == 0)
    }
}

/// Result of folding an expense list into balances
#[derive(Debug, Clone, Default)]
pub struct Accumulation {
    /// Per-currency balances
    pub balances: NetBalances,

    /// Shared expenses that were skipped as malformed, in input order
    pub excluded: Vec<ExcludedExpense>,
}

/// Fold shared expenses into per-currency net balances
///
/// Personal expenses are ignored; malformed shared expenses, and those
/// whose amounts would overflow a balance, are skipped and reported.
pub fn accumulate(expenses: &[Expense]) -> Accumulation {
    let mut accumulation = Accumulation::default();

    for expense in expenses.iter().filter(|e| e.is_shared) {
        let reason = check_expense(expense).or_else(|| {
            accumulation
                .balances
                .by_currency
                .entry(expense.currency.clone())
                .or_default()
                .add_expense(expense)
                .is_none()
                .then_some(ExclusionReason::AmountOutOfRange)
        });

        if let Some(reason) = reason {
            warn!(expense_id = %expense.id, %reason, "Skipping shared expense");
            accumulation.excluded.push(ExcludedExpense {
                expense_id: expense.id,
                reason,
            });
        }
    }

    debug!(
        currencies = accumulation.balances.by_currency.len(),
        excluded = accumulation.excluded.len(),
        "Accumulated net balances"
    );

    accumulation
}
