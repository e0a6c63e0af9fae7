//! Spending summaries for the expense view

use chrono::NaiveDate;
use expense_settlement::{Currency, Expense};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Total spent per currency, shared and personal expenses alike
pub fn spending_totals(expenses: &[Expense]) -> BTreeMap<Currency, Decimal> {
    let mut totals: BTreeMap<Currency, Decimal> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.currency.clone()).or_insert(Decimal::ZERO) += expense.amount;
    }

    totals
}

/// Expenses grouped by day, days ascending, entry order within a day
pub fn group_by_date(expenses: &[Expense]) -> BTreeMap<NaiveDate, Vec<&Expense>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&Expense>> = BTreeMap::new();

    for expense in expenses {
        grouped.entry(expense.date).or_default().push(expense);
    }

    grouped
}
