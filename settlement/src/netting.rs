//! Greedy debt netting
//!
//! Turns one currency's net balances into person-to-person transfers.
//!
//! # Algorithm
//!
//! 1. Round every balance to the minor unit, handing the units that rounding
//!    created or lost back out so the rounded balances still sum to zero
//! 2. Split members into creditors and debtors by absolute amount, dropping
//!    anyone within the tolerance of zero
//! 3. Sort both sides largest first, ties broken by member ID
//! 4. Match the current largest debtor with the current largest creditor
//!    for `min(owed, owing)`, then move past whichever side is settled
//!
//! Matching runs on exact minor units, so every step settles at least one
//! party and a currency with `n` parties produces at most `n - 1` transfers.
//! After the transfers no member is more than one minor unit away from zero.
//!
//! # Example
//!
//! ```text
//! Net positions:
//!   A: +500 (creditor)
//!   B: -100 (debtor)
//!   C: -400 (debtor)
//!
//! Transfers:
//!   C pays A: 400
//!   B pays A: 100
//! ```

use crate::{
    balances::CurrencyBalances,
    types::{Currency, MemberId, Transfer},
};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use std::cmp::Ordering;
use tracing::debug;

/// Member with an outstanding amount on one side of the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    /// Member
    pub member: MemberId,

    /// Absolute amount still to be paid or received
    pub remaining: Decimal,
}

impl Party {
    /// Largest amount first, then member ID ascending
    fn settlement_order(a: &Party, b: &Party) -> Ordering {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.member.cmp(&b.member))
    }
}

/// Balance rounded to the minor unit
struct Rounded {
    member: MemberId,
    rounded: Decimal,
    /// `rounded - exact`
    drift: Decimal,
}

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Balances within this distance of zero count as settled
    tolerance: Decimal,

    /// Decimal places of the minor unit
    decimal_places: u32,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(tolerance: Decimal, decimal_places: u32) -> Self {
        Self {
            tolerance,
            decimal_places,
        }
    }

    /// Settled means nothing left, or strictly less than the tolerance
    fn is_settled(&self, remaining: Decimal) -> bool {
        remaining.is_zero() || remaining < self.tolerance
    }

    /// Round balances to the minor unit without breaking their sum
    ///
    /// Each balance is rounded half away from zero. The units this creates
    /// (or loses) across the currency are taken back from (or given to) the
    /// members whose rounding moved them furthest that way, ties by member ID,
    /// so nobody ends up more than one unit from their exact balance.
    pub fn quantize(&self, balances: &CurrencyBalances) -> Vec<(MemberId, Decimal)> {
        let unit = Decimal::new(1, self.decimal_places);

        let mut entries: Vec<Rounded> = balances
            .iter()
            .map(|(member, exact)| {
                let rounded = exact
                    .round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
                Rounded {
                    member: member.clone(),
                    rounded,
                    drift: rounded - exact,
                }
            })
            .collect();

        let drift: Decimal = entries.iter().map(|e| e.drift).sum();
        let units = (drift / unit).round().to_i64().unwrap_or(0);

        if units > 0 {
            // Rounding added money: take it back from those who gained most
            entries.sort_by(|a, b| b.drift.cmp(&a.drift).then_with(|| a.member.cmp(&b.member)));
        } else if units < 0 {
            // Rounding lost money: give it to those who lost most
            entries.sort_by(|a, b| a.drift.cmp(&b.drift).then_with(|| a.member.cmp(&b.member)));
        }

        let adjustments = usize::try_from(units.unsigned_abs()).unwrap_or(usize::MAX);
        for entry in entries.iter_mut().take(adjustments) {
            let adjusted = if units > 0 {
                entry.rounded.checked_sub(unit)
            } else {
                entry.rounded.checked_add(unit)
            };
            if let Some(adjusted) = adjusted {
                entry.rounded = adjusted;
            }
        }

        if units != 0 {
            debug!(units, members = entries.len(), "Redistributed rounding units");
        }

        entries.into_iter().map(|e| (e.member, e.rounded)).collect()
    }

    /// Split members into sorted creditors and debtors
    ///
    /// Works on the rounded balances from [`NettingEngine::quantize`].
    /// Members within tolerance of zero owe and are owed nothing and are
    /// dropped.
    pub fn partition(&self, balances: &CurrencyBalances) -> (Vec<Party>, Vec<Party>) {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();

        for (member, balance) in self.quantize(balances) {
            if self.is_settled(balance.abs()) {
                continue;
            }
            let party = Party {
                member,
                remaining: balance.abs(),
            };
            if balance > Decimal::ZERO {
                creditors.push(party);
            } else {
                debtors.push(party);
            }
        }

        creditors.sort_by(Party::settlement_order);
        debtors.sort_by(Party::settlement_order);

        (creditors, debtors)
    }

    /// Generate transfers that settle one currency's balances
    pub fn generate_transfers(
        &self,
        balances: &CurrencyBalances,
        currency: &Currency,
    ) -> Vec<Transfer> {
        let (mut creditors, mut debtors) = self.partition(balances);
        let mut transfers = Vec::new();

        // Greedy matching: largest debtor pays largest creditor
        let mut creditor_idx = 0;
        let mut debtor_idx = 0;

        while creditor_idx < creditors.len() && debtor_idx < debtors.len() {
            let creditor = &mut creditors[creditor_idx];
            let debtor = &mut debtors[debtor_idx];

            // Both sides are whole minor units, so this is exact
            let amount = creditor.remaining.min(debtor.remaining);

            transfers.push(Transfer {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                amount,
                currency: currency.clone(),
            });

            creditor.remaining -= amount;
            debtor.remaining -= amount;

            let creditor_done = self.is_settled(creditor.remaining);
            let debtor_done = self.is_settled(debtor.remaining);

            if creditor_done {
                creditor_idx += 1;
            }
            if debtor_done {
                debtor_idx += 1;
            }
        }

        debug!(
            currency = %currency,
            creditors = creditors.len(),
            debtors = debtors.len(),
            transfers = transfers.len(),
            "Netted currency"
        );

        transfers
    }
}

impl Default for NettingEngine {
    fn default() -> Self {
        let config = crate::config::NettingConfig::default();
        Self::new(config.tolerance, config.decimal_places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(name: &str) -> MemberId {
        MemberId::new(name)
    }

    fn balances(entries: &[(&str, i64)]) -> CurrencyBalances {
        let mut balances = CurrencyBalances::default();
        for (name, amount) in entries {
            balances.credit(&m(name), Decimal::from(*amount));
        }
        balances
    }

    fn transfer(from: &str, to: &str, amount: i64) -> Transfer {
        Transfer {
            from: m(from),
            to: m(to),
            amount: Decimal::from(amount),
            currency: Currency::jpy(),
        }
    }

    #[test]
    fn test_partition_drops_settled_members() {
        let engine = NettingEngine::default();
        let mut balances = balances(&[("A", 100), ("B", -100)]);
        balances.credit(&m("C"), Decimal::new(4, 3)); // 0.004

        let (creditors, debtors) = engine.partition(&balances);

        assert_eq!(creditors.len(), 1);
        assert_eq!(debtors.len(), 1);
        assert_eq!(debtors[0].remaining, Decimal::from(100));
    }

    #[test]
    fn test_partition_ties_broken_by_member() {
        let engine = NettingEngine::default();
        let balances = balances(&[("C", -50), ("A", 100), ("B", -50)]);

        let (_, debtors) = engine.partition(&balances);
        let order: Vec<_> = debtors.iter().map(|p| p.member.as_str()).collect();

        assert_eq!(order, vec!["B", "C"]);
    }

    #[test]
    fn test_largest_pairs_first() {
        let engine = NettingEngine::default();
        let balances = balances(&[("A", 500), ("B", -100), ("C", -400)]);

        let transfers = engine.generate_transfers(&balances, &Currency::jpy());

        assert_eq!(
            transfers,
            vec![transfer("C", "A", 400), transfer("B", "A", 100)]
        );
    }

    #[test]
    fn test_creditor_split_across_debtors() {
        let engine = NettingEngine::default();
        let balances = balances(&[("A", 70), ("B", 30), ("C", -60), ("D", -40)]);

        let transfers = engine.generate_transfers(&balances, &Currency::jpy());

        assert_eq!(
            transfers,
            vec![
                transfer("C", "A", 60),
                transfer("D", "A", 10),
                transfer("D", "B", 30),
            ]
        );
    }

    #[test]
    fn test_amounts_rounded_on_emission() {
        let engine = NettingEngine::default();
        let mut balances = CurrencyBalances::default();
        let third = Decimal::from(100) / Decimal::from(3);
        balances.credit(&m("A"), third * Decimal::from(2));
        balances.debit(&m("B"), third);
        balances.debit(&m("C"), third);

        let transfers = engine.generate_transfers(&balances, &Currency::twd());

        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.amount == Decimal::new(3333, 2)));
    }

    #[test]
    fn test_quantize_keeps_zero_sum() {
        let engine = NettingEngine::default();
        let mut balances = CurrencyBalances::default();
        let sixth = Decimal::from(100) / Decimal::from(6);
        balances.credit(&m("A"), Decimal::from(100));
        for name in ["B", "C", "D", "E", "F", "G"] {
            balances.debit(&m(name), sixth);
        }

        let quantized = engine.quantize(&balances);
        let total: Decimal = quantized.iter().map(|(_, q)| *q).sum();

        assert_eq!(total, Decimal::ZERO);
        for (member, q) in &quantized {
            assert!((balances.net(member) - q).abs() <= Decimal::new(1, 2));
        }
        // Two units handed back, lowest member IDs first
        let adjusted: Vec<_> = quantized
            .iter()
            .filter(|(_, q)| *q == Decimal::new(-1666, 2))
            .map(|(member, _)| member.as_str())
            .collect();
        assert_eq!(adjusted, vec!["B", "C"]);
    }

    #[test]
    fn test_remainder_of_exactly_tolerance_still_paid() {
        let engine = NettingEngine::default();
        let mut balances = CurrencyBalances::default();
        balances.credit(&m("A"), Decimal::new(1001, 2));
        balances.debit(&m("B"), Decimal::from(10));
        balances.debit(&m("C"), Decimal::new(1, 2));

        let transfers = engine.generate_transfers(&balances, &Currency::twd());

        assert_eq!(
            transfers
                .iter()
                .map(|t| (t.from.as_str(), t.to.as_str(), t.amount))
                .collect::<Vec<_>>(),
            vec![("B", "A", Decimal::from(10)), ("C", "A", Decimal::new(1, 2))]
        );
    }

    #[test]
    fn test_empty_balances() {
        let engine = NettingEngine::default();
        let transfers = engine.generate_transfers(&CurrencyBalances::default(), &Currency::jpy());
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_zero_tolerance_terminates() {
        let engine = NettingEngine::new(Decimal::ZERO, 2);
        let balances = balances(&[("A", 10), ("B", -10)]);

        let transfers = engine.generate_transfers(&balances, &Currency::jpy());

        assert_eq!(transfers, vec![transfer("B", "A", 10)]);
    }
}
