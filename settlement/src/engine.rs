//! Main settlement engine
//!
//! Orchestrates balance accumulation and netting, one currency at a time.

use crate::{
    balances::{accumulate, NetBalances},
    config::Config,
    netting::NettingEngine,
    types::{Expense, Transfer},
    validation::ExcludedExpense,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Transfers plus the shared expenses that had to be skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Transfers, grouped by currency in code order
    pub transfers: Vec<Transfer>,

    /// Malformed shared expenses left out of the balances
    pub excluded: Vec<ExcludedExpense>,
}

/// Settlement engine
///
/// Holds only its configuration; every call works from its input alone.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Netting engine
    netting: NettingEngine,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: &Config) -> Self {
        Self {
            netting: NettingEngine::new(config.netting.tolerance, config.netting.decimal_places),
        }
    }

    /// Compute the transfers that settle every shared expense
    pub fn settle(&self, expenses: &[Expense]) -> Vec<Transfer> {
        self.settle_with_report(expenses).transfers
    }

    /// Compute transfers and report skipped expenses
    pub fn settle_with_report(&self, expenses: &[Expense]) -> SettlementReport {
        let accumulation = accumulate(expenses);
        let transfers = self.net(&accumulation.balances);

        info!(
            expenses = expenses.len(),
            excluded = accumulation.excluded.len(),
            transfers = transfers.len(),
            "Settlement computed"
        );

        SettlementReport {
            transfers,
            excluded: accumulation.excluded,
        }
    }

    /// Net already accumulated balances, currency by currency
    pub fn net(&self, balances: &NetBalances) -> Vec<Transfer> {
        balances
            .iter()
            .flat_map(|(currency, currency_balances)| {
                self.netting.generate_transfers(currency_balances, currency)
            })
            .collect()
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Settle with the default configuration
pub fn settle(expenses: &[Expense]) -> Vec<Transfer> {
    SettlementEngine::default().settle(expenses)
}
