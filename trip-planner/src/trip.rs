//! Trip state container
//!
//! Owns the member roster and the expense list. Nothing here is cached:
//! settlement is recomputed from the current expenses on every call.

use crate::{Error, Result};
use chrono::NaiveDate;
use expense_settlement::{Expense, MemberId, SettlementEngine, SettlementReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Trip dates and members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSettings {
    /// First day of the trip
    pub start_date: NaiveDate,

    /// Last day of the trip
    pub end_date: NaiveDate,

    /// Members in roster order
    #[serde(default)]
    pub members: Vec<MemberId>,
}

/// Serialized trip (settings plus expenses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDocument {
    /// Trip settings
    pub settings: TripSettings,

    /// Recorded expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Trip with its roster and expenses
#[derive(Debug, Clone)]
pub struct Trip {
    settings: TripSettings,
    expenses: Vec<Expense>,
}

impl Trip {
    /// Create an empty trip
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        Self::from_document(TripDocument {
            settings: TripSettings {
                start_date,
                end_date,
                members: Vec::new(),
            },
            expenses: Vec::new(),
        })
    }

    /// Build a trip from a document
    ///
    /// Stored expenses are taken as-is; malformed ones are skipped (and
    /// reported) at settlement time rather than rejected here.
    pub fn from_document(document: TripDocument) -> Result<Self> {
        let settings = document.settings;

        if settings.end_date < settings.start_date {
            return Err(Error::InvalidDocument(format!(
                "Trip ends ({}) before it starts ({})",
                settings.end_date, settings.start_date
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for member in &settings.members {
            if member.is_blank() {
                return Err(Error::InvalidDocument("Blank member name".to_string()));
            }
            if !seen.insert(member) {
                return Err(Error::InvalidDocument(format!("Duplicate member {}", member)));
            }
        }

        Ok(Self {
            settings,
            expenses: document.expenses,
        })
    }

    /// Load a trip document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: TripDocument = serde_json::from_str(&content)?;
        Self::from_document(document)
    }

    /// Snapshot as a document
    pub fn to_document(&self) -> TripDocument {
        TripDocument {
            settings: self.settings.clone(),
            expenses: self.expenses.clone(),
        }
    }

    /// Trip settings
    pub fn settings(&self) -> &TripSettings {
        &self.settings
    }

    /// Members in roster order
    pub fn members(&self) -> &[MemberId] {
        &self.settings.members
    }

    /// Recorded expenses in entry order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Add a member to the roster
    pub fn add_member(&mut self, name: impl Into<String>) -> Result<MemberId> {
        let name: String = name.into();
        let member = MemberId::new(name.trim());

        if member.is_blank() {
            return Err(Error::BlankMember);
        }
        if self.is_member(&member) {
            return Err(Error::DuplicateMember(member.to_string()));
        }

        info!(member = %member, "Adding trip member");
        self.settings.members.push(member.clone());
        Ok(member)
    }

    /// Remove a member from the roster
    ///
    /// Expenses already recorded with this member are kept and still settle.
    pub fn remove_member(&mut self, member: &MemberId) -> Result<()> {
        let position = self
            .settings
            .members
            .iter()
            .position(|m| m == member)
            .ok_or_else(|| Error::UnknownMember(member.to_string()))?;

        info!(member = %member, "Removing trip member");
        self.settings.members.remove(position);
        Ok(())
    }

    fn is_member(&self, member: &MemberId) -> bool {
        self.settings.members.contains(member)
    }

    /// Record a new expense
    ///
    /// Payer and participants must be on the roster. A shared expense
    /// entered without participants is split across the whole roster.
    pub fn add_expense(&mut self, mut expense: Expense) -> Result<Uuid> {
        if expense.description.trim().is_empty() {
            return Err(Error::InvalidExpense("Description must not be blank".to_string()));
        }

        if expense.amount <= Decimal::ZERO {
            return Err(Error::InvalidExpense(format!(
                "Amount must be positive, got {}",
                expense.amount
            )));
        }

        if !self.is_member(&expense.payer) {
            return Err(Error::UnknownMember(expense.payer.to_string()));
        }

        if expense.is_shared && expense.participants.is_empty() {
            expense.participants = self.settings.members.clone();
        }

        if let Some(unknown) = expense.participants.iter().find(|p| !self.is_member(p)) {
            return Err(Error::UnknownMember(unknown.to_string()));
        }

        if self.expenses.iter().any(|e| e.id == expense.id) {
            return Err(Error::InvalidExpense(format!("Duplicate expense ID {}", expense.id)));
        }

        debug!(
            expense_id = %expense.id,
            payer = %expense.payer,
            amount = %expense.amount,
            currency = %expense.currency,
            "Recording expense"
        );

        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    /// Remove an expense by ID
    pub fn remove_expense(&mut self, id: Uuid) -> Result<Expense> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::ExpenseNotFound(id))?;

        Ok(self.expenses.remove(position))
    }

    /// Settle the current expenses
    pub fn settle(&self, engine: &SettlementEngine) -> SettlementReport {
        engine.settle_with_report(&self.expenses)
    }
}
