//! Core types for the settlement engine
//!
//! All types are designed for:
//! - Deterministic ordering (member and currency tie-breaks)
//! - Exact arithmetic (Decimal for money)
//! - Round-tripping through the trip documents (serde, camelCase)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trip member identifier (display name)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create new member ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace-only identifiers cannot take part in settlement
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Currency tag
///
/// Any number of distinct tags can coexist; balances in different currencies
/// are never converted or pooled.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a currency tag, normalized to upper case
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Japanese Yen
    pub fn jpy() -> Self {
        Self::new("JPY")
    }

    /// New Taiwan Dollar
    pub fn twd() -> Self {
        Self::new("TWD")
    }

    /// Currency code
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Display symbol for the currencies the app knows about
    pub fn symbol(&self) -> &str {
        match self.0.as_str() {
            "JPY" => "¥",
            "TWD" => "$",
            other => other,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recorded trip expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Member who fronted the money
    pub payer: MemberId,

    /// Amount paid
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Day the expense happened
    pub date: NaiveDate,

    /// Shared expenses are split, personal ones are ignored by settlement
    pub is_shared: bool,

    /// Members splitting the amount equally (a set; duplicates collapse)
    #[serde(default)]
    pub participants: Vec<MemberId>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Expense {
    /// Create a shared expense dated today
    pub fn shared(
        payer: impl Into<MemberId>,
        amount: Decimal,
        currency: Currency,
        participants: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payer: payer.into(),
            amount,
            currency,
            description: String::new(),
            date: today(),
            is_shared: true,
            participants: participants.into_iter().collect(),
        }
    }

    /// Create a personal (non-shared) expense dated today
    pub fn personal(payer: impl Into<MemberId>, amount: Decimal, currency: Currency) -> Self {
        let payer = payer.into();
        Self {
            id: Uuid::new_v4(),
            participants: vec![payer.clone()],
            payer,
            amount,
            currency,
            description: String::new(),
            date: today(),
            is_shared: false,
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Distinct participants in first-seen order
    pub fn distinct_participants(&self) -> Vec<&MemberId> {
        let mut seen = std::collections::HashSet::new();
        self.participants
            .iter()
            .filter(|member| seen.insert(*member))
            .collect()
    }
}

/// Directed payment instruction that settles part of a balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Debtor (pays)
    pub from: MemberId,

    /// Creditor (receives)
    pub to: MemberId,

    /// Amount, rounded to the configured minor unit
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} {} {}", self.from, self.to, self.amount, self.currency)
    }
}
