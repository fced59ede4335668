use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{CurrencyCode, PartyRef};
use crate::modules::loans::models::Installment;

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Application awaiting a decision
    Pending,
    /// Approved but funds not yet released
    Approved,
    /// Funds released to the borrower
    Disbursed,
    /// Carrying missed repayments
    Overdue,
    /// Application declined
    Rejected,
    /// Fully repaid or written off
    Closed,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Disbursed => "disbursed",
            Self::Overdue => "overdue",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for LoanStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "disbursed" => Ok(Self::Disbursed),
            "overdue" => Ok(Self::Overdue),
            "rejected" => Ok(Self::Rejected),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid loan status: {}", value)),
        }
    }
}

/// Borrower display fields joined onto a loan by the repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrower {
    pub party: PartyRef,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Borrower {
    /// Name for display strings; missing records show as "Unknown"
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// A loan with its embedded repayment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub borrower: Borrower,
    pub amount_requested: Decimal,
    pub amount_approved: Option<Decimal>,
    /// Loan-specific currency; `None` falls back to the system default
    pub currency: Option<CurrencyCode>,
    pub status: LoanStatus,
    /// Term in months
    pub loan_term: i32,
    /// Chronological by due date
    pub repayment_schedule: Vec<Installment>,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// Currency governing this loan's display strings
    pub fn effective_currency<'a>(&'a self, fallback: &'a CurrencyCode) -> &'a CurrencyCode {
        self.currency.as_ref().unwrap_or(fallback)
    }

    /// Formatted approved amount; an unapproved loan formats as zero
    pub fn formatted_amount_approved(&self, fallback: &CurrencyCode) -> String {
        self.effective_currency(fallback)
            .format_amount(self.amount_approved.unwrap_or_default())
    }
}
