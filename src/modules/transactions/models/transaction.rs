use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PartyRef;

/// What a financial movement represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Instalment payment against a loan
    LoanRepayment,
    /// Loan principal paid out to a borrower
    LoanDisbursement,
    /// Money paid into a savings account
    SavingsContribution,
    /// Money taken out of a savings account
    SavingsWithdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoanRepayment => "loan_repayment",
            Self::LoanDisbursement => "loan_disbursement",
            Self::SavingsContribution => "savings_contribution",
            Self::SavingsWithdrawal => "savings_withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "loan_repayment" => Ok(Self::LoanRepayment),
            "loan_disbursement" => Ok(Self::LoanDisbursement),
            "savings_contribution" => Ok(Self::SavingsContribution),
            "savings_withdrawal" => Ok(Self::SavingsWithdrawal),
            _ => Err(format!("Invalid transaction kind: {}", value)),
        }
    }
}

/// Transaction settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for TransactionStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid transaction status: {}", value)),
        }
    }
}

/// A recorded financial movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Late-payment penalty collected alongside a repayment
    pub penalty: Option<Decimal>,
    pub status: TransactionStatus,
    /// Soft-delete flag; summaries skip deleted rows
    pub deleted: bool,
    /// Party that performed the movement, when recorded
    pub actor: Option<PartyRef>,
    /// Actor display name joined by the repository
    pub actor_name: Option<String>,
    /// Loan the movement settles, for repayments
    pub loan_id: Option<String>,
    /// When the money actually moved
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Name for display strings; missing records show as "Unknown"
    pub fn actor_display_name(&self) -> &str {
        self.actor_name.as_deref().unwrap_or("Unknown")
    }

    /// Penalty with absence counted as zero
    pub fn penalty_amount(&self) -> Decimal {
        self.penalty.unwrap_or_default()
    }
}
