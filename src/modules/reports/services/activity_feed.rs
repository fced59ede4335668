use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::CurrencyCode;
use crate::modules::loans::models::Loan;
use crate::modules::transactions::models::Transaction;

/// Source category of a normalized activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LoanApplication,
    LoanRepayment,
    Deposit,
    Withdrawal,
}

/// One entry of an activity feed, normalized from a loan or transaction
/// record. Amounts are formatted with the system default currency; the
/// dashboard embeds events with the amount fields stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_amount: Option<String>,
}

impl ActivityEvent {
    /// Event for a newly created loan application.
    pub fn loan_application(loan: &Loan, currency: &CurrencyCode) -> Self {
        let formatted = currency.format_amount(loan.amount_requested);
        Self {
            description: format!(
                "New loan application from {} for {}",
                loan.borrower.display_name(),
                formatted
            ),
            timestamp: loan.created_at,
            kind: ActivityKind::LoanApplication,
            amount: Some(loan.amount_requested),
            formatted_amount: Some(formatted),
        }
    }

    /// Dashboard wording for a repayment, referencing the loan by a short
    /// id prefix.
    pub fn payment_received(txn: &Transaction, currency: &CurrencyCode) -> Self {
        let loan_ref = txn
            .loan_id
            .as_deref()
            .map(|id| id.chars().take(6).collect::<String>())
            .unwrap_or_else(|| "Unknown".to_string());
        let formatted = currency.format_amount(txn.amount);
        Self {
            description: format!(
                "Payment received of {} for loan {} by {}",
                formatted,
                loan_ref,
                txn.actor_display_name()
            ),
            timestamp: txn.created_at,
            kind: ActivityKind::LoanRepayment,
            amount: Some(txn.amount),
            formatted_amount: Some(formatted),
        }
    }

    /// Activity-feed wording for a repayment.
    pub fn loan_repayment(txn: &Transaction, currency: &CurrencyCode) -> Self {
        let formatted = currency.format_amount(txn.amount);
        Self {
            description: format!(
                "Loan repayment of {} for loan by {}",
                formatted,
                txn.actor_display_name()
            ),
            timestamp: txn.created_at,
            kind: ActivityKind::LoanRepayment,
            amount: Some(txn.amount),
            formatted_amount: Some(formatted),
        }
    }

    pub fn savings_deposit(txn: &Transaction, currency: &CurrencyCode) -> Self {
        let formatted = currency.format_amount(txn.amount);
        Self {
            description: format!(
                "Savings deposit of {} by {}",
                formatted,
                txn.actor_display_name()
            ),
            timestamp: txn.created_at,
            kind: ActivityKind::Deposit,
            amount: Some(txn.amount),
            formatted_amount: Some(formatted),
        }
    }

    pub fn savings_withdrawal(txn: &Transaction, currency: &CurrencyCode) -> Self {
        let formatted = currency.format_amount(txn.amount);
        Self {
            description: format!(
                "Savings withdrawal of {} by {}",
                formatted,
                txn.actor_display_name()
            ),
            timestamp: txn.created_at,
            kind: ActivityKind::Withdrawal,
            amount: Some(txn.amount),
            formatted_amount: Some(formatted),
        }
    }

    /// Drop the amount fields for contexts that only show descriptions.
    pub fn without_amounts(mut self) -> Self {
        self.amount = None;
        self.formatted_amount = None;
        self
    }
}

/// Merger for activity events drawn from multiple sources.
pub struct ActivityFeed;

impl ActivityFeed {
    /// Concatenate sources in enumeration order, sort newest first and
    /// truncate to `limit`. The sort is stable, so events with equal
    /// timestamps keep their source order. No deduplication is applied.
    pub fn merge(sources: Vec<Vec<ActivityEvent>>, limit: usize) -> Vec<ActivityEvent> {
        let mut events: Vec<ActivityEvent> = sources.into_iter().flatten().collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        events
    }
}
