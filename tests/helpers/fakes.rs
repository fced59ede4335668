// In-memory repository fakes.
//
// Each fake applies the same status, window, scope, and ordering rules
// as its MySQL counterpart, so service tests exercise the contracts the
// production queries honor without a database.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use saccoflow::core::{AppError, Result, ScopeSelector};
use saccoflow::modules::groups::models::{Group, GroupMembership, MembershipStatus};
use saccoflow::modules::groups::repositories::GroupRepository;
use saccoflow::modules::loans::models::{Loan, LoanStatus};
use saccoflow::modules::loans::repositories::LoanRepository;
use saccoflow::modules::members::models::{Member, MemberRole};
use saccoflow::modules::members::repositories::MemberRepository;
use saccoflow::modules::savings::models::{Account, AccountKind};
use saccoflow::modules::savings::repositories::AccountRepository;
use saccoflow::modules::transactions::models::{Transaction, TransactionKind, TransactionStatus};
use saccoflow::modules::transactions::repositories::TransactionRepository;

pub struct FakeLoanRepository {
    loans: Vec<Loan>,
}

impl FakeLoanRepository {
    pub fn new(loans: Vec<Loan>) -> Self {
        Self { loans }
    }
}

#[async_trait]
impl LoanRepository for FakeLoanRepository {
    async fn find_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        if statuses.is_empty() || scope.matches_none() {
            return Ok(vec![]);
        }
        Ok(self
            .loans
            .iter()
            .filter(|l| statuses.contains(&l.status) && scope.allows(&l.id))
            .cloned()
            .collect())
    }

    async fn find_with_pending_due_before(
        &self,
        statuses: &[LoanStatus],
        before: NaiveDate,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        let with_status = self.find_with_status(statuses, scope).await?;
        Ok(with_status
            .into_iter()
            .filter(|l| {
                l.repayment_schedule
                    .iter()
                    .any(|i| i.is_pending() && i.due_date < before)
            })
            .collect())
    }

    async fn count_all(&self, scope: &ScopeSelector) -> Result<i64> {
        if scope.matches_none() {
            return Ok(0);
        }
        Ok(self.loans.iter().filter(|l| scope.allows(&l.id)).count() as i64)
    }

    async fn count_with_status(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<i64> {
        Ok(self.find_with_status(statuses, scope).await?.len() as i64)
    }

    async fn total_approved_amount(
        &self,
        statuses: &[LoanStatus],
        scope: &ScopeSelector,
    ) -> Result<Decimal> {
        let loans = self.find_with_status(statuses, scope).await?;
        Ok(loans
            .iter()
            .filter_map(|l| l.amount_approved)
            .sum::<Decimal>())
    }

    async fn recent_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }
        let mut recent: Vec<Loan> = self
            .loans
            .iter()
            .filter(|l| l.created_at >= since && scope.allows(&l.id))
            .map(|l| Loan {
                repayment_schedule: vec![],
                ..l.clone()
            })
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

pub struct FakeTransactionRepository {
    transactions: Vec<Transaction>,
}

impl FakeTransactionRepository {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

/// A restricted selector admits only rows whose actor is in the id set,
/// which excludes rows with no recorded actor.
fn actor_in_scope(txn: &Transaction, scope: &ScopeSelector) -> bool {
    match scope.restricted_ids() {
        None => true,
        Some(_) => txn.actor.as_ref().is_some_and(|a| scope.allows(&a.id)),
    }
}

#[async_trait]
impl TransactionRepository for FakeTransactionRepository {
    async fn repayments_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }
        let mut hits: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| {
                t.kind == TransactionKind::LoanRepayment
                    && t.status == TransactionStatus::Completed
                    && !t.deleted
                    && t.payment_date >= start
                    && t.payment_date < end
                    && actor_in_scope(t, scope)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        Ok(hits)
    }

    async fn recent_by_kind(
        &self,
        kind: TransactionKind,
        since: DateTime<Utc>,
        limit: u32,
        scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }
        let mut recent: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.kind == kind && t.created_at >= since && actor_in_scope(t, scope))
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}

pub struct FakeAccountRepository {
    accounts: Vec<Account>,
}

impl FakeAccountRepository {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountRepository for FakeAccountRepository {
    async fn active_member_savings(&self, member_ids: &[String]) -> Result<Vec<Account>> {
        if member_ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(self
            .accounts
            .iter()
            .filter(|a| {
                a.owner.is_member()
                    && a.kind == AccountKind::Savings
                    && a.is_active()
                    && member_ids.contains(&a.owner.id)
            })
            .cloned()
            .collect())
    }

    async fn group_savings_account(&self, group_id: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|a| {
                a.owner.is_group()
                    && a.owner.id == group_id
                    && a.kind == AccountKind::GroupSavings
                    && a.is_active()
            })
            .cloned())
    }

    async fn active_accounts_in_scope(
        &self,
        member_scope: &ScopeSelector,
        group_scope: &ScopeSelector,
    ) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| {
                if !a.is_active() {
                    return false;
                }
                let member_arm = a.owner.is_member()
                    && a.kind == AccountKind::Savings
                    && !member_scope.matches_none()
                    && member_scope.allows(&a.owner.id);
                let group_arm = a.owner.is_group()
                    && a.kind == AccountKind::GroupSavings
                    && !group_scope.matches_none()
                    && group_scope.allows(&a.owner.id);
                member_arm || group_arm
            })
            .cloned()
            .collect())
    }
}

pub struct FakeGroupRepository {
    groups: Vec<Group>,
    memberships: Vec<GroupMembership>,
}

impl FakeGroupRepository {
    pub fn new(groups: Vec<Group>, memberships: Vec<GroupMembership>) -> Self {
        Self {
            groups,
            memberships,
        }
    }
}

#[async_trait]
impl GroupRepository for FakeGroupRepository {
    async fn find_groups(&self, scope: &ScopeSelector) -> Result<Vec<Group>> {
        if scope.matches_none() {
            return Ok(vec![]);
        }
        Ok(self
            .groups
            .iter()
            .filter(|g| scope.allows(&g.id))
            .cloned()
            .collect())
    }

    async fn active_member_ids(&self, group_id: &str) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.group_id == group_id && m.status == MembershipStatus::Active)
            .filter(|m| seen.insert(m.member_id.clone()))
            .map(|m| m.member_id.clone())
            .collect())
    }
}

pub struct FakeMemberRepository {
    members: Vec<Member>,
}

impl FakeMemberRepository {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberRepository for FakeMemberRepository {
    async fn count_members(&self, scope: &ScopeSelector) -> Result<i64> {
        if scope.matches_none() {
            return Ok(0);
        }
        Ok(self
            .members
            .iter()
            .filter(|m| m.role == MemberRole::Member && scope.allows(&m.id))
            .count() as i64)
    }
}

/// Loan repository whose every call fails like a lost connection.
pub struct FailingLoanRepository;

fn storage_failure() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl LoanRepository for FailingLoanRepository {
    async fn find_with_status(
        &self,
        _statuses: &[LoanStatus],
        _scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        Err(storage_failure())
    }

    async fn find_with_pending_due_before(
        &self,
        _statuses: &[LoanStatus],
        _before: NaiveDate,
        _scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        Err(storage_failure())
    }

    async fn count_all(&self, _scope: &ScopeSelector) -> Result<i64> {
        Err(storage_failure())
    }

    async fn count_with_status(
        &self,
        _statuses: &[LoanStatus],
        _scope: &ScopeSelector,
    ) -> Result<i64> {
        Err(storage_failure())
    }

    async fn total_approved_amount(
        &self,
        _statuses: &[LoanStatus],
        _scope: &ScopeSelector,
    ) -> Result<Decimal> {
        Err(storage_failure())
    }

    async fn recent_since(
        &self,
        _since: DateTime<Utc>,
        _limit: u32,
        _scope: &ScopeSelector,
    ) -> Result<Vec<Loan>> {
        Err(storage_failure())
    }
}

/// Transaction repository whose every call fails like a lost connection.
pub struct FailingTransactionRepository;

#[async_trait]
impl TransactionRepository for FailingTransactionRepository {
    async fn repayments_in_window(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        Err(storage_failure())
    }

    async fn recent_by_kind(
        &self,
        _kind: TransactionKind,
        _since: DateTime<Utc>,
        _limit: u32,
        _scope: &ScopeSelector,
    ) -> Result<Vec<Transaction>> {
        Err(storage_failure())
    }
}
