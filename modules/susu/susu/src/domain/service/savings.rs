use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use susu_audit::ActorId;
use susu_sdk::{
    AccountStatus, Commission, MarkPayment, Marking, NewSavingsAccount, NewTargetSavings, Role,
    SavingsAccount, SavingsType,
};
use susu_security::SecurityContext;
use tracing::{debug, info, instrument};

use crate::config::SusuConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    AccountDraft, BusinessesRepository, MembershipsRepository, SavingsRepository, UsersRepository,
};

use super::{require_account, require_business, require_user, schedule};

const TRACKING_ATTEMPTS: usize = 20;

/// Savings accounts, their daily markings and the commissions they accrue.
pub struct SavingsService<V, U, B, M>
where
    V: SavingsRepository,
    U: UsersRepository,
    B: BusinessesRepository,
    M: MembershipsRepository,
{
    db: DatabaseConnection,
    repo: Arc<V>,
    users: Arc<U>,
    businesses: Arc<B>,
    memberships: Arc<M>,
    config: Arc<SusuConfig>,
}

fn validate_commission(days: Option<i32>, amount: Option<i64>) -> Result<(), DomainError> {
    if days.is_some_and(|d| d <= 0) {
        return Err(DomainError::validation("commission_days", "must be positive"));
    }
    if amount.is_some_and(|a| a < 0) {
        return Err(DomainError::validation("commission_amount", "must not be negative"));
    }
    Ok(())
}

fn validate_new_account(account: &NewSavingsAccount, max_months: i32) -> Result<(), DomainError> {
    if account.daily_amount <= 0 {
        return Err(DomainError::validation("daily_amount", "must be positive"));
    }
    if account.duration_months <= 0 {
        return Err(DomainError::validation("duration_months", "must be positive"));
    }
    if account.duration_months > max_months {
        return Err(DomainError::validation(
            "duration_months",
            format!("must not exceed {max_months}"),
        ));
    }
    validate_commission(account.commission_days, account.commission_amount)
}

/// Daily amount and duration in months of a target account.
fn plan_target(target: &NewTargetSavings, max_months: i32) -> Result<(i64, i32), DomainError> {
    if target.target_amount <= 0 {
        return Err(DomainError::validation("target_amount", "must be positive"));
    }
    if target.end_date < target.start_date {
        return Err(DomainError::validation("end_date", "must not be before start_date"));
    }
    validate_commission(target.commission_days, target.commission_amount)?;

    let months = schedule::span_months(target.start_date, target.end_date)
        .filter(|m| *m <= max_months)
        .ok_or_else(|| {
            DomainError::validation("end_date", format!("span must not exceed {max_months} months"))
        })?;
    let days = schedule::total_days(target.start_date, target.end_date);
    let daily = schedule::daily_share(target.target_amount, days)
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            DomainError::validation("target_amount", format!("too small to spread over {days} days"))
        })?;
    Ok((daily, months))
}

impl<V, U, B, M> SavingsService<V, U, B, M>
where
    V: SavingsRepository,
    U: UsersRepository,
    B: BusinessesRepository,
    M: MembershipsRepository,
{
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<V>,
        users: Arc<U>,
        businesses: Arc<B>,
        memberships: Arc<M>,
        config: Arc<SusuConfig>,
    ) -> Self {
        Self {
            db,
            repo,
            users,
            businesses,
            memberships,
            config,
        }
    }

    /// Open a daily savings account and schedule one marking per day.
    ///
    /// # Errors
    /// `Validation` for non-positive amounts, a duration outside
    /// `1..=max_duration_months`, an owner who is not a customer linked to the
    /// business, or a unit of another business; `NotFound` for an unknown
    /// customer or business.
    #[instrument(skip(self, ctx, account), fields(actor = ?ctx.actor_id()))]
    pub async fn create_savings_account(
        &self,
        ctx: &SecurityContext,
        account: NewSavingsAccount,
    ) -> Result<SavingsAccount, DomainError> {
        validate_new_account(&account, self.config.max_duration_months)?;
        let end_date = schedule::end_date(account.start_date, account.duration_months)
            .ok_or_else(|| DomainError::validation("duration_months", "out of range"))?;

        let txn = self.db.begin().await?;
        self.check_owner(&txn, account.customer_id, account.business_id, account.unit_id)
            .await?;

        let days = schedule::total_days(account.start_date, end_date);
        let draft = AccountDraft {
            customer_id: account.customer_id,
            business_id: account.business_id,
            unit_id: account.unit_id,
            tracking_number: self.free_tracking_number(&txn).await?,
            savings_type: SavingsType::Daily,
            daily_amount: account.daily_amount,
            duration_months: account.duration_months,
            start_date: account.start_date,
            end_date,
            target_amount: account.daily_amount.saturating_mul(days),
            commission_days: account
                .commission_days
                .unwrap_or(schedule::DEFAULT_COMMISSION_DAYS),
            commission_amount: account.commission_amount.unwrap_or(account.daily_amount),
        };
        self.open(ctx, txn, draft).await
    }

    /// Open an account saving toward `target_amount` by `end_date`.
    ///
    /// # Errors
    /// `Validation` for a non-positive target, an end date before the start
    /// or beyond `max_duration_months`, a target too small to yield a daily
    /// amount, or the ownership rules of [`Self::create_savings_account`].
    #[instrument(skip(self, ctx, target), fields(actor = ?ctx.actor_id()))]
    pub async fn create_target_savings(
        &self,
        ctx: &SecurityContext,
        target: NewTargetSavings,
    ) -> Result<SavingsAccount, DomainError> {
        let (daily_amount, duration_months) = plan_target(&target, self.config.max_duration_months)?;

        let txn = self.db.begin().await?;
        self.check_owner(&txn, target.customer_id, target.business_id, target.unit_id)
            .await?;

        let draft = AccountDraft {
            customer_id: target.customer_id,
            business_id: target.business_id,
            unit_id: target.unit_id,
            tracking_number: self.free_tracking_number(&txn).await?,
            savings_type: SavingsType::Target,
            daily_amount,
            duration_months,
            start_date: target.start_date,
            end_date: target.end_date,
            target_amount: target.target_amount,
            commission_days: target
                .commission_days
                .unwrap_or(schedule::DEFAULT_COMMISSION_DAYS),
            commission_amount: target.commission_amount.unwrap_or(daily_amount),
        };
        self.open(ctx, txn, draft).await
    }

    /// The owner is a customer linked to the business, and the unit, when
    /// given, belongs to that business.
    async fn check_owner(
        &self,
        txn: &DatabaseTransaction,
        customer_id: i32,
        business_id: i32,
        unit_id: Option<i32>,
    ) -> Result<(), DomainError> {
        let customer = require_user(self.users.as_ref(), txn, customer_id).await?;
        if customer.role != Role::Customer {
            return Err(DomainError::validation(
                "customer_id",
                format!("user {} is not a customer", customer.id),
            ));
        }
        require_business(self.businesses.as_ref(), txn, business_id).await?;

        if let Some(unit_id) = unit_id {
            let unit = self
                .businesses
                .get_unit(txn, unit_id)
                .await?
                .ok_or_else(|| DomainError::validation("unit_id", format!("unit {unit_id} does not exist")))?;
            if unit.business_id != business_id {
                return Err(DomainError::validation(
                    "unit_id",
                    format!("unit {unit_id} does not belong to business {business_id}"),
                ));
            }
        }
        if !self.memberships.is_linked(txn, customer_id, business_id).await? {
            return Err(DomainError::validation(
                "customer_id",
                format!("customer {customer_id} is not a member of business {business_id}"),
            ));
        }
        Ok(())
    }

    async fn open(
        &self,
        ctx: &SecurityContext,
        txn: DatabaseTransaction,
        draft: AccountDraft,
    ) -> Result<SavingsAccount, DomainError> {
        let created = self.repo.create_account(&txn, draft, ctx.actor_id()).await?;
        let scheduled = self
            .repo
            .create_markings(
                &txn,
                &created,
                schedule::schedule_dates(created.start_date, created.end_date),
                &self.config.marking_status.default,
                ctx.actor_id(),
            )
            .await?;
        txn.commit().await?;

        info!(
            account_id = created.id,
            tracking_number = %created.tracking_number,
            savings_type = %created.savings_type,
            scheduled,
            total_commission = schedule::total_commission(&created),
            "savings account created"
        );
        Ok(created)
    }

    /// Move the account forward once its markings change: `completed` when no
    /// marking awaits payment, `in_progress` otherwise.
    async fn advance(
        &self,
        txn: &DatabaseTransaction,
        account: &SavingsAccount,
        actor: Option<ActorId>,
    ) -> Result<(), DomainError> {
        let pending = self
            .repo
            .count_markings_in_status(txn, account.id, &self.config.marking_status.default)
            .await?;
        let next = if pending == 0 {
            AccountStatus::Completed
        } else {
            AccountStatus::InProgress
        };
        if next != account.status {
            self.repo.set_account_status(txn, account.id, next, actor).await?;
            info!(account_id = account.id, status = %next, pending, "savings account progressed");
        }
        Ok(())
    }

    async fn free_tracking_number(&self, txn: &DatabaseTransaction) -> Result<String, DomainError> {
        for _ in 0..TRACKING_ATTEMPTS {
            let candidate = schedule::tracking_number();
            if !self.repo.tracking_number_exists(txn, &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(DomainError::conflict("could not generate a free tracking number"))
    }

    /// # Errors
    /// `NotFound` when the account does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn get_savings_account(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<SavingsAccount, DomainError> {
        require_account(self.repo.as_ref(), &self.db, id).await
    }

    /// Commission the account accrues over its whole duration.
    ///
    /// # Errors
    /// `NotFound` when the account does not exist.
    pub async fn total_commission(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<i64, DomainError> {
        let account = self.get_savings_account(ctx, id).await?;
        Ok(schedule::total_commission(&account))
    }

    /// Record the payment of the marking scheduled on `date`.
    ///
    /// The marking moves from the default to the paid status and the actor is
    /// recorded as `marked_by_id`. When the date opens a commission period, a
    /// commission of `commission_amount` accrues to the actor.
    ///
    /// The account becomes `in_progress`, or `completed` once no marking is
    /// left in the default status.
    ///
    /// # Errors
    /// `NotFound` for an unknown account, `Validation` for a date without a
    /// marking, `Conflict` when the account is completed or the marking is not
    /// in the default status.
    #[instrument(skip(self, ctx, payment), fields(actor = ?ctx.actor_id()))]
    pub async fn mark_payment(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
        date: NaiveDate,
        payment: MarkPayment,
    ) -> Result<Marking, DomainError> {
        let statuses = &self.config.marking_status;
        let txn = self.db.begin().await?;
        let account = require_account(self.repo.as_ref(), &txn, account_id).await?;
        reject_completed(&account)?;
        let marking = self
            .repo
            .find_marking(&txn, account_id, date)
            .await?
            .ok_or_else(|| {
                DomainError::validation("date", format!("no marking scheduled on {date}"))
            })?;
        if marking.status != statuses.default {
            return Err(DomainError::conflict(format!(
                "marking on {date} is already {}",
                marking.status
            )));
        }

        let paid = self
            .repo
            .record_payment(&txn, marking.id, &statuses.paid, payment, ctx.actor_id())
            .await?;
        if let Some(agent_id) = ctx.actor_id()
            && schedule::opens_commission_period(account.start_date, date, account.commission_days)
        {
            self.repo
                .add_commission(
                    &txn,
                    account_id,
                    agent_id,
                    account.commission_amount,
                    date,
                    ctx.actor_id(),
                )
                .await?;
            debug!(agent_id, amount = account.commission_amount, "commission accrued");
        }
        self.advance(&txn, &account, ctx.actor_id()).await?;
        txn.commit().await?;

        info!(marking_id = paid.id, %date, "payment marked");
        Ok(paid)
    }

    /// # Errors
    /// `Validation` for a status outside the configured domain, `NotFound`
    /// for an unknown marking, `Conflict` when its account is completed.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn update_marking_status(
        &self,
        ctx: &SecurityContext,
        marking_id: i32,
        status: &str,
    ) -> Result<Marking, DomainError> {
        let statuses = &self.config.marking_status;
        if !statuses.is_allowed(status) {
            return Err(DomainError::validation(
                "status",
                format!("'{status}' is not one of {}", statuses.allowed.join(", ")),
            ));
        }

        let txn = self.db.begin().await?;
        let current = self
            .repo
            .get_marking(&txn, marking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Marking", marking_id))?;
        let account = require_account(self.repo.as_ref(), &txn, current.savings_account_id).await?;
        reject_completed(&account)?;

        let marking = self
            .repo
            .set_marking_status(&txn, marking_id, status, ctx.actor_id())
            .await?;
        self.advance(&txn, &account, ctx.actor_id()).await?;
        txn.commit().await?;

        info!(marking_id, status, "marking status updated");
        Ok(marking)
    }

    /// Close the account early. Unpaid markings stay as they are but can no
    /// longer be paid.
    ///
    /// # Errors
    /// `NotFound` for an unknown account, `Conflict` when it is already
    /// completed.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn end_savings_account(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
    ) -> Result<SavingsAccount, DomainError> {
        let txn = self.db.begin().await?;
        let account = require_account(self.repo.as_ref(), &txn, account_id).await?;
        reject_completed(&account)?;
        let ended = self
            .repo
            .set_account_status(&txn, account_id, AccountStatus::Completed, ctx.actor_id())
            .await?;
        txn.commit().await?;

        info!(
            account_id,
            tracking_number = %ended.tracking_number,
            total_commission = schedule::total_commission(&ended),
            "savings account ended"
        );
        Ok(ended)
    }

    /// # Errors
    /// `NotFound` when the account does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_markings(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
    ) -> Result<Vec<Marking>, DomainError> {
        require_account(self.repo.as_ref(), &self.db, account_id).await?;
        self.repo.list_markings(&self.db, account_id).await
    }

    /// # Errors
    /// `NotFound` when the account does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_commissions(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
    ) -> Result<Vec<Commission>, DomainError> {
        require_account(self.repo.as_ref(), &self.db, account_id).await?;
        self.repo.list_commissions(&self.db, account_id).await
    }
}

fn reject_completed(account: &SavingsAccount) -> Result<(), DomainError> {
    if account.status == AccountStatus::Completed {
        return Err(DomainError::conflict(format!(
            "savings account {} is completed",
            account.tracking_number
        )));
    }
    Ok(())
}
