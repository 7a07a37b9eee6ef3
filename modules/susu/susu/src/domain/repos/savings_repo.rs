use async_trait::async_trait;
use chrono::NaiveDate;
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{AccountStatus, Commission, MarkPayment, Marking, SavingsAccount, SavingsType};

use crate::domain::error::DomainError;

/// A savings account with every derived field resolved, ready to insert.
/// New accounts start `not_started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    pub tracking_number: String,
    pub savings_type: SavingsType,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_amount: i64,
    pub commission_days: i32,
    pub commission_amount: i64,
}

#[async_trait]
pub trait SavingsRepository: Send + Sync {
    async fn tracking_number_exists<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tracking_number: &str,
    ) -> Result<bool, DomainError>;

    async fn create_account<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        draft: AccountDraft,
        actor: Option<ActorId>,
    ) -> Result<SavingsAccount, DomainError>;

    async fn get_account<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<SavingsAccount>, DomainError>;

    async fn set_account_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        status: AccountStatus,
        actor: Option<ActorId>,
    ) -> Result<SavingsAccount, DomainError>;

    /// One marking of `account.daily_amount` per date, all in `status`.
    async fn create_markings<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account: &SavingsAccount,
        dates: Vec<NaiveDate>,
        status: &str,
        actor: Option<ActorId>,
    ) -> Result<u64, DomainError>;

    async fn get_marking<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Marking>, DomainError>;

    async fn find_marking<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        date: NaiveDate,
    ) -> Result<Option<Marking>, DomainError>;

    /// Ordered by date.
    async fn list_markings<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
    ) -> Result<Vec<Marking>, DomainError>;

    async fn count_markings_in_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        status: &str,
    ) -> Result<u64, DomainError>;

    async fn record_payment<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        marking_id: i32,
        status: &str,
        payment: MarkPayment,
        actor: Option<ActorId>,
    ) -> Result<Marking, DomainError>;

    async fn set_marking_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        marking_id: i32,
        status: &str,
        actor: Option<ActorId>,
    ) -> Result<Marking, DomainError>;

    async fn add_commission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        agent_id: i32,
        amount: i64,
        date: NaiveDate,
        actor: Option<ActorId>,
    ) -> Result<Commission, DomainError>;

    /// Ordered by date.
    async fn list_commissions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
    ) -> Result<Vec<Commission>, DomainError>;
}
