use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set};
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{AccountStatus, Commission, MarkPayment, Marking, SavingsAccount};

use crate::domain::error::DomainError;
use crate::domain::repos::{AccountDraft, SavingsRepository};

use super::entity::commission::{self, Entity as CommissionEntity};
use super::entity::savings_account::{self, Entity as AccountEntity};
use super::entity::savings_marking::{self, Entity as MarkingEntity};

#[derive(Clone, Default)]
pub struct OrmSavingsRepository;

async fn find_marking_model<C: DbConnTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<savings_marking::Model, DomainError> {
    MarkingEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Marking", id))
}

#[async_trait]
impl SavingsRepository for OrmSavingsRepository {
    async fn tracking_number_exists<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        tracking_number: &str,
    ) -> Result<bool, DomainError> {
        let count = AccountEntity::find()
            .filter(savings_account::Column::TrackingNumber.eq(tracking_number))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn create_account<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        draft: AccountDraft,
        actor: Option<ActorId>,
    ) -> Result<SavingsAccount, DomainError> {
        let m = savings_account::ActiveModel {
            customer_id: Set(draft.customer_id),
            business_id: Set(draft.business_id),
            unit_id: Set(draft.unit_id),
            tracking_number: Set(draft.tracking_number),
            savings_type: Set(draft.savings_type.as_str().to_owned()),
            daily_amount: Set(draft.daily_amount),
            duration_months: Set(draft.duration_months),
            start_date: Set(draft.start_date),
            end_date: Set(draft.end_date),
            target_amount: Set(Some(draft.target_amount)),
            commission_days: Set(draft.commission_days),
            commission_amount: Set(draft.commission_amount),
            status: Set(AccountStatus::NotStarted.as_str().to_owned()),
            created_by: Set(actor),
            ..Default::default()
        };
        Ok(SavingsAccount::try_from(m.insert(conn).await?)?)
    }

    async fn get_account<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<SavingsAccount>, DomainError> {
        let found = AccountEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(SavingsAccount::try_from).transpose()?)
    }

    async fn set_account_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        status: AccountStatus,
        actor: Option<ActorId>,
    ) -> Result<SavingsAccount, DomainError> {
        let mut m = AccountEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| DomainError::not_found("SavingsAccount", id))?
            .into_active_model();
        m.status = Set(status.as_str().to_owned());
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        Ok(SavingsAccount::try_from(m.update(conn).await?)?)
    }

    async fn create_markings<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account: &SavingsAccount,
        dates: Vec<NaiveDate>,
        status: &str,
        actor: Option<ActorId>,
    ) -> Result<u64, DomainError> {
        // Row by row: the save hook only runs through `ActiveModelTrait::insert`.
        let mut created = 0;
        for date in dates {
            let m = savings_marking::ActiveModel {
                savings_account_id: Set(account.id),
                unit_id: Set(account.unit_id),
                marked_date: Set(date),
                amount: Set(account.daily_amount),
                status: Set(status.to_owned()),
                payment_method: Set(None),
                payment_reference: Set(None),
                marked_by_id: Set(None),
                created_by: Set(actor),
                ..Default::default()
            };
            m.insert(conn).await?;
            created += 1;
        }
        Ok(created)
    }

    async fn get_marking<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Marking>, DomainError> {
        let found = MarkingEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(Marking::try_from).transpose()?)
    }

    async fn find_marking<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        date: NaiveDate,
    ) -> Result<Option<Marking>, DomainError> {
        let found = MarkingEntity::find()
            .filter(savings_marking::Column::SavingsAccountId.eq(account_id))
            .filter(savings_marking::Column::MarkedDate.eq(date))
            .one(conn)
            .await?;
        Ok(found.map(Marking::try_from).transpose()?)
    }

    async fn list_markings<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
    ) -> Result<Vec<Marking>, DomainError> {
        let models = MarkingEntity::find()
            .filter(savings_marking::Column::SavingsAccountId.eq(account_id))
            .order_by_asc(savings_marking::Column::MarkedDate)
            .all(conn)
            .await?;
        models
            .into_iter()
            .map(|m| Marking::try_from(m).map_err(DomainError::from))
            .collect()
    }

    async fn count_markings_in_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        status: &str,
    ) -> Result<u64, DomainError> {
        let count = MarkingEntity::find()
            .filter(savings_marking::Column::SavingsAccountId.eq(account_id))
            .filter(savings_marking::Column::Status.eq(status))
            .count(conn)
            .await?;
        Ok(count)
    }

    async fn record_payment<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        marking_id: i32,
        status: &str,
        payment: MarkPayment,
        actor: Option<ActorId>,
    ) -> Result<Marking, DomainError> {
        let mut m = find_marking_model(conn, marking_id).await?.into_active_model();
        m.status = Set(status.to_owned());
        m.payment_method = Set(Some(payment.payment_method.as_str().to_owned()));
        m.payment_reference = Set(payment.payment_reference);
        m.marked_by_id = Set(actor);
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        Ok(Marking::try_from(m.update(conn).await?)?)
    }

    async fn set_marking_status<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        marking_id: i32,
        status: &str,
        actor: Option<ActorId>,
    ) -> Result<Marking, DomainError> {
        let mut m = find_marking_model(conn, marking_id).await?.into_active_model();
        m.status = Set(status.to_owned());
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        Ok(Marking::try_from(m.update(conn).await?)?)
    }

    async fn add_commission<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
        agent_id: i32,
        amount: i64,
        date: NaiveDate,
        actor: Option<ActorId>,
    ) -> Result<Commission, DomainError> {
        let m = commission::ActiveModel {
            savings_account_id: Set(account_id),
            agent_id: Set(agent_id),
            amount: Set(amount),
            commission_date: Set(date),
            created_by: Set(actor),
            ..Default::default()
        };
        Ok(m.insert(conn).await?.into())
    }

    async fn list_commissions<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        account_id: i32,
    ) -> Result<Vec<Commission>, DomainError> {
        let models = CommissionEntity::find()
            .filter(commission::Column::SavingsAccountId.eq(account_id))
            .order_by_asc(commission::Column::CommissionDate)
            .all(conn)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
