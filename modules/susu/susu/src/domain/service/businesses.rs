use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use susu_sdk::{Business, NewBusiness, NewUnit, Unit, User};
use susu_security::SecurityContext;
use tracing::{debug, info, instrument};

use crate::config::SusuConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{BusinessesRepository, MembershipsRepository, UsersRepository};

use super::{require_business, require_user, schedule, validate_text, width};

const CODE_ATTEMPTS: usize = 20;

pub struct BusinessesService<B, M, U>
where
    B: BusinessesRepository,
    M: MembershipsRepository,
    U: UsersRepository,
{
    db: DatabaseConnection,
    repo: Arc<B>,
    memberships: Arc<M>,
    users: Arc<U>,
    config: Arc<SusuConfig>,
}

impl<B, M, U> BusinessesService<B, M, U>
where
    B: BusinessesRepository,
    M: MembershipsRepository,
    U: UsersRepository,
{
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<B>,
        memberships: Arc<M>,
        users: Arc<U>,
        config: Arc<SusuConfig>,
    ) -> Self {
        Self {
            db,
            repo,
            memberships,
            users,
            config,
        }
    }

    /// Create a business and link its agent to it.
    ///
    /// A unique code is generated unless one is given.
    ///
    /// # Errors
    /// `NotFound` for an unknown agent, `Validation` for invalid fields,
    /// `Conflict` when the given code is taken.
    #[instrument(skip(self, ctx, business), fields(actor = ?ctx.actor_id()))]
    pub async fn create_business(
        &self,
        ctx: &SecurityContext,
        business: NewBusiness,
    ) -> Result<Business, DomainError> {
        let max = self.config.max_field_length;
        validate_text("name", &business.name, max.min(width::NAME))?;
        if let Some(address) = &business.address {
            validate_text("address", address, max.min(width::ADDRESS))?;
        }
        if let Some(code) = &business.unique_code {
            validate_text("unique_code", code, max.min(width::BUSINESS_CODE))?;
        }

        let txn = self.db.begin().await?;
        require_user(self.users.as_ref(), &txn, business.agent_id).await?;
        let code = self.resolve_code(&txn, business.unique_code.as_deref()).await?;
        let agent_id = business.agent_id;
        let created = self.repo.create(&txn, business, code, ctx.actor_id()).await?;
        self.memberships.link(&txn, agent_id, created.id).await?;
        txn.commit().await?;

        info!(business_id = created.id, code = %created.unique_code, "business created");
        Ok(created)
    }

    async fn resolve_code(
        &self,
        txn: &DatabaseTransaction,
        requested: Option<&str>,
    ) -> Result<String, DomainError> {
        if let Some(code) = requested {
            if self.repo.code_exists(txn, code).await? {
                return Err(DomainError::conflict(format!(
                    "business code '{code}' is already in use"
                )));
            }
            return Ok(code.to_owned());
        }
        for _ in 0..CODE_ATTEMPTS {
            let code = schedule::business_code();
            if !self.repo.code_exists(txn, &code).await? {
                return Ok(code);
            }
        }
        Err(DomainError::conflict("could not generate a free business code"))
    }

    /// # Errors
    /// `NotFound` when the business does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn get_business(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<Business, DomainError> {
        require_business(self.repo.as_ref(), &self.db, id).await
    }

    /// Users linked to the business, ordered by id.
    ///
    /// # Errors
    /// `NotFound` when the business does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_members(
        &self,
        ctx: &SecurityContext,
        business_id: i32,
    ) -> Result<Vec<User>, DomainError> {
        require_business(self.repo.as_ref(), &self.db, business_id).await?;
        let ids = self.memberships.list_user_ids(&self.db, business_id).await?;
        let members = self.users.get_many(&self.db, &ids).await?;
        debug!(count = members.len(), "listed members");
        Ok(members)
    }

    /// # Errors
    /// `NotFound` for an unknown business, `Validation` for invalid fields.
    #[instrument(skip(self, ctx, unit), fields(actor = ?ctx.actor_id()))]
    pub async fn add_unit(
        &self,
        ctx: &SecurityContext,
        business_id: i32,
        unit: NewUnit,
    ) -> Result<Unit, DomainError> {
        let max = self.config.max_field_length;
        validate_text("name", &unit.name, max.min(width::NAME))?;
        if let Some(location) = &unit.location {
            validate_text("location", location, max.min(width::ADDRESS))?;
        }

        let txn = self.db.begin().await?;
        require_business(self.repo.as_ref(), &txn, business_id).await?;
        let created = self
            .repo
            .create_unit(&txn, business_id, unit, ctx.actor_id())
            .await?;
        txn.commit().await?;

        info!(unit_id = created.id, "unit added");
        Ok(created)
    }

    /// # Errors
    /// `NotFound` when the business does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_units(
        &self,
        ctx: &SecurityContext,
        business_id: i32,
    ) -> Result<Vec<Unit>, DomainError> {
        require_business(self.repo.as_ref(), &self.db, business_id).await?;
        self.repo.list_units(&self.db, business_id).await
    }
}
