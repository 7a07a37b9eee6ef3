use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use susu_audit::ActorId;
use susu_sdk::{DetachReport, Role, User};
use susu_security::SecurityContext;
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::repos::{BusinessesRepository, MembershipsRepository, UsersRepository};

use super::{require_business, require_user};

/// User-business membership management.
pub struct MembershipService<M: MembershipsRepository, U: UsersRepository, B: BusinessesRepository> {
    db: DatabaseConnection,
    repo: Arc<M>,
    users: Arc<U>,
    businesses: Arc<B>,
}

impl<M, U, B> MembershipService<M, U, B>
where
    M: MembershipsRepository,
    U: UsersRepository,
    B: BusinessesRepository,
{
    #[must_use]
    pub fn new(db: DatabaseConnection, repo: Arc<M>, users: Arc<U>, businesses: Arc<B>) -> Self {
        Self {
            db,
            repo,
            users,
            businesses,
        }
    }

    /// # Errors
    /// Database errors only.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn is_linked(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, DomainError> {
        self.repo.is_linked(&self.db, user_id, business_id).await
    }

    /// Idempotent: linking an existing pair succeeds without changes.
    ///
    /// # Errors
    /// `NotFound` when the user or the business does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn link(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        require_user(self.users.as_ref(), &txn, user_id).await?;
        require_business(self.businesses.as_ref(), &txn, business_id).await?;
        let inserted = self.repo.link(&txn, user_id, business_id).await?;
        txn.commit().await?;
        if inserted {
            info!("user linked to business");
        }
        Ok(())
    }

    /// Remove one link, or all of the user's links when `business_id` is `None`.
    ///
    /// An active business that is no longer linked is cleared. Removing
    /// nothing is not an error.
    ///
    /// # Errors
    /// Database errors only.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn unlink(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: Option<i32>,
    ) -> Result<u64, DomainError> {
        let txn = self.db.begin().await?;
        let removed = self.repo.unlink(&txn, user_id, business_id).await?;
        if let Some(user) = self.users.get(&txn, user_id).await? {
            self.clear_stale_active_business(&txn, &user, business_id, ctx.actor_id())
                .await?;
        }
        txn.commit().await?;
        info!(removed, "user unlinked");
        Ok(removed)
    }

    /// # Errors
    /// Database errors only.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_business_ids(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<Vec<i32>, DomainError> {
        self.repo.list_business_ids(&self.db, user_id).await
    }

    /// Make `business_id` the user's active business.
    ///
    /// # Errors
    /// `NotFound` for an unknown user, `Validation` when the user is not a
    /// member of the business.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn switch_active_business(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<User, DomainError> {
        let txn = self.db.begin().await?;
        require_user(self.users.as_ref(), &txn, user_id).await?;
        if !self.repo.is_linked(&txn, user_id, business_id).await? {
            return Err(DomainError::validation(
                "business_id",
                format!("user {user_id} is not a member of business {business_id}"),
            ));
        }
        let user = self
            .users
            .set_active_business(&txn, user_id, Some(business_id), ctx.actor_id())
            .await?;
        txn.commit().await?;
        info!("active business switched");
        Ok(user)
    }

    /// Unlink every super admin from every business and clear their active
    /// business. Super admins act across businesses and must not be members.
    ///
    /// # Errors
    /// Database errors only; nothing is changed on failure.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn detach_super_admins(
        &self,
        ctx: &SecurityContext,
    ) -> Result<DetachReport, DomainError> {
        let txn = self.db.begin().await?;
        let mut report = DetachReport::default();
        for user in self.users.list_by_role(&txn, Role::SuperAdmin).await? {
            let removed = self.repo.unlink(&txn, user.id, None).await?;
            let cleared = self
                .clear_stale_active_business(&txn, &user, None, ctx.actor_id())
                .await?;
            if removed > 0 || cleared {
                debug!(user_id = user.id, removed, "super admin detached");
                report.users.push(user.id);
                report.links_removed += removed;
            }
        }
        txn.commit().await?;
        info!(
            users = report.users.len(),
            links_removed = report.links_removed,
            "super admins detached"
        );
        Ok(report)
    }

    /// Clear `active_business_id` when the link it points at was just removed.
    async fn clear_stale_active_business(
        &self,
        txn: &DatabaseTransaction,
        user: &User,
        unlinked: Option<i32>,
        actor: Option<ActorId>,
    ) -> Result<bool, DomainError> {
        let Some(active) = user.active_business_id else {
            return Ok(false);
        };
        if unlinked.is_some_and(|b| b != active) {
            return Ok(false);
        }
        self.users
            .set_active_business(txn, user.id, None, actor)
            .await?;
        Ok(true)
    }
}
