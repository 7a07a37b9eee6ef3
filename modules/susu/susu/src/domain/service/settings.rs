use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use susu_sdk::{NotificationMethod, UserSettings};
use susu_security::SecurityContext;
use tracing::{debug, info, instrument};

use crate::domain::error::DomainError;
use crate::domain::repos::{SettingsRepository, UsersRepository};

use super::require_user;

/// Per-user notification preferences.
pub struct SettingsService<S: SettingsRepository, U: UsersRepository> {
    db: DatabaseConnection,
    repo: Arc<S>,
    users: Arc<U>,
}

impl<S: SettingsRepository, U: UsersRepository> SettingsService<S, U> {
    #[must_use]
    pub fn new(db: DatabaseConnection, repo: Arc<S>, users: Arc<U>) -> Self {
        Self { db, repo, users }
    }

    /// Stored settings, or the default when the user has none. Never writes.
    ///
    /// # Errors
    /// `NotFound` when the user does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn get_settings(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<UserSettings, DomainError> {
        require_user(self.users.as_ref(), &self.db, user_id).await?;
        if let Some(settings) = self.repo.find_by_user(&self.db, user_id).await? {
            return Ok(settings);
        }
        debug!("no stored settings, returning default");
        Ok(UserSettings::default_for(user_id))
    }

    /// # Errors
    /// `NotFound` when the user does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn create_default(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<UserSettings, DomainError> {
        let txn = self.db.begin().await?;
        require_user(self.users.as_ref(), &txn, user_id).await?;
        let settings = self.repo.create_default(&txn, user_id, ctx.actor_id()).await?;
        txn.commit().await?;
        Ok(settings)
    }

    /// # Errors
    /// `NotFound` when the user does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn update_notification_method(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        method: NotificationMethod,
    ) -> Result<UserSettings, DomainError> {
        let txn = self.db.begin().await?;
        require_user(self.users.as_ref(), &txn, user_id).await?;
        let settings = self
            .repo
            .upsert_notification_method(&txn, user_id, method, ctx.actor_id())
            .await?;
        txn.commit().await?;
        info!(%method, "notification method updated");
        Ok(settings)
    }

    /// Returns whether anything was stored.
    ///
    /// # Errors
    /// Database errors only.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn delete_settings(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<bool, DomainError> {
        let deleted = self.repo.delete_by_user(&self.db, user_id).await?;
        info!(deleted, "settings deleted");
        Ok(deleted)
    }
}
