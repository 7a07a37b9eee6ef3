use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use susu_sdk::{NewUser, User, UserPatch};
use susu_security::SecurityContext;
use tracing::{debug, info, instrument};

use crate::config::SusuConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{SettingsRepository, UsersRepository};

use super::{require_user, validate_text, width};

pub struct UsersService<U: UsersRepository, S: SettingsRepository> {
    db: DatabaseConnection,
    repo: Arc<U>,
    settings: Arc<S>,
    config: Arc<SusuConfig>,
}

impl<U: UsersRepository, S: SettingsRepository> UsersService<U, S> {
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<U>,
        settings: Arc<S>,
        config: Arc<SusuConfig>,
    ) -> Self {
        Self {
            db,
            repo,
            settings,
            config,
        }
    }

    /// Create a user together with default settings.
    ///
    /// # Errors
    /// `Validation` for empty or oversized fields; a unique-constraint
    /// violation when the phone number, e-mail or username is taken.
    #[instrument(skip(self, ctx, new_user), fields(actor = ?ctx.actor_id()))]
    pub async fn create_user(
        &self,
        ctx: &SecurityContext,
        new_user: NewUser,
    ) -> Result<User, DomainError> {
        let max = self.config.max_field_length;
        validate_text("full_name", &new_user.full_name, max.min(width::NAME))?;
        validate_text("username", &new_user.username, max.min(width::USERNAME))?;
        validate_text("phone_number", &new_user.phone_number, max.min(width::PHONE_NUMBER))?;
        if let Some(email) = &new_user.email {
            validate_text("email", email, max.min(width::EMAIL))?;
        }

        let txn = self.db.begin().await?;
        let user = self.repo.create(&txn, new_user, ctx.actor_id()).await?;
        self.settings
            .create_default(&txn, user.id, ctx.actor_id())
            .await?;
        txn.commit().await?;

        info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// # Errors
    /// `NotFound` when the user does not exist.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn get_user(&self, ctx: &SecurityContext, id: i32) -> Result<User, DomainError> {
        require_user(self.repo.as_ref(), &self.db, id).await
    }

    /// All users ordered by id.
    ///
    /// # Errors
    /// Database errors only.
    #[instrument(skip(self, ctx), fields(actor = ?ctx.actor_id()))]
    pub async fn list_users(&self, ctx: &SecurityContext) -> Result<Vec<User>, DomainError> {
        let users = self.repo.list(&self.db).await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// # Errors
    /// `NotFound` for an unknown user, `Validation` for invalid fields.
    #[instrument(skip(self, ctx, patch), fields(actor = ?ctx.actor_id()))]
    pub async fn update_user(
        &self,
        ctx: &SecurityContext,
        id: i32,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        let max = self.config.max_field_length;
        if let Some(full_name) = &patch.full_name {
            validate_text("full_name", full_name, max.min(width::NAME))?;
        }
        if let Some(email) = &patch.email {
            validate_text("email", email, max.min(width::EMAIL))?;
        }

        let txn = self.db.begin().await?;
        let user = self.repo.update(&txn, id, patch, ctx.actor_id()).await?;
        txn.commit().await?;

        info!(user_id = id, "user updated");
        Ok(user)
    }
}
