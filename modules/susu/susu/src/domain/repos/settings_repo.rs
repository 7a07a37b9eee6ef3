use async_trait::async_trait;
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{NotificationMethod, UserSettings};

use crate::domain::error::DomainError;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Option<UserSettings>, DomainError>;

    /// Store default settings unless the user already has some; returns what is stored.
    async fn create_default<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        actor: Option<ActorId>,
    ) -> Result<UserSettings, DomainError>;

    /// Insert or update; an update records `actor` as `updated_by`.
    async fn upsert_notification_method<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        method: NotificationMethod,
        actor: Option<ActorId>,
    ) -> Result<UserSettings, DomainError>;

    async fn delete_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<bool, DomainError>;
}
