use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{NotificationMethod, UserSettings};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::repos::SettingsRepository;

use super::entity::user_settings::{self, ActiveModel as SettingsAM, Column, Entity as SettingsEntity};

#[derive(Clone, Default)]
pub struct OrmSettingsRepository;

async fn find_model<C: DbConnTrait + Send + Sync>(
    conn: &C,
    user_id: i32,
) -> Result<Option<user_settings::Model>, DomainError> {
    Ok(SettingsEntity::find()
        .filter(Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

async fn insert<C: DbConnTrait + Send + Sync>(
    conn: &C,
    user_id: i32,
    method: NotificationMethod,
    actor: Option<ActorId>,
) -> Result<UserSettings, DomainError> {
    let m = SettingsAM {
        user_id: Set(user_id),
        notification_method: Set(method.as_str().to_owned()),
        created_by: Set(actor),
        ..Default::default()
    };
    Ok(UserSettings::try_from(m.insert(conn).await?)?)
}

#[async_trait]
impl SettingsRepository for OrmSettingsRepository {
    async fn find_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Option<UserSettings>, DomainError> {
        let found = find_model(conn, user_id).await?;
        Ok(found.map(UserSettings::try_from).transpose()?)
    }

    async fn create_default<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        actor: Option<ActorId>,
    ) -> Result<UserSettings, DomainError> {
        if let Some(existing) = find_model(conn, user_id).await? {
            debug!(user_id, "settings already exist");
            return Ok(UserSettings::try_from(existing)?);
        }
        insert(conn, user_id, NotificationMethod::default(), actor).await
    }

    async fn upsert_notification_method<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        method: NotificationMethod,
        actor: Option<ActorId>,
    ) -> Result<UserSettings, DomainError> {
        let Some(existing) = find_model(conn, user_id).await? else {
            return insert(conn, user_id, method, actor).await;
        };
        let mut m = existing.into_active_model();
        m.notification_method = Set(method.as_str().to_owned());
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        Ok(UserSettings::try_from(m.update(conn).await?)?)
    }

    async fn delete_by_user<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<bool, DomainError> {
        let result = SettingsEntity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
