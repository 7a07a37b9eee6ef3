use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{NewUser, Role, User, UserPatch};

use crate::domain::error::DomainError;
use crate::domain::repos::UsersRepository;

use super::entity::user::{self, ActiveModel as UserAM, Column, Entity as UserEntity};

/// ORM-based implementation of the `UsersRepository` trait.
#[derive(Clone, Default)]
pub struct OrmUsersRepository;

fn to_users(models: Vec<user::Model>) -> Result<Vec<User>, DomainError> {
    models
        .into_iter()
        .map(|m| User::try_from(m).map_err(DomainError::from))
        .collect()
}

async fn find_model<C: DbConnTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<user::Model, DomainError> {
    UserEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(User::try_from).transpose()?)
    }

    async fn get_many<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?;
        to_users(models)
    }

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<User>, DomainError> {
        let models = UserEntity::find().order_by_asc(Column::Id).all(conn).await?;
        to_users(models)
    }

    async fn list_by_role<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        role: Role,
    ) -> Result<Vec<User>, DomainError> {
        let models = UserEntity::find()
            .filter(Column::Role.eq(role.as_str()))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?;
        to_users(models)
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: NewUser,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError> {
        let m = UserAM {
            full_name: Set(user.full_name),
            phone_number: Set(user.phone_number),
            email: Set(user.email),
            username: Set(user.username),
            role: Set(user.role.as_str().to_owned()),
            is_active: Set(true),
            active_business_id: Set(None),
            created_by: Set(actor),
            ..Default::default()
        };
        let model = m.insert(conn).await?;
        Ok(User::try_from(model)?)
    }

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        patch: UserPatch,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError> {
        let mut m = find_model(conn, id).await?.into_active_model();
        if let Some(full_name) = patch.full_name {
            m.full_name = Set(full_name);
        }
        if let Some(email) = patch.email {
            m.email = Set(Some(email));
        }
        if let Some(is_active) = patch.is_active {
            m.is_active = Set(is_active);
        }
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        let model = m.update(conn).await?;
        Ok(User::try_from(model)?)
    }

    async fn set_active_business<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        business_id: Option<i32>,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError> {
        let mut m = find_model(conn, id).await?.into_active_model();
        m.active_business_id = Set(business_id);
        if actor.is_some() {
            m.updated_by = Set(actor);
        }
        let model = m.update(conn).await?;
        Ok(User::try_from(model)?)
    }
}
