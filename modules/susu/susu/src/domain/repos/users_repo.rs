use async_trait::async_trait;
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{NewUser, Role, User, UserPatch};

use crate::domain::error::DomainError;

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<User>, DomainError>;

    /// Users with the given ids, ordered by id; unknown ids are skipped.
    async fn get_many<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> Result<Vec<User>, DomainError>;

    async fn list<C: DbConnTrait + Send + Sync>(&self, conn: &C) -> Result<Vec<User>, DomainError>;

    async fn list_by_role<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        role: Role,
    ) -> Result<Vec<User>, DomainError>;

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user: NewUser,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError>;

    async fn update<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        patch: UserPatch,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError>;

    async fn set_active_business<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
        business_id: Option<i32>,
        actor: Option<ActorId>,
    ) -> Result<User, DomainError>;
}
