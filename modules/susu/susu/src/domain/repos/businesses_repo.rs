use async_trait::async_trait;
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{Business, NewBusiness, NewUnit, Unit};

use crate::domain::error::DomainError;

#[async_trait]
pub trait BusinessesRepository: Send + Sync {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Business>, DomainError>;

    async fn code_exists<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<bool, DomainError>;

    /// Stores `unique_code`; `business.unique_code` is ignored.
    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business: NewBusiness,
        unique_code: String,
        actor: Option<ActorId>,
    ) -> Result<Business, DomainError>;

    async fn create_unit<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
        unit: NewUnit,
        actor: Option<ActorId>,
    ) -> Result<Unit, DomainError>;

    async fn get_unit<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Unit>, DomainError>;

    async fn list_units<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
    ) -> Result<Vec<Unit>, DomainError>;
}
